pub mod cli;
pub mod decompress;
pub mod download;
pub mod error;
pub mod filtering;
pub mod io;
pub mod pipelines;
