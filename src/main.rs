//! # wikidict
//!
//! Extracts the entries of a single language from a [wiktextract](https://kaikki.org) dump,
//! keeping a fixed set of fields, into a JSON Lines file.
//!
//! This project can be used both as a tool, or as a lib to embed extraction into other projects.
//!
//! ## Getting started
//!
//! ```sh
//! # English entries of the full raw dump into wikidict.json
//! wikidict
//!
//! # French entries of a local gzipped dump, on stdout
//! RUST_LOG=info wikidict --url raw-wiktextract-data.jsonl.gz --lang fr --output -
//! ```
//!
//! See [wikidict::cli::Wikidict] for every option.

use structopt::StructOpt;
use wikidict::cli;
use wikidict::pipelines::{Extract, Pipeline};

#[macro_use]
extern crate log;

fn main() {
    env_logger::init();

    let opt = cli::Wikidict::from_args();
    debug!("cli args\n{:#?}", opt);

    let extract = Extract::from(opt);
    if let Err(e) = extract.run() {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

