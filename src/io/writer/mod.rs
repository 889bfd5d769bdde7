/*! Output writing.
!*/
mod entrywriter;

pub use entrywriter::{Destination, EntryWriter};
