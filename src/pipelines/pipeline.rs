//! Pipeline trait.
use crate::error::Error;

/// A one-shot run from a source to a destination.
///
/// Generic over what a run reports back (counts, paths...).
pub trait Pipeline<T> {
    fn run(&self) -> Result<T, Error>;
}
