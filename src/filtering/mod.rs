/*! Filtering utilities

Entries are kept or dropped by a [Filter] (see [Lang]), then reduced to a set of fields by a [Projection].
! */
mod filter;
mod lang;
mod projection;

pub use filter::Filter;
pub use lang::Lang;
pub use projection::{Missing, Projection, DEFAULT_FIELDS};
