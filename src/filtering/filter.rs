//! Entry filtering trait.

/// Stateless predicate: the same entry always gets the same answer.
///
/// Returning `true` keeps the entry.
pub trait Filter<T>: Default {
    fn detect(&self, item: T) -> bool;
}
