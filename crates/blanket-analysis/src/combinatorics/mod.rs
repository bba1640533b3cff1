//! Subset and mixed-radix enumeration.

pub mod choice;
pub mod combination;

pub use choice::{ChoiceGenerator, DepthChoiceGenerator};
pub use combination::CombinationIterator;

/// Picks the elements of `items` at `indices`.
pub fn select<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| items[i].clone()).collect()
}
