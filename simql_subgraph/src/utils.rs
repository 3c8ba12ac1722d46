//! Set helpers for the refinement loop.

use std::collections::HashSet;
use std::hash::Hash;

/// Returns true if some element of `a ∩ b` satisfies `pred`.
///
/// Walks the smaller set and probes the larger one.
pub fn any_shared<T, F>(a: &HashSet<T>, b: &HashSet<T>, mut pred: F) -> bool
where
    T: Eq + Hash,
    F: FnMut(&T) -> bool,
{
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().any(|x| large.contains(x) && pred(x))
}

/// Returns true if every set in `sets` is a subset of its counterpart in `supersets`.
pub fn pointwise_subset<T: Eq + Hash>(sets: &[HashSet<T>], supersets: &[HashSet<T>]) -> bool {
    sets.len() == supersets.len()
        && sets
            .iter()
            .zip(supersets)
            .all(|(set, superset)| set.is_subset(superset))
}
