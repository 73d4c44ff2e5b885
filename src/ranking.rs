//! Ordering keys by how often they were read.
//!
//! Keys with equal access counts are ordered lexicographically, so the
//! result never depends on hash-map iteration order.

use std::cmp::Ordering;

/// Which end of the access distribution to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Highest access count first.
    Most,
    /// Lowest access count first.
    Least,
}

#[derive(Debug, PartialEq, Eq)]
struct KeyCount<'a> {
    key: &'a str,
    count: u64,
}

impl KeyCount<'_> {
    fn cmp_in(&self, other: &Self, direction: Direction) -> Ordering {
        let by_count = match direction {
            Direction::Most => other.count.cmp(&self.count),
            Direction::Least => self.count.cmp(&other.count),
        };
        by_count.then_with(|| self.key.cmp(other.key))
    }
}

/// Return at most `n` keys ranked by access count in `direction`.
///
/// When fewer than `n` keys exist all of them are returned, still ranked.
pub fn rank<'a, I>(counts: I, n: usize, direction: Direction) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    if n == 0 {
        return Vec::new();
    }

    let mut items: Vec<KeyCount<'a>> = counts
        .into_iter()
        .map(|(key, count)| KeyCount { key, count })
        .collect();

    // Partition the first n into place before sorting only that prefix.
    if n < items.len() {
        items.select_nth_unstable_by(n - 1, |a, b| a.cmp_in(b, direction));
        items.truncate(n);
    }
    items.sort_unstable_by(|a, b| a.cmp_in(b, direction));

    items.into_iter().map(|kc| kc.key.to_string()).collect()
}
