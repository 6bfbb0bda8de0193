//! Byte-value occurrence counters and the merge step
//!
//! A `Counter` is a dense table of 256 counts. A byte value is "present" when
//! its count is non-zero; absent values are never reported.

use std::fmt;
use std::ops::AddAssign;

/// Number of distinct byte values
pub const BYTE_VALUES: usize = 256;

/// Occurrence count per byte value
#[derive(Clone, PartialEq, Eq)]
pub struct Counter {
    counts: [u64; BYTE_VALUES],
}

/// The merged, run-wide counter
pub type GlobalCounter = Counter;

impl Counter {
    /// Create an empty counter
    pub fn new() -> Self {
        Self {
            counts: [0; BYTE_VALUES],
        }
    }

    /// Count every byte of `data`
    #[inline]
    pub fn record(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
    }

    /// Count for a single byte value (0 when absent)
    pub fn get(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of byte values observed at least once
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// True when no byte was observed
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Present byte values with their counts, in ascending byte order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(b, &c)| (b as u8, c))
    }

    /// Smallest and largest count over present byte values
    pub fn min_max(&self) -> Option<(u64, u64)> {
        self.iter().fold(None, |acc, (_, c)| match acc {
            None => Some((c, c)),
            Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
        })
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(b, c)| (format!("{:#04x}", b), c)))
            .finish()
    }
}

impl AddAssign<&Counter> for Counter {
    fn add_assign(&mut self, other: &Counter) {
        for (total, &c) in self.counts.iter_mut().zip(other.counts.iter()) {
            *total += c;
        }
    }
}

impl FromIterator<(u8, u64)> for Counter {
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut counter = Counter::new();
        for (byte, count) in iter {
            counter.counts[byte as usize] += count;
        }
        counter
    }
}

/// Sum worker counters into one global counter
///
/// Addition is commutative, so the result does not depend on the order of
/// `counters` or on how chunks were spread over the workers.
pub fn merge<'a, I>(counters: I) -> GlobalCounter
where
    I: IntoIterator<Item = &'a Counter>,
{
    let mut global = Counter::new();
    for counter in counters {
        global += counter;
    }
    global
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_get() {
        let mut counter = Counter::new();
        counter.record(b"AAB\n");

        assert_eq!(counter.get(b'A'), 2);
        assert_eq!(counter.get(b'B'), 1);
        assert_eq!(counter.get(b'\n'), 1);
        assert_eq!(counter.get(b'Z'), 0);
        assert_eq!(counter.total(), 4);
        assert_eq!(counter.distinct(), 3);
    }

    #[test]
    fn test_iter_skips_absent() {
        let mut counter = Counter::new();
        counter.record(&[0xFF, 0x00, 0xFF]);

        let entries: Vec<_> = counter.iter().collect();
        assert_eq!(entries, vec![(0x00, 1), (0xFF, 2)]);
    }

    #[test]
    fn test_empty_counter() {
        let counter = Counter::default();
        assert!(counter.is_empty());
        assert_eq!(counter.total(), 0);
        assert_eq!(counter.min_max(), None);
        assert_eq!(counter.iter().count(), 0);
    }

    #[test]
    fn test_min_max_ignores_absent() {
        let counter: Counter = [(b'a', 7), (b'b', 3), (b'c', 12)].into_iter().collect();
        assert_eq!(counter.min_max(), Some((3, 12)));
    }

    #[test]
    fn test_merge_sums_disjoint_and_overlapping() {
        let a: Counter = [(b'x', 2), (b'y', 1)].into_iter().collect();
        let b: Counter = [(b'y', 4), (b'z', 9)].into_iter().collect();
        let c = Counter::new();

        let global = merge([&a, &b, &c]);
        assert_eq!(global.get(b'x'), 2);
        assert_eq!(global.get(b'y'), 5);
        assert_eq!(global.get(b'z'), 9);
        assert_eq!(global.total(), a.total() + b.total());
        assert_eq!(global, merge([&c, &b, &a]));
    }

    #[test]
    fn test_merge_of_nothing_is_empty() {
        let global = merge(std::iter::empty::<&Counter>());
        assert!(global.is_empty());
    }

    #[test]
    fn test_debug_lists_present_only() {
        let counter: Counter = [(b'A', 2)].into_iter().collect();
        assert_eq!(format!("{:?}", counter), "{\"0x41\": 2}");
    }
}
