//! Min-max normalization of a global counter into percentages

use super::counter::{GlobalCounter, BYTE_VALUES};

/// Percentage assigned to every present byte value when all counts are equal
///
/// With `max == min` every observed value is the maximum, so it gets a full
/// gauge. This also covers a corpus made of a single repeated byte.
pub const UNIFORM_PERCENT: u8 = 100;

/// Byte value to integer percentage in `0..=100`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCounter {
    percents: [Option<u8>; BYTE_VALUES],
}

impl NormalizedCounter {
    fn empty() -> Self {
        Self {
            percents: [None; BYTE_VALUES],
        }
    }

    /// Percentage for `byte`, `None` if the byte was never observed
    pub fn get(&self, byte: u8) -> Option<u8> {
        self.percents[byte as usize]
    }

    /// Number of byte values with a percentage
    pub fn len(&self) -> usize {
        self.percents.iter().filter(|p| p.is_some()).count()
    }

    /// True when no byte value has a percentage
    pub fn is_empty(&self) -> bool {
        self.percents.iter().all(Option::is_none)
    }

    /// Present byte values with their percentages, in ascending byte order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.percents
            .iter()
            .enumerate()
            .filter_map(|(b, p)| p.map(|p| (b as u8, p)))
    }
}

/// Rescale `counter` so the least frequent present byte maps to 0 and the
/// most frequent maps to 100, rounding down
pub fn normalize(counter: &GlobalCounter) -> NormalizedCounter {
    let mut normalized = NormalizedCounter::empty();

    let Some((min, max)) = counter.min_max() else {
        return normalized;
    };
    let span = max - min;

    for (byte, count) in counter.iter() {
        let percent = if span == 0 {
            UNIFORM_PERCENT
        } else {
            // u128 keeps (count - min) * 100 exact for any u64 count
            ((count - min) as u128 * 100 / span as u128) as u8
        };
        normalized.percents[byte as usize] = Some(percent);
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::counter::Counter;

    #[test]
    fn test_min_and_max_endpoints() {
        let counter: Counter = [(b'a', 10), (b'b', 55), (b'c', 100)].into_iter().collect();
        let normalized = normalize(&counter);

        assert_eq!(normalized.get(b'a'), Some(0));
        assert_eq!(normalized.get(b'b'), Some(50));
        assert_eq!(normalized.get(b'c'), Some(100));
        assert_eq!(normalized.get(b'd'), None);
        assert_eq!(normalized.len(), 3);
    }

    #[test]
    fn test_rounds_down() {
        // (2 - 1) * 100 / (4 - 1) = 33.33
        let counter: Counter = [(0, 1), (1, 2), (2, 4)].into_iter().collect();
        let normalized = normalize(&counter);
        assert_eq!(normalized.get(1), Some(33));
    }

    #[test]
    fn test_single_repeated_byte() {
        let mut counter = Counter::new();
        counter.record(&[0x41; 1000]);

        let normalized = normalize(&counter);
        assert_eq!(normalized.get(0x41), Some(UNIFORM_PERCENT));
        assert_eq!(normalized.len(), 1);
    }

    #[test]
    fn test_all_counts_equal() {
        let counter: Counter = [(b'x', 5), (b'y', 5), (b'z', 5)].into_iter().collect();
        let normalized = normalize(&counter);
        assert!(normalized.iter().all(|(_, p)| p == UNIFORM_PERCENT));
    }

    #[test]
    fn test_empty_counter() {
        let normalized = normalize(&Counter::new());
        assert!(normalized.is_empty());
        assert_eq!(normalized.iter().count(), 0);
    }

    #[test]
    fn test_range_over_every_byte() {
        let counter: Counter = (0..=255u8).map(|b| (b, b as u64 * 37 + 1)).collect();
        let normalized = normalize(&counter);

        assert_eq!(normalized.len(), 256);
        assert!(normalized.iter().all(|(_, p)| p <= 100));
        assert_eq!(normalized.get(0), Some(0));
        assert_eq!(normalized.get(255), Some(100));
    }

    #[test]
    fn test_huge_counts_do_not_overflow() {
        let counter: Counter = [(0, 1), (1, u64::MAX / 2), (2, u64::MAX - 1)]
            .into_iter()
            .collect();
        let normalized = normalize(&counter);
        assert_eq!(normalized.get(0), Some(0));
        assert_eq!(normalized.get(1), Some(49));
        assert_eq!(normalized.get(2), Some(100));
    }
}
