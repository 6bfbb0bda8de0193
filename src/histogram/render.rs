//! Ranked bar-chart rendering
//!
//! Each observed byte value becomes one line:
//!
//! ```text
//! A | ..................................................  [2]
//! LF|  [1]
//! B |  [1]
//! ```
//!
//! Lines are ordered by descending raw count, ties by ascending byte value.

use super::counter::GlobalCounter;
use super::normalize::NormalizedCounter;
use std::borrow::Cow;
use std::fmt::Write as _;

/// Character repeated to draw a gauge
pub const GAUGE_MARKER: char = '.';

/// Percentage points per gauge marker (100% draws 50 markers)
const PERCENT_PER_MARKER: u8 = 2;

/// Byte values ordered by descending count, then ascending byte value
pub fn rank(counter: &GlobalCounter) -> Vec<(u8, u64)> {
    let mut ranked: Vec<(u8, u64)> = counter.iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}

/// Two-column label for a byte value
///
/// Line feed, carriage return and space get mnemonics, printable ASCII is
/// shown as itself padded with a space, everything else as two hex digits.
pub fn label(byte: u8) -> Cow<'static, str> {
    match byte {
        b'\n' => Cow::Borrowed("LF"),
        b'\r' => Cow::Borrowed("CR"),
        b' ' => Cow::Borrowed("SB"),
        b if b.is_ascii_graphic() => Cow::Owned(format!("{} ", b as char)),
        b => Cow::Owned(format!("{:02X}", b)),
    }
}

/// Gauge of `percent / 2` markers
pub fn gauge(percent: u8) -> String {
    let width = percent.min(100) / PERCENT_PER_MARKER;
    std::iter::repeat(GAUGE_MARKER).take(width as usize).collect()
}

/// Render a single report line, without the trailing newline
pub fn render_line(byte: u8, count: u64, percent: u8) -> String {
    format!("{}| {} [{}]", label(byte), gauge(percent), count)
}

/// Render the full report, one newline-terminated line per observed byte
pub fn render(counter: &GlobalCounter, normalized: &NormalizedCounter) -> String {
    let mut report = String::new();
    for (byte, count) in rank(counter) {
        let percent = normalized.get(byte).unwrap_or(0);
        // Writing to a String cannot fail
        let _ = writeln!(report, "{}", render_line(byte, count, percent));
    }
    report
}
