//! Character coverage statistics over printable ASCII.
use std::ops::RangeInclusive;

use crate::bitmap::BitmapCollection;

/// `!` through `~`; space is not counted.
pub const COVERAGE_RANGE: RangeInclusive<u32> = 33..=126;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coverage {
    pub total: usize,
    pub designed: usize,
    pub uppercase: usize,
    pub lowercase: usize,
    pub numbers: usize,
    pub symbols: usize,
    /// Rounded percentage of designed characters
    pub percentage: u32,
    /// Characters in range that are absent or undesigned, ascending
    pub missing: Vec<char>,
}

impl Coverage {
    /// Export requires at least one designed character.
    pub fn is_exportable(&self) -> bool {
        self.designed > 0
    }
}

/// Count designed characters by category. An absent collection yields an
/// all-zero report.
pub fn coverage(bitmaps: Option<&BitmapCollection>) -> Coverage {
    let Some(bitmaps) = bitmaps else {
        return Coverage::default();
    };
    let mut stats = Coverage::default();
    for code in COVERAGE_RANGE {
        stats.total += 1;
        let designed = bitmaps.get(&code).is_some_and(|b| b.is_designed());
        if !designed {
            if let Some(ch) = char::from_u32(code) {
                stats.missing.push(ch);
            }
            continue;
        }
        stats.designed += 1;
        match code {
            65..=90 => stats.uppercase += 1,
            97..=122 => stats.lowercase += 1,
            48..=57 => stats.numbers += 1,
            _ => stats.symbols += 1,
        }
    }
    stats.percentage = (100.0 * stats.designed as f64 / stats.total as f64).round() as u32;
    stats
}
