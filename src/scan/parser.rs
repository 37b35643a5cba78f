//! Speculative typed parsing of candidate placements.
//!
//! A placement fixes a byte shift, an element type, a byte order, and a
//! stride gap over a scan window. The parser extracts the first few sample
//! words of that placement and applies the smoothness predicate: for real
//! numeric sequences the masked high-order bits change by 0 or 1 between
//! neighbours, and a threshold of 3 tolerates one carry event across
//! boundaries.

use crate::scan::fit::fit_error;
use crate::scan::sample_type::{Endianness, TypeInfo};
use crate::scan::THRESHOLD_COMPARE_BITS;

/// Number of sample words a placement is tested on.
pub(crate) const TEST_WORDS: usize = 5;

/// A placement with fewer full words than this is not testable.
pub(crate) const MIN_TEST_WORDS: usize = 3;

/// Outcome of testing one candidate placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Placement {
    /// Fewer than [`MIN_TEST_WORDS`] full words fit the window; wider gaps
    /// at the same shift cannot fit more, so the gap sweep can stop.
    TooFewWords,
    /// A signature difference reached the threshold.
    Rough,
    /// All differences below threshold; carries the fit error over the
    /// test words.
    Smooth(f64),
}

/// Collect up to `max` full sample words starting at `shift`, separated by
/// `gap` bytes.
pub(crate) fn split_words<'a>(
    window: &'a [u8],
    shift: usize,
    width: usize,
    gap: usize,
    max: usize,
) -> Vec<&'a [u8]> {
    let mut words = Vec::with_capacity(max);
    let mut pos = shift;
    while words.len() < max {
        let Some(word) = window.get(pos..pos + width) else {
            break;
        };
        words.push(word);
        pos += width + gap;
    }
    words
}

/// True when every neighbouring signature difference is strictly below the
/// threshold.
pub(crate) fn signatures_smooth(words: &[&[u8]], info: &TypeInfo, endian: Endianness) -> bool {
    words.windows(2).all(|pair| {
        let a = info.signature(pair[0], endian);
        let b = info.signature(pair[1], endian);
        a.abs_diff(b) < THRESHOLD_COMPARE_BITS
    })
}

/// Test one placement over a scan window.
pub(crate) fn test_placement(
    window: &[u8],
    info: &TypeInfo,
    endian: Endianness,
    shift: usize,
    gap: usize,
) -> Placement {
    let words = split_words(window, shift, info.width, gap, TEST_WORDS);
    if words.len() < MIN_TEST_WORDS {
        return Placement::TooFewWords;
    }
    if !signatures_smooth(&words, info, endian) {
        return Placement::Rough;
    }

    let joined = words.concat();
    Placement::Smooth(fit_error(&joined, endian, info))
}
