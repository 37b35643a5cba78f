//! Hypothesis sweep over one scan window.
//!
//! For every byte shift, catalogue entry, byte order, and stride gap in the
//! configured search space, the window is tested as a candidate placement.
//! Passing placements become seeds: streaks anchored at the placement's
//! absolute offset, carrying the fit error of the test words as their
//! provisional quality.

use crate::scan::model::Streak;
use crate::scan::parser::{test_placement, Placement};
use crate::scan::sample_type::{Endianness, TypeInfo};
use crate::scan::MAX_VALIDATION_ERROR;

/// Extra stride gaps searched beyond the byte-shift span.
const EXTRA_GAP_SPAN: usize = 8;

/// Sweep one window and return the raw seeds found in it.
///
/// `base` is the absolute offset of the window's first byte. Seeds whose
/// test-window fit error exceeds the validation bound are discarded here.
pub(crate) fn scan_window(
    window: &[u8],
    base: usize,
    types: &[&'static TypeInfo],
    endians: &[Endianness],
    shift_span: usize,
) -> Vec<Streak> {
    let mut seeds = Vec::new();

    for shift in 0..shift_span {
        for info in types {
            for &endian in endians {
                for gap in 0..shift_span + EXTRA_GAP_SPAN {
                    match test_placement(window, info, endian, shift, gap) {
                        // Wider gaps fit even fewer words.
                        Placement::TooFewWords => break,
                        Placement::Rough => {}
                        Placement::Smooth(quality) => {
                            if quality <= MAX_VALIDATION_ERROR {
                                seeds.push(Streak::new(
                                    base + shift,
                                    gap,
                                    **info,
                                    endian,
                                    quality,
                                ));
                            }
                        }
                    }
                }
            }
        }
    }

    seeds
}
