//! Bidirectional streak growth and quality scoring.
//!
//! A seed placement is extended sample-by-sample in both directions until
//! the smoothness predicate breaks or the file ends. The grown streak is
//! then scored by running the model fit over sliding windows along the
//! whole range; the final quality index also folds in the type priority
//! and a coverage reward.

use crate::scan::fit::fit_error;
use crate::scan::model::{SampleRange, Streak};
use crate::scan::sample_type::TypeInfo;
use crate::scan::source::ChunkedSource;
use crate::scan::{MAX_VALUE, THRESHOLD_COMPARE_BITS};

/// Positions between fit windows along the grown range.
const VALIDATION_STEP: usize = 4;

/// Maximum sample words per fit window.
const VALIDATION_WINDOW: usize = 5;

/// Grow a seed outward in both directions, then score it.
///
/// On return the streak's range covers every accepted sample (seed
/// included) and `quality_index` holds the composite score, or
/// [`MAX_VALUE`] when the streak is too short for any fit window.
pub(crate) fn grow_and_score(streak: &mut Streak, source: &ChunkedSource) {
    let start = walk(streak, source, Direction::Backward);
    let stop = walk(streak, source, Direction::Forward);
    let range = SampleRange::new(start, stop, streak.stride());

    score(streak, source, range);
    streak.set_range(range);
}

#[derive(Clone, Copy, PartialEq)]
enum Direction {
    Backward,
    Forward,
}

/// Walk from the seed offset in one direction, returning the streak start
/// (backward) or the exclusive stop (forward).
fn walk(streak: &Streak, source: &ChunkedSource, direction: Direction) -> usize {
    let info = &streak.type_info;
    let stride = streak.stride() as isize;
    let step = match direction {
        Direction::Backward => -stride,
        Direction::Forward => stride,
    };

    let mut pos = streak.offset as isize;
    let mut last = match source.word_at(streak.offset, info.width) {
        Some(word) => info.signature(word, streak.endian),
        None => return streak.offset,
    };

    loop {
        let next = pos + step;
        if next < 0 {
            return pos as usize;
        }
        let next = next as usize;
        let Some(word) = source.word_at(next, info.width) else {
            // The file boundary terminates the walk; forward, the stop is
            // exclusive of the unreadable position.
            return match direction {
                Direction::Backward => pos as usize,
                Direction::Forward => next,
            };
        };

        let signature = info.signature(word, streak.endian);
        if compare_value(info, last, signature) >= THRESHOLD_COMPARE_BITS {
            return match direction {
                Direction::Backward => pos as usize,
                Direction::Forward => next,
            };
        }
        last = signature;
        pos = next as isize;
    }
}

/// Neighbour comparison value for growth.
///
/// Signed integers wrap the difference modulo the normalised mask so the
/// sign flip at zero reads as continuity. Floats fold the difference around
/// half the mask when either signature is zero, compensating for the
/// exponent discontinuity at value zero.
fn compare_value(info: &TypeInfo, last: u64, new: u64) -> u64 {
    let mut compare = new.abs_diff(last);
    if info.is_signed_integer() {
        compare %= info.normalised_mask();
    }
    if info.is_float() && (new == 0 || last == 0) {
        compare = compare.abs_diff(info.normalised_mask() / 2);
    }
    compare
}

/// Score a grown range with sliding fit windows at every fourth position.
fn score(streak: &mut Streak, source: &ChunkedSource, range: SampleRange) {
    let info = &streak.type_info;
    let mut window: Vec<&[u8]> = Vec::with_capacity(VALIDATION_WINDOW + VALIDATION_STEP);
    let mut error_sum = 0.0;
    let mut steps = 0usize;
    let mut seen = 0usize;

    for pos in range.positions() {
        let Some(word) = source.word_at(pos, info.width) else {
            break;
        };
        window.push(word);
        seen += 1;
        if seen % VALIDATION_STEP == 0 {
            if window.len() > VALIDATION_WINDOW {
                window.drain(..window.len() - VALIDATION_WINDOW);
            }
            error_sum += fit_error(&window.concat(), streak.endian, info);
            steps += 1;
        }
    }

    if steps == 0 {
        streak.quality_index = MAX_VALUE;
        return;
    }

    let len = range.len() as f64;
    let width = info.width as f64;
    let mut quality = error_sum / steps as f64 / len * width;
    quality += 20.0 * info.priority as f64;
    quality += 100.0 - (500.0 * len * width / source.len() as f64);
    streak.quality_index = quality;
}
