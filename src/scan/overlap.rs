//! Deduplication of streaks that claim the same bytes.
//!
//! Streaks are compared pairwise in offset order. Two streaks whose samples
//! coincide exactly at their first meeting point and whose strides divide
//! evenly are the same stream seen at different densities and merge; any
//! other byte overlap is a conflict resolved in favour of the better
//! (lower) quality index. Perfectly interleaved streams never touch and
//! survive side by side.

use crate::scan::model::{SampleRange, Streak};

/// Outcome of inspecting the first meeting point of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairOutcome {
    /// Samples coincide and strides are compatible; extend A, drop B.
    Merge,
    /// Samples share bytes without coinciding; drop the worse streak.
    Conflict,
    /// No sample of A shares a byte with any sample of B.
    Disjoint,
}

/// Resolve all overlaps in a batch of streaks.
///
/// Output is sorted by offset. The operation is idempotent: resolving an
/// already-resolved list returns it unchanged.
pub(crate) fn resolve_overlaps(mut streaks: Vec<Streak>) -> Vec<Streak> {
    streaks.sort_by_key(|s| s.offset);
    let mut removed = vec![false; streaks.len()];

    for i_a in 0..streaks.len() {
        if removed[i_a] {
            continue;
        }
        for i_b in i_a + 1..streaks.len() {
            if removed[i_b] {
                continue;
            }
            // Later streaks start even further right; the pair sweep for
            // this A is done.
            if streaks[i_a].range().stop < streaks[i_b].range().start {
                break;
            }

            match inspect_pair(&streaks[i_a], &streaks[i_b]) {
                PairOutcome::Disjoint => {}
                PairOutcome::Merge => {
                    let merged = merged_range(&streaks[i_a], &streaks[i_b]);
                    streaks[i_a].set_range(merged);
                    removed[i_b] = true;
                }
                PairOutcome::Conflict => {
                    // Ties drop the earlier streak, keeping the later one.
                    if streaks[i_b].quality_index > streaks[i_a].quality_index {
                        removed[i_b] = true;
                    } else {
                        removed[i_a] = true;
                    }
                }
            }
            if removed[i_a] {
                break;
            }
        }
    }

    let mut kept: Vec<Streak> = streaks
        .into_iter()
        .zip(removed)
        .filter_map(|(streak, gone)| (!gone).then_some(streak))
        .collect();
    kept.sort_by_key(|s| s.offset);
    kept
}

/// Locate the first byte shared by a sample of `a` and a sample of `b` and
/// classify the pair.
fn inspect_pair(a: &Streak, b: &Streak) -> PairOutcome {
    let width_a = a.type_info.width;
    let width_b = b.type_info.width;
    let range_a = a.range();
    let range_b = b.range();

    for b_start in range_b.positions() {
        // The first sample of A whose end lies past this B sample's start.
        let Some(a_start) = first_sample_ending_after(range_a, width_a, b_start) else {
            continue;
        };
        let a_end = a_start + width_a;
        let b_end = b_start + width_b;

        let aligned = a_start == b_start && a_end == b_end;
        let strides_compatible =
            range_a.step.max(range_b.step) % range_a.step.min(range_b.step) == 0;
        if aligned && strides_compatible {
            return PairOutcome::Merge;
        }
        if a_start < b_end {
            return PairOutcome::Conflict;
        }
        // The nearest A sample starts past this B sample: interleaved here,
        // keep walking B.
    }
    PairOutcome::Disjoint
}

/// Smallest sample position of `range` whose `width`-byte word ends after
/// `target`.
fn first_sample_ending_after(range: SampleRange, width: usize, target: usize) -> Option<usize> {
    if range.is_empty() {
        return None;
    }
    let needed = (target + 1).saturating_sub(width);
    let index = if needed <= range.start {
        0
    } else {
        (needed - range.start).div_ceil(range.step)
    };
    let position = range.start + index * range.step;
    (position < range.stop).then_some(position)
}

fn merged_range(a: &Streak, b: &Streak) -> SampleRange {
    let range_a = a.range();
    let range_b = b.range();
    SampleRange::new(
        range_a.start,
        range_a.stop.max(range_b.stop),
        range_a.step.min(range_b.step),
    )
}
