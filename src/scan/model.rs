//! Result records and session configuration.
//!
//! A discovered stream is described by its first-sample offset, the gap
//! between samples, the element type and byte order it decodes with, and a
//! quality index (lower is better). The covered byte positions form an
//! arithmetic progression captured by [`SampleRange`].

use crate::scan::extract::SampleValues;
use crate::scan::sample_type::{Endianness, SampleKind, TypeInfo, CATALOGUE};
use serde::{Deserialize, Serialize};

/// Arithmetic progression of absolute byte offsets with an exclusive stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRange {
    /// First sample offset.
    pub start: usize,
    /// Exclusive end; the last sample starts strictly below this.
    pub stop: usize,
    /// Byte distance between successive sample starts.
    pub step: usize,
}

impl SampleRange {
    /// Build a range; `step` must be non-zero.
    pub fn new(start: usize, stop: usize, step: usize) -> Self {
        debug_assert!(step > 0);
        Self { start, stop, step }
    }

    /// An empty range anchored at `offset`, keeping the stride.
    pub fn empty_at(offset: usize, step: usize) -> Self {
        Self::new(offset, offset, step)
    }

    /// Number of sample positions in the progression.
    pub fn len(&self) -> usize {
        if self.stop <= self.start {
            0
        } else {
            (self.stop - self.start).div_ceil(self.step)
        }
    }

    /// True when no sample position lies inside the range.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the sample start positions.
    pub fn positions(&self) -> impl Iterator<Item = usize> {
        (self.start..self.stop).step_by(self.step)
    }

    /// Clamp the exclusive stop to `limit`.
    pub fn clipped(self, limit: usize) -> Self {
        Self {
            stop: self.stop.min(limit),
            ..self
        }
    }
}

/// One discovered numeric stream.
///
/// Invariants: `range.start == offset`, `range.step == width + bytes_step`,
/// and samples never overlap because the stride is at least the width.
#[derive(Debug, Clone)]
pub struct Streak {
    /// Absolute byte position of the first sample.
    pub offset: usize,
    /// Gap in bytes between successive samples; 0 means tightly packed.
    pub bytes_step: usize,
    /// Catalogue entry this streak decodes with.
    pub type_info: TypeInfo,
    /// Byte order this streak decodes with.
    pub endian: Endianness,
    /// Composite fit/priority/coverage score; lower is better.
    pub quality_index: f64,
    range: SampleRange,
    values: Option<SampleValues>,
}

impl Streak {
    /// Create a seed streak with an empty range anchored at `offset`.
    pub fn new(
        offset: usize,
        bytes_step: usize,
        type_info: TypeInfo,
        endian: Endianness,
        quality_index: f64,
    ) -> Self {
        let stride = type_info.width + bytes_step;
        Self {
            offset,
            bytes_step,
            type_info,
            endian,
            quality_index,
            range: SampleRange::empty_at(offset, stride),
            values: None,
        }
    }

    /// Byte distance between successive samples.
    pub fn stride(&self) -> usize {
        self.type_info.width + self.bytes_step
    }

    /// The covered sample positions.
    pub fn range(&self) -> SampleRange {
        self.range
    }

    /// Replace the covered range, keeping `offset` and `bytes_step` in sync.
    pub fn set_range(&mut self, range: SampleRange) {
        debug_assert!(range.step >= self.type_info.width);
        self.offset = range.start;
        self.bytes_step = range.step - self.type_info.width;
        self.range = range;
    }

    /// Decoded element values, present only after extraction.
    pub fn values(&self) -> Option<&SampleValues> {
        self.values.as_ref()
    }

    /// Attach decoded element values.
    pub fn set_values(&mut self, values: SampleValues) {
        self.values = Some(values);
    }

    /// Report tuple `(start, stop, width, bytes_step)`; width and gap are
    /// kept separate so the element width survives serialization.
    pub fn range_summary(&self) -> (usize, usize, usize, usize) {
        (
            self.range.start,
            self.range.stop,
            self.type_info.width,
            self.bytes_step,
        )
    }
}

impl std::fmt::Display for Streak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} -[{} + {}]- {}) [{}]",
            self.type_info.kind.formatter_char(),
            self.range.start,
            self.type_info.width,
            self.bytes_step,
            self.range.stop,
            self.quality_index
        )
    }
}

/// Session configuration for a [`crate::scan::DataFinder`].
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Base chunk-size target; the per-pass window is five times this.
    pub min_length_data: usize,
    /// Initial worker count; may shrink during chunk partitioning.
    pub number_of_threads: usize,
    /// Scales the byte-shift and stride-gap search span.
    pub value_in_row: usize,
    /// Restrict the hypothesis space to these tags; `None` scans the full
    /// catalogue.
    pub sample_kinds: Option<Vec<SampleKind>>,
    /// Restrict the hypothesis space to one byte order; `None` scans both.
    pub endian: Option<Endianness>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_length_data: 1000,
            number_of_threads: 5,
            value_in_row: 2,
            sample_kinds: None,
            endian: None,
        }
    }
}

impl ScanConfig {
    /// Outer bound on the byte-shift search, `value_in_row · 8 + 1`.
    pub(crate) fn shift_span(&self) -> usize {
        self.value_in_row * 8 + 1
    }

    /// Window width processed per pass inside every chunk.
    pub(crate) fn test_chunk_size(&self) -> usize {
        self.min_length_data * 5
    }

    /// Catalogue entries selected by this configuration, in priority order.
    pub(crate) fn hypothesis_types(&self) -> Vec<&'static TypeInfo> {
        match &self.sample_kinds {
            None => CATALOGUE.iter().collect(),
            Some(kinds) => CATALOGUE
                .iter()
                .filter(|info| kinds.contains(&info.kind))
                .collect(),
        }
    }

    /// Byte orders selected by this configuration.
    pub(crate) fn hypothesis_endians(&self) -> Vec<Endianness> {
        match self.endian {
            None => Endianness::BOTH.to_vec(),
            Some(endian) => vec![endian],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::sample_type::type_info;

    #[test]
    fn test_range_len_and_positions() {
        let range = SampleRange::new(0, 3920, 8);
        assert_eq!(range.len(), 490);
        assert_eq!(range.positions().next(), Some(0));
        assert_eq!(range.positions().last(), Some(3912));

        let odd = SampleRange::new(10, 25, 8);
        assert_eq!(odd.len(), 2);
        assert_eq!(odd.positions().collect::<Vec<_>>(), vec![10, 18]);
    }

    #[test]
    fn test_empty_range() {
        let range = SampleRange::empty_at(42, 8);
        assert!(range.is_empty());
        assert_eq!(range.positions().count(), 0);
    }

    #[test]
    fn test_clipped_range() {
        let range = SampleRange::new(0, 4000, 8).clipped(3920);
        assert_eq!(range.stop, 3920);
        let range = SampleRange::new(0, 100, 8).clipped(3920);
        assert_eq!(range.stop, 100);
    }

    #[test]
    fn test_set_range_updates_offset_and_gap() {
        let info = *type_info(SampleKind::F64);
        let mut streak = Streak::new(100, 0, info, Endianness::Little, 1.0);
        assert_eq!(streak.stride(), 8);

        streak.set_range(SampleRange::new(20, 420, 10));
        assert_eq!(streak.offset, 20);
        assert_eq!(streak.bytes_step, 2);
        assert_eq!(streak.stride(), 10);
        assert_eq!(streak.range_summary(), (20, 420, 8, 2));
    }

    #[test]
    fn test_config_defaults_and_spans() {
        let config = ScanConfig::default();
        assert_eq!(config.shift_span(), 17);
        assert_eq!(config.test_chunk_size(), 5000);
        assert_eq!(config.hypothesis_types().len(), 10);
        assert_eq!(config.hypothesis_endians().len(), 2);
    }

    #[test]
    fn test_config_filters() {
        let config = ScanConfig {
            sample_kinds: Some(vec![SampleKind::F64, SampleKind::I32]),
            endian: Some(Endianness::Little),
            ..ScanConfig::default()
        };
        let types = config.hypothesis_types();
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].kind, SampleKind::F64);
        assert_eq!(config.hypothesis_endians(), vec![Endianness::Little]);
    }
}
