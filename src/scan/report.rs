//! JSON report serialization for discovered streaks.
//!
//! The report is a stable interchange format: `{"results": [...]}` where
//! each entry records the streak's offset, gap, type descriptor, byte
//! order, quality, covered range, and (optionally) extracted values. The
//! range tuple stores width and gap separately rather than the combined
//! stride so the element width survives the round trip.

use crate::error::ScanError;
use crate::scan::model::SampleRange;
use crate::scan::sample_type::{type_info, Endianness, SampleKind};
use crate::scan::Streak;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct Report {
    results: Vec<ReportStreak>,
}

/// One streak as it appears in the report file.
#[derive(Serialize, Deserialize)]
struct ReportStreak {
    offset: usize,
    bytes_step: usize,
    data_type: ReportDataType,
    endian: Endianness,
    quality_index: f64,
    /// `[start, stop, width, bytes_step]`.
    streak: (usize, usize, usize, usize),
    #[serde(default)]
    values: serde_json::Value,
}

#[derive(Serialize, Deserialize)]
struct ReportDataType {
    priority_index: u32,
    formatter_char: char,
    length_in_byte: usize,
    endian_bitmask: u64,
}

impl ReportStreak {
    fn from_streak(streak: &Streak) -> Self {
        let info = &streak.type_info;
        let values = match streak.values() {
            Some(values) => serde_json::to_value(values).unwrap_or_default(),
            None => serde_json::Value::Array(Vec::new()),
        };
        Self {
            offset: streak.offset,
            bytes_step: streak.bytes_step,
            data_type: ReportDataType {
                priority_index: info.priority,
                formatter_char: info.kind.formatter_char(),
                length_in_byte: info.width,
                endian_bitmask: info.top_bits_mask,
            },
            endian: streak.endian,
            quality_index: streak.quality_index,
            streak: streak.range_summary(),
            values,
        }
    }

    /// Rebuild a streak, resolving the type through the catalogue.
    ///
    /// Entries with an unknown formatter character are skipped; stored
    /// values are not reloaded.
    fn into_streak(self) -> Option<Streak> {
        let kind = SampleKind::from_formatter_char(self.data_type.formatter_char)?;
        let info = *type_info(kind);
        let (start, stop, width, gap) = self.streak;

        let mut streak = Streak::new(self.offset, self.bytes_step, info, self.endian, self.quality_index);
        streak.set_range(SampleRange::new(start, stop, width + gap));
        Some(streak)
    }
}

/// Write a report file for a list of streaks.
pub fn write_report(streaks: &[Streak], path: impl AsRef<Path>) -> Result<(), ScanError> {
    let report = Report {
        results: streaks.iter().map(ReportStreak::from_streak).collect(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load the streaks recorded in a report file.
pub fn load_report(path: impl AsRef<Path>) -> Result<Vec<Streak>, ScanError> {
    let json = std::fs::read_to_string(path)?;
    let report: Report = serde_json::from_str(&json)?;
    Ok(report
        .results
        .into_iter()
        .filter_map(ReportStreak::into_streak)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::extract::SampleValues;

    fn sample_streak() -> Streak {
        let info = *type_info(SampleKind::F64);
        let mut streak = Streak::new(68, 0, info, Endianness::Little, 114.5);
        streak.set_range(SampleRange::new(68, 19668, 8));
        streak
    }

    #[test]
    fn test_report_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let mut original = sample_streak();
        original.set_values(SampleValues::F64(vec![1.0, 2.0]));
        write_report(&[original.clone()], &path).unwrap();

        let loaded = load_report(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        let streak = &loaded[0];
        assert_eq!(streak.offset, original.offset);
        assert_eq!(streak.bytes_step, original.bytes_step);
        assert_eq!(streak.range(), original.range());
        assert_eq!(streak.type_info.kind, SampleKind::F64);
        assert_eq!(streak.endian, Endianness::Little);
        assert_eq!(streak.quality_index, original.quality_index);
        // Values are not reloaded.
        assert!(streak.values().is_none());
    }

    #[test]
    fn test_report_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&[sample_streak()], &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let entry = &json["results"][0];

        assert_eq!(entry["offset"], 68);
        assert_eq!(entry["bytes_step"], 0);
        assert_eq!(entry["endian"], "little");
        assert_eq!(entry["data_type"]["formatter_char"], "d");
        assert_eq!(entry["data_type"]["priority_index"], 1);
        assert_eq!(entry["data_type"]["length_in_byte"], 8);
        assert_eq!(
            entry["data_type"]["endian_bitmask"],
            0x7FE0_0000_0000_0000u64
        );
        assert_eq!(
            entry["streak"],
            serde_json::json!([68, 19668, 8, 0])
        );
        assert_eq!(entry["values"], serde_json::json!([]));
    }

    #[test]
    fn test_unknown_formatter_entries_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let json = serde_json::json!({
            "results": [{
                "offset": 0,
                "bytes_step": 0,
                "data_type": {
                    "priority_index": 1,
                    "formatter_char": "z",
                    "length_in_byte": 8,
                    "endian_bitmask": 1
                },
                "endian": "big",
                "quality_index": 0.0,
                "streak": [0, 80, 8, 0],
                "values": []
            }]
        });
        std::fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

        assert!(load_report(&path).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_report("/nonexistent/streakscan-report.json").unwrap_err();
        assert!(matches!(err, ScanError::Io { .. }));
    }
}
