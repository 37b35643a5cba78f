//! Typed-value extraction for confirmed streaks.
//!
//! Discovery only records where streams live; extraction walks each
//! streak's range, gathers the sample words, and decodes them into a typed
//! vector matching the streak's catalogue entry and byte order.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::Serialize;

use crate::error::ScanError;
use crate::scan::finder::DataFinder;
use crate::scan::sample_type::{Endianness, SampleKind};
use crate::scan::source::ChunkedSource;
use crate::scan::Streak;
use std::path::Path;

/// Decoded sample values in their native representation.
///
/// Serializes untagged, so values appear as a plain number array in
/// reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SampleValues {
    F64(Vec<f64>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I8(Vec<i8>),
    U8(Vec<u8>),
}

impl SampleValues {
    /// Number of decoded elements.
    pub fn len(&self) -> usize {
        match self {
            Self::F64(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::U64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U8(v) => v.len(),
        }
    }

    /// True when no elements were decoded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to `f64` regardless of the native representation.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Self::F64(v) => v.clone(),
            Self::I64(v) => v.iter().map(|&x| x as f64).collect(),
            Self::U64(v) => v.iter().map(|&x| x as f64).collect(),
            Self::F32(v) => v.iter().map(|&x| x as f64).collect(),
            Self::I32(v) => v.iter().map(|&x| x as f64).collect(),
            Self::U32(v) => v.iter().map(|&x| x as f64).collect(),
            Self::I16(v) => v.iter().map(|&x| x as f64).collect(),
            Self::U16(v) => v.iter().map(|&x| x as f64).collect(),
            Self::I8(v) => v.iter().map(|&x| x as f64).collect(),
            Self::U8(v) => v.iter().map(|&x| x as f64).collect(),
        }
    }
}

/// Decode every sample of a streak.
///
/// Returns `None` when any sample read would fall outside the source.
pub(crate) fn decode_values(source: &ChunkedSource, streak: &Streak) -> Option<SampleValues> {
    let info = &streak.type_info;
    let endian = streak.endian;
    let words: Option<Vec<&[u8]>> = streak
        .range()
        .positions()
        .map(|pos| source.word_at(pos, info.width))
        .collect();
    let words = words?;

    let values = match info.kind {
        SampleKind::F64 => {
            SampleValues::F64(words.iter().map(|w| read_f64(w, endian)).collect())
        }
        SampleKind::I64 => {
            SampleValues::I64(words.iter().map(|w| read_i64(w, endian)).collect())
        }
        SampleKind::U64 => {
            SampleValues::U64(words.iter().map(|w| read_u64(w, endian)).collect())
        }
        SampleKind::F32 => {
            SampleValues::F32(words.iter().map(|w| read_f32(w, endian)).collect())
        }
        SampleKind::I32 => {
            SampleValues::I32(words.iter().map(|w| read_i32(w, endian)).collect())
        }
        SampleKind::U32 => {
            SampleValues::U32(words.iter().map(|w| read_u32(w, endian)).collect())
        }
        SampleKind::I16 => {
            SampleValues::I16(words.iter().map(|w| read_i16(w, endian)).collect())
        }
        SampleKind::U16 => {
            SampleValues::U16(words.iter().map(|w| read_u16(w, endian)).collect())
        }
        SampleKind::I8 => SampleValues::I8(words.iter().map(|w| w[0] as i8).collect()),
        SampleKind::U8 => SampleValues::U8(words.iter().map(|w| w[0]).collect()),
    };
    Some(values)
}

fn read_f64(word: &[u8], endian: Endianness) -> f64 {
    match endian {
        Endianness::Big => BigEndian::read_f64(word),
        Endianness::Little => LittleEndian::read_f64(word),
    }
}

fn read_i64(word: &[u8], endian: Endianness) -> i64 {
    match endian {
        Endianness::Big => BigEndian::read_i64(word),
        Endianness::Little => LittleEndian::read_i64(word),
    }
}

fn read_u64(word: &[u8], endian: Endianness) -> u64 {
    match endian {
        Endianness::Big => BigEndian::read_u64(word),
        Endianness::Little => LittleEndian::read_u64(word),
    }
}

fn read_f32(word: &[u8], endian: Endianness) -> f32 {
    match endian {
        Endianness::Big => BigEndian::read_f32(word),
        Endianness::Little => LittleEndian::read_f32(word),
    }
}

fn read_i32(word: &[u8], endian: Endianness) -> i32 {
    match endian {
        Endianness::Big => BigEndian::read_i32(word),
        Endianness::Little => LittleEndian::read_i32(word),
    }
}

fn read_u32(word: &[u8], endian: Endianness) -> u32 {
    match endian {
        Endianness::Big => BigEndian::read_u32(word),
        Endianness::Little => LittleEndian::read_u32(word),
    }
}

fn read_i16(word: &[u8], endian: Endianness) -> i16 {
    match endian {
        Endianness::Big => BigEndian::read_i16(word),
        Endianness::Little => LittleEndian::read_i16(word),
    }
}

fn read_u16(word: &[u8], endian: Endianness) -> u16 {
    match endian {
        Endianness::Big => BigEndian::read_u16(word),
        Endianness::Little => LittleEndian::read_u16(word),
    }
}

/// Populates discovered streaks with their decoded values.
pub struct ValueExtractor<'a> {
    finder: &'a mut DataFinder,
}

impl<'a> ValueExtractor<'a> {
    /// Wrap a finder whose session has produced results.
    pub fn new(finder: &'a mut DataFinder) -> Self {
        Self { finder }
    }

    /// Decode and attach values for every streak.
    ///
    /// Streaks whose ranges cannot be read in full (possible after loading
    /// a report produced from a different input) are left without values.
    pub fn extract_values(&mut self) -> &mut Self {
        let (source, results) = self.finder.source_and_results_mut();
        for streak in results.iter_mut() {
            if let Some(values) = decode_values(source, streak) {
                streak.set_values(values);
            }
        }
        self
    }

    /// Write a report including the extracted values.
    pub fn write_report(&self, path: impl AsRef<Path>) -> Result<(), ScanError> {
        self.finder.write_report(path)
    }

    /// Write the input with every discovered sample byte removed.
    pub fn write_leftovers(&self, path: impl AsRef<Path>) -> Result<(), ScanError> {
        let results = self.finder.results();
        crate::scan::leftovers::write_leftovers(self.finder.source(), &results, path)
    }
}
