//! Numeric element types and the hypothesis catalogue.
//!
//! Every supported sample type carries a "top bits" significance mask that
//! isolates the bits expected to vary slowly between adjacent samples of a
//! real sequence (the exponent for floats, the high-order bytes for
//! integers). Masking and shifting a raw sample yields its *signature*, a
//! small integer that lets neighbouring samples be compared cheaply.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

/// Byte order of a hypothesised sample stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Big-endian (network order).
    Big,
    /// Little-endian.
    Little,
}

impl Endianness {
    /// Both orders, in the enumeration order used by the scanner.
    pub const BOTH: [Endianness; 2] = [Endianness::Little, Endianness::Big];
}

/// Decode tag for a catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    F64,
    I64,
    U64,
    F32,
    I32,
    U32,
    I16,
    U16,
    I8,
    U8,
}

impl SampleKind {
    /// Single-character tag used in the report format.
    pub fn formatter_char(self) -> char {
        match self {
            Self::F64 => 'd',
            Self::I64 => 'q',
            Self::U64 => 'Q',
            Self::F32 => 'f',
            Self::I32 => 'i',
            Self::U32 => 'I',
            Self::I16 => 'h',
            Self::U16 => 'H',
            Self::I8 => 'b',
            Self::U8 => 'B',
        }
    }

    /// Parse a report formatter character back into a tag.
    pub fn from_formatter_char(ch: char) -> Option<Self> {
        match ch {
            'd' => Some(Self::F64),
            'q' => Some(Self::I64),
            'Q' => Some(Self::U64),
            'f' => Some(Self::F32),
            'i' => Some(Self::I32),
            'I' => Some(Self::U32),
            'h' => Some(Self::I16),
            'H' => Some(Self::U16),
            'b' => Some(Self::I8),
            'B' => Some(Self::U8),
            _ => None,
        }
    }

    /// True for two's-complement integer tags.
    pub fn is_signed_integer(self) -> bool {
        matches!(self, Self::I64 | Self::I32 | Self::I16 | Self::I8)
    }

    /// True for IEEE floating-point tags.
    pub fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32)
    }
}

/// Immutable descriptor for one catalogue entry.
///
/// `right_shift` and `normalised_mask` are derived from the significance
/// mask at construction so signature extraction is mask-and-shift only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    /// Priority rank; smaller is preferred when streaks compete.
    pub priority: u32,
    /// Decode tag.
    pub kind: SampleKind,
    /// Sample width in bytes.
    pub width: usize,
    /// Significance mask over the raw sample bits.
    pub top_bits_mask: u64,
    right_shift: u32,
    normalised_mask: u64,
}

impl TypeInfo {
    const fn new(priority: u32, kind: SampleKind, width: usize, top_bits_mask: u64) -> Self {
        let right_shift = top_bits_mask.trailing_zeros();
        Self {
            priority,
            kind,
            width,
            top_bits_mask,
            right_shift,
            normalised_mask: top_bits_mask >> right_shift,
        }
    }

    /// The significance mask shifted down to its low bits.
    pub fn normalised_mask(&self) -> u64 {
        self.normalised_mask
    }

    /// True for two's-complement integer entries.
    pub fn is_signed_integer(&self) -> bool {
        self.kind.is_signed_integer()
    }

    /// True for floating-point entries.
    pub fn is_float(&self) -> bool {
        self.kind.is_float()
    }

    /// Extract the signature of one sample word.
    ///
    /// The word is interpreted as an unsigned integer in the given byte
    /// order, masked, and shifted down. `word` must be exactly `width`
    /// bytes.
    pub fn signature(&self, word: &[u8], endian: Endianness) -> u64 {
        debug_assert_eq!(word.len(), self.width);
        let raw = match endian {
            Endianness::Big => BigEndian::read_uint(word, self.width),
            Endianness::Little => LittleEndian::read_uint(word, self.width),
        };
        (raw & self.top_bits_mask) >> self.right_shift
    }

    /// Decode one sample word to `f64` for model fitting.
    ///
    /// Unsigned 64-bit values above 2^53 lose precision, which is acceptable
    /// for a fit that only measures smoothness.
    pub fn decode_f64(&self, word: &[u8], endian: Endianness) -> f64 {
        debug_assert_eq!(word.len(), self.width);
        match (self.kind, endian) {
            (SampleKind::F64, Endianness::Big) => BigEndian::read_f64(word),
            (SampleKind::F64, Endianness::Little) => LittleEndian::read_f64(word),
            (SampleKind::I64, Endianness::Big) => BigEndian::read_i64(word) as f64,
            (SampleKind::I64, Endianness::Little) => LittleEndian::read_i64(word) as f64,
            (SampleKind::U64, Endianness::Big) => BigEndian::read_u64(word) as f64,
            (SampleKind::U64, Endianness::Little) => LittleEndian::read_u64(word) as f64,
            (SampleKind::F32, Endianness::Big) => BigEndian::read_f32(word) as f64,
            (SampleKind::F32, Endianness::Little) => LittleEndian::read_f32(word) as f64,
            (SampleKind::I32, Endianness::Big) => BigEndian::read_i32(word) as f64,
            (SampleKind::I32, Endianness::Little) => LittleEndian::read_i32(word) as f64,
            (SampleKind::U32, Endianness::Big) => BigEndian::read_u32(word) as f64,
            (SampleKind::U32, Endianness::Little) => LittleEndian::read_u32(word) as f64,
            (SampleKind::I16, Endianness::Big) => BigEndian::read_i16(word) as f64,
            (SampleKind::I16, Endianness::Little) => LittleEndian::read_i16(word) as f64,
            (SampleKind::U16, Endianness::Big) => BigEndian::read_u16(word) as f64,
            (SampleKind::U16, Endianness::Little) => LittleEndian::read_u16(word) as f64,
            (SampleKind::I8, _) => word[0] as i8 as f64,
            (SampleKind::U8, _) => word[0] as f64,
        }
    }
}

/// The fixed hypothesis catalogue, in priority order.
///
/// The masks select the slowly-varying prefix of a typical sample: the top
/// ten exponent bits for `f64`, the top seven for `f32`, and the high-order
/// bytes for integers.
pub const CATALOGUE: [TypeInfo; 10] = [
    TypeInfo::new(1, SampleKind::F64, 8, 0x7FE0_0000_0000_0000),
    TypeInfo::new(2, SampleKind::I64, 8, 0xFFFF_FFFF_FFF0_0000),
    TypeInfo::new(3, SampleKind::U64, 8, 0xFFFF_FFFF_FFF0_0000),
    TypeInfo::new(4, SampleKind::F32, 4, 0x7F00_0000),
    TypeInfo::new(5, SampleKind::I32, 4, 0xFFFF_0000),
    TypeInfo::new(6, SampleKind::U32, 4, 0xFFFF_0000),
    TypeInfo::new(7, SampleKind::I16, 2, 0xFF00),
    TypeInfo::new(7, SampleKind::U16, 2, 0xFF00),
    TypeInfo::new(9, SampleKind::I8, 1, 0xF0),
    TypeInfo::new(10, SampleKind::U8, 1, 0xF0),
];

/// Look up the catalogue entry for a tag.
pub fn type_info(kind: SampleKind) -> &'static TypeInfo {
    CATALOGUE
        .iter()
        .find(|info| info.kind == kind)
        .expect("catalogue covers every tag")
}
