//! Blind structural recognition of numeric streams.
//!
//! Given an arbitrary byte source and no schema, the scan pipeline locates
//! contiguous arithmetic sequences of fixed-width numeric samples and
//! recovers, for each discovered stream, its start offset, stride, element
//! type, byte order, and element count:
//!
//! 1. The [`source`] partitions the input into chunks for parallel work.
//! 2. The candidate parser speculatively interprets windows against every
//!    (type, byte order, byte shift, stride gap) hypothesis, keeping
//!    placements whose sample signatures vary smoothly.
//! 3. The streak grower extends each seed in both directions until a
//!    discontinuity and scores the result with a regression fit.
//! 4. The overlap resolver merges compatible streaks and drops dominated
//!    ones.
//! 5. The [`finder`] facade orchestrates passes, ingestion, and the
//!    results API.
//!
//! Extraction, reporting, leftovers, and hex dumps consume the finder's
//! results through [`Streak`].

mod fit;
mod grower;
mod overlap;
mod parser;
mod scanner;

pub mod extract;
pub mod finder;
pub mod hexdump;
pub mod leftovers;
pub mod model;
pub mod report;
pub mod sample_type;
pub mod source;

#[cfg(test)]
pub(crate) mod testdata;

pub use extract::{SampleValues, ValueExtractor};
pub use finder::{CancelHandle, DataFinder};
pub use model::{SampleRange, ScanConfig, Streak};
pub use sample_type::{type_info, Endianness, SampleKind, TypeInfo, CATALOGUE};
pub use source::ChunkedSource;

/// Sentinel quality for streaks that could not be validated.
pub const MAX_VALUE: f64 = 1e100;

/// Strict upper bound on the signature difference between neighbouring
/// samples of a smooth stream. The masked high-order bits of a real
/// sequence change by 0 or 1 per step; 3 tolerates one carry event.
pub const THRESHOLD_COMPARE_BITS: u64 = 3;

/// Seeds and grown streaks with a fit error at or above this bound are
/// discarded.
pub const MAX_VALIDATION_ERROR: f64 = 1000.0;
