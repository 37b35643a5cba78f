//! Blind structural recogniser for numeric streams in unknown binary
//! files.
//!
//! Given a byte stream and no schema, [`DataFinder`] locates contiguous
//! arithmetic sequences of fixed-width numeric samples (floats and signed
//! or unsigned integers of 1, 2, 4, and 8 bytes, in either byte order) and
//! reports, for each discovered stream, its start offset, stride, element
//! type, byte order, element count, and a quality score. A typical input
//! is a scientific capture file that embeds several interleaved numeric
//! arrays among unrelated bytes.
//!
//! ```no_run
//! use streakscan::{DataFinder, ScanConfig, ValueExtractor};
//!
//! # fn main() -> Result<(), streakscan::ScanError> {
//! let mut finder = DataFinder::open("capture.bin", ScanConfig::default())?;
//! finder.find()?;
//!
//! ValueExtractor::new(&mut finder).extract_values();
//! for streak in finder.results() {
//!     println!("{streak}");
//! }
//! finder.write_report("report.json")?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod scan;

pub use error::ScanError;
pub use scan::{
    CancelHandle, ChunkedSource, DataFinder, Endianness, SampleKind, SampleRange, SampleValues,
    ScanConfig, Streak, TypeInfo, ValueExtractor, CATALOGUE,
};
