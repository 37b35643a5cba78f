//! Leftovers writer: the input minus every discovered sample.
//!
//! Rewrites the source with all bytes covered by discovered streaks
//! removed, leaving only the regions the finder could not explain. Useful
//! for iterating on unknown formats: run discovery, blank out what is
//! understood, inspect what remains.

use crate::error::ScanError;
use crate::scan::source::ChunkedSource;
use crate::scan::Streak;
use std::path::Path;

/// The source bytes with every streak-covered byte removed.
pub fn leftover_bytes(source: &ChunkedSource, streaks: &[Streak]) -> Vec<u8> {
    let bytes = source.bytes();
    let mut covered = vec![false; bytes.len()];

    for streak in streaks {
        let width = streak.type_info.width;
        for pos in streak.range().positions() {
            if pos >= bytes.len() {
                break;
            }
            let end = (pos + width).min(bytes.len());
            covered[pos..end].fill(true);
        }
    }

    bytes
        .iter()
        .zip(&covered)
        .filter_map(|(&byte, &hit)| (!hit).then_some(byte))
        .collect()
}

/// Write the leftover bytes to a file.
pub fn write_leftovers(
    source: &ChunkedSource,
    streaks: &[Streak],
    path: impl AsRef<Path>,
) -> Result<(), ScanError> {
    std::fs::write(path, leftover_bytes(source, streaks))?;
    Ok(())
}
