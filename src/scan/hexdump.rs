//! Hex-dump utility for inspecting byte regions.
//!
//! Classic three-column dump: absolute offset, hex byte pairs, and a
//! printable-ASCII rendering with `.` placeholders.

use crate::error::ScanError;
use std::io::Write;
use std::path::Path;

/// Default number of bytes rendered per line.
pub const BYTES_PER_LINE: usize = 16;

/// Write a hex dump of `bytes` to `out`.
///
/// `base_offset` is added to the printed offsets so a dump of a file slice
/// shows absolute positions.
pub fn write_hexdump<W: Write>(
    out: &mut W,
    bytes: &[u8],
    base_offset: usize,
    bytes_per_line: usize,
) -> std::io::Result<()> {
    debug_assert!(bytes_per_line > 0);
    for (index, line) in bytes.chunks(bytes_per_line).enumerate() {
        let offset = base_offset + index * bytes_per_line;
        write!(out, "{offset:08x} {} : {}", encode_hex(line), decode_ascii(line))?;
        writeln!(out)?;
    }
    Ok(())
}

/// Dump a file (from `offset` to its end) into an output file.
pub fn dump_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    offset: usize,
) -> Result<(), ScanError> {
    let bytes = std::fs::read(input)?;
    let slice = bytes.get(offset..).unwrap_or(&[]);

    let mut out = std::fs::File::create(output)?;
    write_hexdump(&mut out, slice, offset, BYTES_PER_LINE)?;
    Ok(())
}

/// Hex column: two bytes per group, space separated.
fn encode_hex(line: &[u8]) -> String {
    let mut rendered = String::with_capacity(line.len() * 5 / 2 + 1);
    for pair in line.chunks(2) {
        if !rendered.is_empty() {
            rendered.push(' ');
        }
        for byte in pair {
            rendered.push_str(&format!("{byte:02x}"));
        }
    }
    rendered
}

/// ASCII column: printable characters pass through, the rest become dots.
fn decode_ascii(line: &[u8]) -> String {
    line.iter()
        .map(|&byte| {
            if (32..127).contains(&byte) {
                byte as char
            } else {
                '.'
            }
        })
        .collect()
}
