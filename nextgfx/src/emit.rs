//! Text renderings of encoded data: C headers and z88dk assembler sections.
//!
//! Output is fully determined by the encoded bytes and the names passed in. Arrays are written
//! in grid order (`row * columns + col`), banks and pages in buffer order.

use crate::partition::PartitionError;
use itertools::Itertools;
use snafu::{ensure, Snafu};
use std::io::{self, Write};

pub mod asm;
pub mod header;

pub use header::{write_bitmap_header, write_header, write_sheet_header, BitmapLayout, Declare};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EmitError {
    #[snafu(display("`{name}` is not a valid C identifier"))]
    InvalidIdentifier { name: String },
    #[snafu(display("Could not split data into pages: {source}"))]
    Partition { source: PartitionError },
    WriteIo { source: io::Error },
}

/// Whether `name` can be used as a C (and z88dk) identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Turns an arbitrary string (usually a file stem) into an identifier.
pub fn sanitize_identifier(name: &str) -> String {
    let mut ident = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>();

    if !ident.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        ident.insert(0, '_');
    }
    ident
}

pub(crate) fn ensure_identifier(name: &str) -> Result<(), EmitError> {
    ensure!(is_identifier(name), InvalidIdentifierSnafu { name });
    Ok(())
}

/// Spreadsheet-style column label: `A`..`Z`, then `AA`, `AB`, ...
pub fn column_label(col: usize) -> String {
    let mut label = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        n -= 1;
        label.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    label.iter().rev().map(|&b| char::from(b)).collect()
}

/// Writes `bytes` as comma-separated `0xAB` literals, `per_line` per line, indented by four
/// spaces, without a trailing comma.
pub(crate) fn write_c_bytes<W: Write>(w: &mut W, bytes: &[u8], per_line: usize) -> io::Result<()> {
    let lines = bytes.chunks(per_line);
    let count = lines.len();

    for (i, line) in lines.enumerate() {
        let comma = if i + 1 < count { "," } else { "" };
        writeln!(
            w,
            "    {}{comma}",
            line.iter()
                .format_with(",", |b, f| f(&format_args!("0x{b:02X}")))
        )?;
    }

    Ok(())
}
