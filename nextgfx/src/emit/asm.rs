use crate::{
    emit::{ensure_identifier, EmitError, PartitionSnafu, WriteIoSnafu},
    encode::EncodedBitmap,
    partition::{self, Page, PageLayout},
};
use itertools::Itertools;
use snafu::ResultExt;
use std::io::{self, Write};

const BYTES_PER_LINE: usize = 16;

/// Assembler label of a page, `_<label>_page<n>`. C code refers to it without the leading
/// underscore.
pub fn page_label(label: &str, page: u8) -> String {
    format!("_{label}_page{page}")
}

fn write_section<W: Write>(w: &mut W, label: &str, page: &Page<'_>) -> io::Result<()> {
    let page_label = page_label(label, page.number);

    writeln!(w, "SECTION PAGE_{}", page.number)?;
    writeln!(w, "PUBLIC {page_label}")?;
    writeln!(w, "{page_label}:")?;
    for line in page.data.chunks(BYTES_PER_LINE) {
        writeln!(
            w,
            "    defb {}",
            line.iter()
                .format_with(", ", |b, f| f(&format_args!("0x{b:02x}")))
        )?;
    }
    writeln!(w)
}

/// Splits `data` into pages and writes one self-contained section per page.
///
/// Returns the pages written.
pub fn write_paged_sections<'a, W: Write>(
    mut w: W,
    label: &str,
    data: &'a [u8],
    layout: PageLayout,
) -> Result<Vec<Page<'a>>, EmitError> {
    ensure_identifier(label)?;
    let pages = partition::pages(data, layout).context(PartitionSnafu)?;

    for page in &pages {
        write_section(&mut w, label, page).context(WriteIoSnafu)?;
    }

    Ok(pages)
}

/// Writes a bitmap as z88dk `SECTION PAGE_<n>` blocks, preceded by a summary comment.
///
/// Returns the page numbers used.
pub fn write_paged_bitmap<W: Write>(
    mut w: W,
    label: &str,
    bitmap: &EncodedBitmap,
    layout: PageLayout,
) -> Result<Vec<u8>, EmitError> {
    ensure_identifier(label)?;
    let pages = partition::pages(bitmap.as_bytes(), layout).context(PartitionSnafu)?;

    let mut write = || -> io::Result<()> {
        writeln!(
            w,
            "; Generated from {}x{} pixels, {} bytes",
            bitmap.width(),
            bitmap.height(),
            bitmap.len()
        )?;
        if let (Some(first), Some(last)) = (pages.first(), pages.last()) {
            writeln!(w, "; Pages: {}-{}", first.number, last.number)?;
        }
        writeln!(w)?;

        for page in &pages {
            write_section(&mut w, label, page)?;
        }

        Ok(())
    };
    write().context(WriteIoSnafu)?;

    Ok(pages.iter().map(|p| p.number).collect())
}
