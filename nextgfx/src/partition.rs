//! Splitting flat byte buffers into hardware-addressable chunks.
//!
//! Banks are fixed 8K MMU slots numbered from 0. Pages carry a caller-chosen size and number
//! base and end up as relocatable assembler sections. In both cases the last chunk holds only
//! the remaining bytes; nothing is ever padded.

use crate::{consts::BANK_SIZE, utils::chunk_count};
use alloc::vec::Vec;
use snafu::{ensure, Snafu};

/// One 8K slice of a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bank<'a> {
    /// Position of the bank, counting from 0.
    pub index: usize,
    /// Byte offset of the bank within the source buffer.
    pub offset: usize,
    pub data: &'a [u8],
}

/// Splits `data` into `ceil(len / 8192)` banks.
pub fn banks(data: &[u8]) -> impl ExactSizeIterator<Item = Bank<'_>> + '_ {
    data.chunks(BANK_SIZE)
        .enumerate()
        .map(|(index, data)| Bank {
            index,
            offset: index * BANK_SIZE,
            data,
        })
}

#[derive(Debug, Snafu)]
pub enum PartitionError {
    #[snafu(display("Page size must be non-zero"))]
    ZeroPageSize,
    #[snafu(display(
        "{count} pages starting at page {base_page} run past the last page number (255)"
    ))]
    PageNumberOverflow { base_page: u8, count: usize },
}

/// Where paged data goes: the first page number and the page size in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub base_page: u8,
    pub page_size: usize,
}

impl PageLayout {
    pub const fn new(base_page: u8) -> Self {
        Self {
            base_page,
            page_size: BANK_SIZE,
        }
    }

    pub const fn with_page_size(self, page_size: usize) -> Self {
        Self { page_size, ..self }
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::new(0)
    }
}

/// A labelled slice of paged data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a> {
    /// `base_page + position`.
    pub number: u8,
    pub offset: usize,
    pub data: &'a [u8],
}

/// Splits `data` into pages according to `layout`.
pub fn pages(data: &[u8], layout: PageLayout) -> Result<Vec<Page<'_>>, PartitionError> {
    let PageLayout {
        base_page,
        page_size,
    } = layout;
    ensure!(page_size > 0, ZeroPageSizeSnafu);

    let count = chunk_count(data.len(), page_size);
    ensure!(
        usize::from(base_page) + count.saturating_sub(1) <= usize::from(u8::MAX),
        PageNumberOverflowSnafu { base_page, count }
    );

    let pages = data
        .chunks(page_size)
        .enumerate()
        .map(|(i, data)| Page {
            // range checked above
            number: base_page + i as u8,
            offset: i * page_size,
            data,
        })
        .collect::<Vec<_>>();

    log::debug!(
        "split {} bytes into {} pages of {page_size} from page {base_page}",
        data.len(),
        pages.len()
    );

    Ok(pages)
}
