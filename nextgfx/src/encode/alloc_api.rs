use crate::{
    encode::{Block, EncodeError, EncodedBitmap, EncodedSprite, EncodedTile, NoCompleteBlocksSnafu},
    palette::{ColorLookup, Palette, Quantizer},
    raster::Raster,
    Format, Rgb332Mode,
};
use alloc::vec::Vec;
use snafu::ensure;

/// Blocks cut from a raster on a regular grid, stored row by row.
///
/// Only complete blocks are taken: a trailing partial column or row of the source is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet<B> {
    columns: usize,
    rows: usize,
    blocks: Vec<B>,
}

impl<B: Block> Sheet<B> {
    /// Cuts `raster` into blocks, keeping at most `row_limit` rows of them if given.
    pub fn encode(
        raster: &Raster<'_>,
        quantizer: &Quantizer<'_>,
        row_limit: Option<usize>,
    ) -> Result<Self, EncodeError> {
        let columns = raster.width() / B::DIM;
        let mut rows = raster.height() / B::DIM;
        if let Some(limit) = row_limit {
            rows = rows.min(limit);
        }

        ensure!(
            columns > 0 && rows > 0,
            NoCompleteBlocksSnafu {
                width: raster.width(),
                height: raster.height(),
                block: B::DIM,
            }
        );

        let blocks = itertools::iproduct!(0..rows, 0..columns)
            .map(|(row, col)| B::encode_cell(quantizer, raster, col, row))
            .collect();

        log::debug!(
            "cut {columns}x{rows} blocks of {dim}x{dim} pixels",
            dim = B::DIM
        );

        Ok(Self {
            columns,
            rows,
            blocks,
        })
    }
}

impl<B> Sheet<B> {
    #[inline]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in lookup-table order, `row * columns + col`.
    #[inline]
    pub fn blocks(&self) -> &[B] {
        &self.blocks
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&B> {
        if col >= self.columns || row >= self.rows {
            return None;
        }
        self.blocks.get(row * self.columns + col)
    }

    /// Blocks with their `(col, row)` grid position, in lookup-table order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &B)> + '_ {
        let columns = self.columns;
        self.blocks
            .iter()
            .enumerate()
            .map(move |(i, block)| (i % columns, i / columns, block))
    }
}

/// Everything an export needs besides the raster itself.
#[derive(Debug, Clone, Default)]
pub struct EncodeConfig {
    pub palette: Palette,
    pub lookup: ColorLookup,
    pub rgb332: Rgb332Mode,
    /// Upper bound on tile/sprite rows; `None` takes all complete rows.
    pub rows: Option<usize>,
}

impl EncodeConfig {
    pub fn quantizer(&self) -> Quantizer<'_> {
        Quantizer::with_lookup(&self.palette, self.lookup)
    }
}

/// The result of encoding a raster in one of the hardware formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    Tiles(Sheet<EncodedTile>),
    Sprites(Sheet<EncodedSprite>),
    Bitmap(EncodedBitmap),
}

impl Encoded {
    pub fn format(&self) -> Format {
        match self {
            Encoded::Tiles(_) => Format::Tile,
            Encoded::Sprites(_) => Format::Sprite,
            Encoded::Bitmap(_) => Format::Bitmap,
        }
    }

    /// Total number of encoded bytes.
    pub fn byte_len(&self) -> usize {
        match self {
            Encoded::Tiles(sheet) => sheet.len() * EncodedTile::SIZE,
            Encoded::Sprites(sheet) => sheet.len() * EncodedSprite::SIZE,
            Encoded::Bitmap(bitmap) => bitmap.len(),
        }
    }
}

/// Encodes `raster` in the given format.
pub fn encode(
    format: Format,
    raster: &Raster<'_>,
    config: &EncodeConfig,
) -> Result<Encoded, EncodeError> {
    let quantizer = config.quantizer();

    Ok(match format {
        Format::Tile => Encoded::Tiles(Sheet::encode(raster, &quantizer, config.rows)?),
        Format::Sprite => Encoded::Sprites(Sheet::encode(raster, &quantizer, config.rows)?),
        Format::Bitmap => {
            Encoded::Bitmap(EncodedBitmap::encode(raster, &quantizer, config.rgb332)?)
        }
    })
}
