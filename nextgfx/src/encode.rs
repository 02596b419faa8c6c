use crate::{palette::Quantizer, raster::Raster};
use snafu::Snafu;

mod sprite;
mod tile;

pub use sprite::EncodedSprite;
pub use tile::EncodedTile;

#[cfg(feature = "alloc")]
mod alloc_api;
#[cfg(feature = "alloc")]
mod bitmap;

#[cfg(feature = "alloc")]
pub use alloc_api::*;
#[cfg(feature = "alloc")]
pub use bitmap::EncodedBitmap;

#[derive(Debug, Snafu)]
pub enum EncodeError {
    #[snafu(display(
        "Image is {width}x{height}, but at most {max_width}x{max_height} is supported"
    ))]
    TooLarge {
        width: usize,
        height: usize,
        max_width: usize,
        max_height: usize,
    },
    #[snafu(display("Image has no pixels"))]
    EmptyImage,
    #[snafu(display("Image height must be exactly {required} pixels, got {height}"))]
    FullHeightRequired { height: usize, required: usize },
    #[snafu(display(
        "A {width}x{height} image holds no complete {block}x{block} block"
    ))]
    NoCompleteBlocks {
        width: usize,
        height: usize,
        block: usize,
    },
}

/// A fixed-size hardware block cut from a grid laid over the raster.
pub trait Block: Sized {
    /// Edge length in pixels.
    const DIM: usize;
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Encodes the block whose top-left pixel is at `(x, y)`. Pixels past the raster edge are
    /// padding.
    fn encode(quantizer: &Quantizer<'_>, raster: &Raster<'_>, x: usize, y: usize) -> Self;

    fn as_bytes(&self) -> &[u8];

    /// Encodes the block at grid position `(col, row)`.
    #[inline]
    fn encode_cell(quantizer: &Quantizer<'_>, raster: &Raster<'_>, col: usize, row: usize) -> Self {
        Self::encode(quantizer, raster, col * Self::DIM, row * Self::DIM)
    }
}
