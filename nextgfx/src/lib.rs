//! Asset encoder for the ZX Spectrum Next graphics hardware.
//!
//! Converts true-color rasters into the three pixel formats the Next consumes directly, and
//! renders the encoded bytes as C header declarations or z88dk assembler sections.
//!
//! # Formats
//!
//! | Format | Unit size          | Byte meaning                      | Transparency |
//! |--------|--------------------|-----------------------------------|--------------|
//! | Tile   | 32 B (8×8, 4-bit)  | packed palette-index nibble pairs | none         |
//! | Sprite | 256 B (16×16)      | raw palette index                 | `0xE3`       |
//! | Bitmap | 1 B/pixel          | RGB332                            | none         |
//!
//! ## Tiles
//!
//! ```plain
//! .- tile byte -------------.
//! |  7  6  5  4  3  2  1  0 |
//! |-----------+-------------|
//! |   left    |    right    |
//! `-------------------------`
//! ```
//!
//! Each 8×8 tile is stored as 8 rows of 4 bytes, rows top to bottom, pixel pairs left to right.
//!
//! ## Sprites
//!
//! One byte per pixel, row-major. Pixels with alpha below 128 become
//! [`SPRITE_TRANSPARENT`](consts::SPRITE_TRANSPARENT), all others the palette index of the
//! nearest palette color.
//!
//! ## Bitmaps
//!
//! One RGB332 byte per pixel (`RRRGGGBB`), row-major. The byte comes either from the palette's
//! hardware table ([`Rgb332Mode::Palette`]) or from plain bit truncation
//! ([`Rgb332Mode::Truncate`]). A full 256×192 Layer2 screen is 49152 bytes, exactly six 8K
//! banks.
//!
//! # Pipeline
//!
//! [`Raster`] → [`Quantizer`] → [`encode`] → [`partition`] → [`emit`].
//! Every stage is a pure function of its inputs; only the caller performs I/O on the result.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod encode;
pub mod palette;
pub mod raster;
pub mod utils;

#[cfg(feature = "std")]
pub mod emit;
#[cfg(feature = "alloc")]
pub mod extract;
#[cfg(feature = "alloc")]
pub mod partition;

pub use encode::{EncodedSprite, EncodedTile};
#[cfg(feature = "alloc")]
pub use encode::{EncodeConfig, Encoded, EncodedBitmap, Sheet};
pub use palette::{ColorLookup, Palette, Quantizer};
pub use raster::{PixelLayout, Raster};

use core::{fmt, str::FromStr};

/// Hardware pixel format an image is exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// 8×8 blocks, two 4-bit palette indices per byte.
    Tile,
    /// 16×16 blocks, one palette index (or the transparency sentinel) per byte.
    Sprite,
    /// Whole image, one RGB332 byte per pixel.
    Bitmap,
}

impl FromStr for Format {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[rustfmt::skip]
        let Some(format) = ["tile", "tiles"].iter().any(|n| s.eq_ignore_ascii_case(n)).then_some(Format::Tile)
            .or_else(|| ["sprite", "sprites"].iter().any(|n| s.eq_ignore_ascii_case(n)).then_some(Format::Sprite))
            .or_else(|| ["bitmap", "layer2"].iter().any(|n| s.eq_ignore_ascii_case(n)).then_some(Format::Bitmap))
        else { return Err("expected one of: tile, sprite, bitmap"); };

        Ok(format)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Tile => "tile",
            Format::Sprite => "sprite",
            Format::Bitmap => "bitmap",
        })
    }
}

/// Selects how bitmap pixels become RGB332 bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rgb332Mode {
    /// Quantize to the palette, then look the index up in the palette's hardware table.
    #[default]
    Palette,
    /// Keep the top 3/3/2 bits of each channel. Ignores the palette entirely.
    Truncate,
}

pub mod consts {
    /// Edge length of a tile, in pixels.
    pub const TILE_DIM: usize = 8;
    /// Bytes per encoded tile: 8×8 pixels at 4 bits each.
    pub const TILE_SIZE: usize = TILE_DIM * TILE_DIM / 2;

    /// Edge length of a sprite, in pixels.
    pub const SPRITE_DIM: usize = 16;
    /// Bytes per encoded sprite: 16×16 pixels at 8 bits each.
    pub const SPRITE_SIZE: usize = SPRITE_DIM * SPRITE_DIM;

    /// Sprite byte the hardware skips when drawing.
    ///
    /// Shares its value with bright magenta in RGB332, but sprite bytes are palette indices
    /// (0..=15), so the two can never collide.
    pub const SPRITE_TRANSPARENT: u8 = 0xE3;

    /// Alpha values below this make a sprite pixel transparent.
    pub const ALPHA_THRESHOLD: u8 = 128;

    /// Layer2 screen width in the 256×192 mode.
    pub const LAYER2_WIDTH: usize = 256;
    /// Layer2 screen height in the 256×192 mode.
    pub const LAYER2_HEIGHT: usize = 192;

    /// Size of one MMU bank (and the default page size).
    pub const BANK_SIZE: usize = 8192;

    /// First 8K bank of the default Layer2 buffer (16K bank 8).
    pub const LAYER2_FIRST_BANK: usize = 16;

    /// Number of palette entries addressable by a 4-bit index.
    pub const PALETTE_LEN: usize = 16;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_aliases() {
        assert_eq!("TILE".parse::<Format>(), Ok(Format::Tile));
        assert_eq!("sprites".parse::<Format>(), Ok(Format::Sprite));
        assert_eq!("layer2".parse::<Format>(), Ok(Format::Bitmap));
        assert!("png".parse::<Format>().is_err());
    }

    #[test]
    fn format_display_parses_back() {
        for format in [Format::Tile, Format::Sprite, Format::Bitmap] {
            assert_eq!(format.to_string().parse::<Format>(), Ok(format));
        }
    }
}
