use crate::{
    consts::{BANK_SIZE, LAYER2_HEIGHT, LAYER2_WIDTH},
    encode::{EmptyImageSnafu, EncodeError, FullHeightRequiredSnafu, TooLargeSnafu},
    palette::Quantizer,
    partition::{self, Bank},
    raster::Raster,
    utils::rgb888_to_rgb332,
    Rgb332Mode,
};
use alloc::vec::Vec;
use snafu::ensure;

/// A Layer2 image: one RGB332 byte per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl EncodedBitmap {
    /// Encodes a raster of at most 256×192 pixels.
    pub fn encode(
        raster: &Raster<'_>,
        quantizer: &Quantizer<'_>,
        mode: Rgb332Mode,
    ) -> Result<Self, EncodeError> {
        let (width, height) = (raster.width(), raster.height());

        ensure!(!raster.is_empty(), EmptyImageSnafu);
        ensure!(
            width <= LAYER2_WIDTH && height <= LAYER2_HEIGHT,
            TooLargeSnafu {
                width,
                height,
                max_width: LAYER2_WIDTH,
                max_height: LAYER2_HEIGHT,
            }
        );

        let data = match mode {
            Rgb332Mode::Palette => raster
                .pixels()
                .map(|[r, g, b, _]| quantizer.hardware_byte([r, g, b]))
                .collect(),
            Rgb332Mode::Truncate => raster
                .pixels()
                .map(|[r, g, b, _]| rgb888_to_rgb332([r, g, b]))
                .collect(),
        };

        log::debug!("encoded {width}x{height} bitmap ({mode:?})");

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Encodes a raster for the paged assembler path, which needs full 192-line columns.
    pub fn encode_full_height(
        raster: &Raster<'_>,
        quantizer: &Quantizer<'_>,
        mode: Rgb332Mode,
    ) -> Result<Self, EncodeError> {
        ensure!(
            raster.height() == LAYER2_HEIGHT,
            FullHeightRequiredSnafu {
                height: raster.height(),
                required: LAYER2_HEIGHT,
            }
        );

        Self::encode(raster, quantizer, mode)
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Whether this covers the whole 256×192 Layer2 screen.
    pub const fn is_full_screen(&self) -> bool {
        self.width == LAYER2_WIDTH && self.height == LAYER2_HEIGHT
    }

    /// The image split into 8K banks.
    pub fn banks(&self) -> impl ExactSizeIterator<Item = Bank<'_>> + '_ {
        partition::banks(&self.data)
    }

    /// Number of 8K banks the image occupies.
    pub fn bank_count(&self) -> usize {
        crate::utils::chunk_count(self.data.len(), BANK_SIZE)
    }
}
