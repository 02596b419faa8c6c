use crate::{
    consts::{ALPHA_THRESHOLD, SPRITE_DIM, SPRITE_SIZE, SPRITE_TRANSPARENT},
    encode::Block,
    palette::Quantizer,
    raster::Raster,
};

/// A 16×16 sprite, one byte per pixel: a palette index or [`SPRITE_TRANSPARENT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedSprite(pub [u8; SPRITE_SIZE]);

impl EncodedSprite {
    /// Palette index of the pixel at `(x, y)`, `None` if it is transparent.
    ///
    /// # Panics
    ///
    /// If `x` or `y` is not below 16.
    pub fn index_at(&self, x: usize, y: usize) -> Option<u8> {
        assert!(x < SPRITE_DIM && y < SPRITE_DIM, "pixel outside of sprite");

        match self.0[y * SPRITE_DIM + x] {
            SPRITE_TRANSPARENT => None,
            index => Some(index),
        }
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.0.iter().all(|&b| b == SPRITE_TRANSPARENT)
    }
}

impl Block for EncodedSprite {
    const DIM: usize = SPRITE_DIM;
    const SIZE: usize = SPRITE_SIZE;

    fn encode(quantizer: &Quantizer<'_>, raster: &Raster<'_>, x: usize, y: usize) -> Self {
        let mut bytes = [SPRITE_TRANSPARENT; SPRITE_SIZE];

        for (i, byte) in bytes.iter_mut().enumerate() {
            // past the edge stays transparent
            let Some([r, g, b, a]) = raster.get(x + i % SPRITE_DIM, y + i / SPRITE_DIM) else {
                continue;
            };

            if a >= ALPHA_THRESHOLD {
                *byte = quantizer.index([r, g, b]);
            }
        }

        Self(bytes)
    }

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
