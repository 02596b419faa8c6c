use crate::{
    consts::{TILE_DIM, TILE_SIZE},
    encode::Block,
    palette::Quantizer,
    raster::Raster,
    utils::{pack_nibbles, unpack_nibbles},
};

const BYTES_PER_ROW: usize = TILE_DIM / 2;

/// Color read for pixels past the raster edge.
const PADDING: [u8; 3] = [0, 0, 0];

/// An 8×8 tile, 4 bits per pixel: 8 rows of 4 bytes, left pixel of each pair in the high
/// nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedTile(pub [u8; TILE_SIZE]);

impl EncodedTile {
    /// Palette index of the pixel at `(x, y)` inside the tile.
    ///
    /// # Panics
    ///
    /// If `x` or `y` is not below 8.
    pub fn index_at(&self, x: usize, y: usize) -> u8 {
        assert!(x < TILE_DIM && y < TILE_DIM, "pixel outside of tile");

        let (left, right) = unpack_nibbles(self.0[y * BYTES_PER_ROW + x / 2]);
        if x % 2 == 0 {
            left
        } else {
            right
        }
    }
}

impl Block for EncodedTile {
    const DIM: usize = TILE_DIM;
    const SIZE: usize = TILE_SIZE;

    fn encode(quantizer: &Quantizer<'_>, raster: &Raster<'_>, x: usize, y: usize) -> Self {
        let index = |px: usize, py: usize| quantizer.index(raster.rgb_at(px, py).unwrap_or(PADDING));

        let mut bytes = [0; TILE_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let py = y + i / BYTES_PER_ROW;
            let px = x + (i % BYTES_PER_ROW) * 2;
            *byte = pack_nibbles(index(px, py), index(px + 1, py));
        }

        Self(bytes)
    }

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
