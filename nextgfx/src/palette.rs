use crate::{consts::PALETTE_LEN, utils::rgb888_to_rgb332};

/// A 16-entry target palette together with its hardware representation.
///
/// Entries are addressed by their 4-bit index and are never reordered or deduplicated: the
/// built-in ZX Spectrum palette has black at both index 0 and index 8, and both indices are
/// valid output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    /// RGB888 color of each index.
    pub colors: [[u8; 3]; PALETTE_LEN],
    /// RGB332 byte the hardware uses for each index.
    pub hardware: [u8; PALETTE_LEN],
}

impl Palette {
    /// The classic ZX Spectrum palette, normal intensity at 0..=7 and bright at 8..=15.
    pub const ZX_SPECTRUM: Palette = Palette {
        colors: [
            [0, 0, 0],       // black
            [0, 0, 192],     // blue
            [192, 0, 0],     // red
            [192, 0, 192],   // magenta
            [0, 192, 0],     // green
            [0, 192, 192],   // cyan
            [192, 192, 0],   // yellow
            [192, 192, 192], // white
            [0, 0, 0],       // bright black
            [0, 0, 255],     // bright blue
            [255, 0, 0],     // bright red
            [255, 0, 255],   // bright magenta
            [0, 255, 0],     // bright green
            [0, 255, 255],   // bright cyan
            [255, 255, 0],   // bright yellow
            [255, 255, 255], // bright white
        ],
        hardware: [
            0x00, 0x02, 0xC0, 0xC2, 0x18, 0x1A, 0xD8, 0xDA, //
            0x00, 0x03, 0xE0, 0xE3, 0x1C, 0x1F, 0xFC, 0xFF,
        ],
    };

    pub const fn new(colors: [[u8; 3]; PALETTE_LEN], hardware: [u8; PALETTE_LEN]) -> Self {
        Self { colors, hardware }
    }

    /// Builds a palette whose hardware bytes are the RGB332 truncation of each color.
    pub const fn with_truncated_hardware(colors: [[u8; 3]; PALETTE_LEN]) -> Self {
        let mut hardware = [0; PALETTE_LEN];
        let mut i = 0;
        while i < PALETTE_LEN {
            hardware[i] = rgb888_to_rgb332(colors[i]);
            i += 1;
        }

        Self { colors, hardware }
    }

    /// Index of the palette color closest to `rgb` by squared euclidean distance.
    ///
    /// Ties go to the lowest index, so an exact match on black always yields 0, never 8.
    pub fn nearest(&self, [r, g, b]: [u8; 3]) -> u8 {
        let mut best = 0;
        let mut best_dist = u32::MAX;

        for (i, &[pr, pg, pb]) in self.colors.iter().enumerate() {
            let dist = sq_diff(r, pr) + sq_diff(g, pg) + sq_diff(b, pb);
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }

        best as u8
    }

    /// Index of the first palette entry exactly equal to `rgb`, if any.
    pub fn exact(&self, rgb: [u8; 3]) -> Option<u8> {
        self.colors
            .iter()
            .position(|&color| color == rgb)
            .map(|i| i as u8)
    }

    /// RGB332 byte of a palette index. Only the low 4 bits of `index` are used.
    #[inline]
    pub const fn hardware_byte(&self, index: u8) -> u8 {
        self.hardware[(index & 0x0F) as usize]
    }

    /// RGB888 color of a palette index. Only the low 4 bits of `index` are used.
    #[inline]
    pub const fn color(&self, index: u8) -> [u8; 3] {
        self.colors[(index & 0x0F) as usize]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::ZX_SPECTRUM
    }
}

#[inline]
const fn sq_diff(a: u8, b: u8) -> u32 {
    let d = a.abs_diff(b) as u32;
    d * d
}

/// How a color that is not in the palette is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorLookup {
    /// Nearest palette color. Always resolves.
    #[default]
    Nearest,
    /// Exact match only; anything else maps to index 0.
    Exact,
}

/// Maps RGB colors to palette indices.
#[derive(Debug, Clone, Copy)]
pub struct Quantizer<'p> {
    pub palette: &'p Palette,
    pub lookup: ColorLookup,
}

impl<'p> Quantizer<'p> {
    pub const fn new(palette: &'p Palette) -> Self {
        Self {
            palette,
            lookup: ColorLookup::Nearest,
        }
    }

    pub const fn with_lookup(palette: &'p Palette, lookup: ColorLookup) -> Self {
        Self { palette, lookup }
    }

    /// Palette index for `rgb`. Always in `0..16`.
    #[inline]
    pub fn index(&self, rgb: [u8; 3]) -> u8 {
        match self.lookup {
            ColorLookup::Nearest => self.palette.nearest(rgb),
            ColorLookup::Exact => self.palette.exact(rgb).unwrap_or(0),
        }
    }

    /// RGB332 hardware byte for `rgb`, going through the palette.
    #[inline]
    pub fn hardware_byte(&self, rgb: [u8; 3]) -> u8 {
        self.palette.hardware_byte(self.index(rgb))
    }
}
