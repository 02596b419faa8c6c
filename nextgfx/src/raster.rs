use snafu::{ensure, Snafu};

/// Channel layout of a raster buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// 3 bytes per pixel. Reads as fully opaque.
    Rgb,
    /// 4 bytes per pixel.
    Rgba,
}

impl PixelLayout {
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }
}

#[derive(Debug, Snafu)]
pub enum RasterError {
    #[snafu(display(
        "Raster dimensions don't match the buffer: {width} * {height} pixels need {expected} bytes, but {actual} bytes were given"
    ))]
    InvalidDimensions {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

/// Read-only view of an 8-bit RGB or RGBA image, origin top-left, row-major.
#[derive(Debug, Clone, Copy)]
pub struct Raster<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    /// Distance between the starts of two rows, in pixels.
    stride: usize,
    layout: PixelLayout,
}

impl<'a> Raster<'a> {
    pub fn new(
        width: usize,
        height: usize,
        layout: PixelLayout,
        data: &'a [u8],
    ) -> Result<Self, RasterError> {
        let expected = width * height * layout.channels();
        ensure!(
            data.len() == expected,
            InvalidDimensionsSnafu {
                width,
                height,
                expected,
                actual: data.len(),
            }
        );

        Ok(Self {
            data,
            width,
            height,
            stride: width,
            layout,
        })
    }

    pub fn rgba(width: usize, height: usize, data: &'a [u8]) -> Result<Self, RasterError> {
        Self::new(width, height, PixelLayout::Rgba, data)
    }

    pub fn rgb(width: usize, height: usize, data: &'a [u8]) -> Result<Self, RasterError> {
        Self::new(width, height, PixelLayout::Rgb, data)
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
    pub const fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Number of pixels in the view.
    #[inline]
    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// RGBA pixel at `(x, y)`, or `None` outside the view.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let channels = self.layout.channels();
        let start = (y * self.stride + x) * channels;
        let p = &self.data[start..start + channels];

        Some(match self.layout {
            PixelLayout::Rgb => [p[0], p[1], p[2], 0xFF],
            PixelLayout::Rgba => [p[0], p[1], p[2], p[3]],
        })
    }

    /// RGB part of the pixel at `(x, y)`, or `None` outside the view.
    #[inline]
    pub fn rgb_at(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        self.get(x, y).map(|[r, g, b, _]| [r, g, b])
    }

    /// Sub-view of at most `width` × `height` pixels anchored at the top-left corner.
    pub fn crop(&self, width: usize, height: usize) -> Raster<'a> {
        Raster {
            width: self.width.min(width),
            height: self.height.min(height),
            ..*self
        }
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        itertools::iproduct!(0..self.height, 0..self.width).map(move |(y, x)| {
            // in range by construction
            self.get(x, y).unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        let data = [0u8; 11];
        let err = Raster::rgb(2, 2, &data).unwrap_err();
        assert!(matches!(
            err,
            RasterError::InvalidDimensions {
                expected: 12,
                actual: 11,
                ..
            }
        ));
    }

    #[test]
    fn rgb_reads_opaque() {
        let data = [1, 2, 3, 4, 5, 6];
        let raster = Raster::rgb(2, 1, &data).unwrap();
        assert_eq!(raster.get(1, 0), Some([4, 5, 6, 255]));
        assert_eq!(raster.get(2, 0), None);
    }

    #[test]
    fn crop_keeps_stride() {
        // 3x2 RGBA, pixel value = x + 10 * y
        let data: Vec<u8> = (0..2)
            .flat_map(|y| (0..3).flat_map(move |x| [x + 10 * y, 0, 0, 255]))
            .collect();
        let raster = Raster::rgba(3, 2, &data).unwrap();
        let cropped = raster.crop(2, 5);

        assert_eq!((cropped.width(), cropped.height()), (2, 2));
        assert_eq!(cropped.get(1, 1), Some([11, 0, 0, 255]));
        assert_eq!(cropped.get(2, 1), None);
        assert_eq!(
            cropped.pixels().map(|p| p[0]).collect::<Vec<_>>(),
            [0, 1, 10, 11]
        );
    }
}
