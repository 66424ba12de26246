use alloc::vec::Vec;

use crate::types::FontError;

/// Read access to a 1-bit glyph image, row 0 at the top.
pub trait PixelSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// `0` or `1`.
    fn pixel(&self, row: usize, col: usize) -> u8;
}

/// Row-major glyph pixels, one byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBitmap {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl PixelBitmap {
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, FontError> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(FontError::MalformedBitmap {
                width,
                height,
                len: pixels.len(),
            });
        }
        if let Some((index, &value)) = pixels.iter().enumerate().find(|&(_, &p)| p > 1) {
            return Err(FontError::InvalidPixel { index, value });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                pixels.push(f(row, col) as u8);
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl PixelSource for PixelBitmap {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel(&self, row: usize, col: usize) -> u8 {
        self.pixels[row * self.width + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn rejects_length_mismatch() {
        let err = PixelBitmap::new(3, 2, vec![0; 5]).unwrap_err();
        assert_eq!(
            err,
            FontError::MalformedBitmap {
                width: 3,
                height: 2,
                len: 5
            }
        );
    }

    #[test]
    fn rejects_non_binary_pixels() {
        let err = PixelBitmap::new(2, 1, vec![1, 2]).unwrap_err();
        assert_eq!(err, FontError::InvalidPixel { index: 1, value: 2 });
    }

    #[test]
    fn row_major_access() {
        let bmp = PixelBitmap::new(2, 2, vec![0, 1, 1, 0]).unwrap();
        assert_eq!(bmp.pixel(0, 1), 1);
        assert_eq!(bmp.pixel(1, 0), 1);
        assert_eq!(bmp.pixel(1, 1), 0);
    }

    #[test]
    fn zero_width_is_valid() {
        let bmp = PixelBitmap::new(0, 8, Vec::new()).unwrap();
        assert_eq!(bmp.width(), 0);
        assert_eq!(bmp.height(), 8);
    }
}
