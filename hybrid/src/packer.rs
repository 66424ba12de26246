//! Vertical 1bpp packing for column-scanned display controllers.
//!
//! Each output byte holds 8 stacked pixels of one column: bit 7 is the top
//! row of the band, bit 0 the bottom. Bands run top to bottom, columns left
//! to right within a band:
//!
//! ```text
//!     | MSB | MSB |  | MSB |
//!     |  :  |  :  |..|  :  | --.
//!     | LSB | LSB |  | LSB |   |
//! .--------------------------'
//! |   | MSB | MSB |
//! '-> |  :  |  :  |..
//!     | LSB | LSB |
//! ```
//!
//! Bytes are inverted before output (the controller lights a pixel on 0).
//! Rows past the bitmap's bottom edge pack as 0 and so come out as 1.

use core::iter::FusedIterator;

use shared::bitmap::PixelSource;

pub const BAND_ROWS: usize = 8;

pub fn packed_len(width: usize, height: usize) -> usize {
    width * height.div_ceil(BAND_ROWS)
}

pub fn pack<S: PixelSource + ?Sized>(src: &S) -> Packed<'_, S> {
    Packed {
        src,
        index: 0,
        len: packed_len(src.width(), src.height()),
    }
}

/// Lazily packed bytes of one bitmap. Clone it to restart.
pub struct Packed<'a, S: ?Sized> {
    src: &'a S,
    index: usize,
    len: usize,
}

impl<S: ?Sized> Clone for Packed<'_, S> {
    fn clone(&self) -> Self {
        Self {
            src: self.src,
            index: self.index,
            len: self.len,
        }
    }
}

impl<S: PixelSource + ?Sized> Iterator for Packed<'_, S> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.index >= self.len {
            return None;
        }
        let width = self.src.width();
        let band = self.index / width;
        let col = self.index % width;
        self.index += 1;
        Some(pack_column(self.src, band * BAND_ROWS, col))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<S: PixelSource + ?Sized> ExactSizeIterator for Packed<'_, S> {}

impl<S: PixelSource + ?Sized> FusedIterator for Packed<'_, S> {}

fn pack_column<S: PixelSource + ?Sized>(src: &S, row_start: usize, col: usize) -> u8 {
    let mut acc = 0u8;
    for i in 0..BAND_ROWS {
        let row = row_start + i;
        if row >= src.height() {
            break;
        }
        acc |= (src.pixel(row, col) & 1) << (7 - i);
    }
    0xff ^ acc
}
