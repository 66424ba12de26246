use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::ops::Range;

use log::{
    debug,
    trace,
};
use shared::bitmap::PixelSource;
use shared::types::FontError;

use crate::packer::pack;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub character: char,
    pub width: usize,
    pub start: usize,
    pub end: usize,
}

impl Glyph {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Packed bytes of every glyph, back to back, no header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontBlob(Vec<u8>);

impl FontBlob {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// # Panics
    ///
    /// When `range` reaches past the end of the blob. Ranges from a table
    /// built over this blob never do.
    pub fn slice(&self, range: Range<usize>) -> &[u8] {
        &self.0[range]
    }
}

#[derive(Debug, Clone)]
pub struct EncodedFont {
    pub blob: FontBlob,
    pub glyphs: Vec<Glyph>,
    /// Widest glyph.
    pub width: usize,
    pub height: usize,
}

pub struct GlyphEncoder {
    height: usize,
    width: usize,
    blob: Vec<u8>,
    glyphs: Vec<Glyph>,
    seen: BTreeSet<char>,
}

impl GlyphEncoder {
    pub fn new(height: usize) -> Self {
        Self {
            height,
            width: 0,
            blob: Vec::new(),
            glyphs: Vec::new(),
            seen: BTreeSet::new(),
        }
    }

    /// Packs `bitmap` onto the end of the blob and records where it landed.
    pub fn push<S: PixelSource + ?Sized>(
        &mut self,
        character: char,
        bitmap: &S,
    ) -> Result<&Glyph, FontError> {
        if bitmap.height() != self.height {
            return Err(FontError::HeightMismatch {
                character,
                expected: self.height,
                found: bitmap.height(),
            });
        }
        check_pixels(bitmap)?;
        if !self.seen.insert(character) {
            return Err(FontError::DuplicateGlyph(character));
        }

        let start = self.blob.len();
        self.blob.extend(pack(bitmap));
        let glyph = Glyph {
            character,
            width: bitmap.width(),
            start,
            end: self.blob.len(),
        };
        trace!("glyph {:?}: {}px wide, bytes {:?}", character, glyph.width, glyph.range());

        self.width = self.width.max(glyph.width);
        self.glyphs.push(glyph);
        Ok(&self.glyphs[self.glyphs.len() - 1])
    }

    pub fn finish(self) -> EncodedFont {
        debug!(
            "encoded {} glyphs into {} bytes ({}x{})",
            self.glyphs.len(),
            self.blob.len(),
            self.width,
            self.height
        );
        EncodedFont {
            blob: FontBlob(self.blob),
            glyphs: self.glyphs,
            width: self.width,
            height: self.height,
        }
    }
}

/// Encodes `glyphs` in iteration order. Any bad bitmap fails the whole font.
pub fn encode<'a, S, I>(height: usize, glyphs: I) -> Result<EncodedFont, FontError>
where
    S: PixelSource + ?Sized + 'a,
    I: IntoIterator<Item = (char, &'a S)>,
{
    let mut encoder = GlyphEncoder::new(height);
    for (character, bitmap) in glyphs {
        encoder.push(character, bitmap)?;
    }
    Ok(encoder.finish())
}

fn check_pixels<S: PixelSource + ?Sized>(bitmap: &S) -> Result<(), FontError> {
    let width = bitmap.width();
    for row in 0..bitmap.height() {
        for col in 0..width {
            let value = bitmap.pixel(row, col);
            if value > 1 {
                return Err(FontError::InvalidPixel {
                    index: row * width + col,
                    value,
                });
            }
        }
    }
    Ok(())
}
