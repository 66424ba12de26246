use alloc::vec::Vec;

use shared::types::FontError;

use crate::encoder::{
    EncodedFont,
    FontBlob,
};

/// Characters in encoding order beside the cumulative end offset of each
/// glyph; entry `i` starts where entry `i - 1` ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedTable {
    chars: Vec<char>,
    ends: Vec<usize>,
    width: usize,
    height: usize,
    fallback: usize,
}

impl FixedTable {
    pub(super) fn from_glyphs(font: &EncodedFont, fallback: char) -> Result<Self, FontError> {
        let chars: Vec<char> = font.glyphs.iter().map(|g| g.character).collect();
        let ends = font.glyphs.iter().map(|g| g.end).collect();
        let fallback = chars
            .iter()
            .position(|&c| c == fallback)
            .ok_or(FontError::MissingFallback(fallback))?;
        Ok(Self {
            chars,
            ends,
            width: font.width,
            height: font.height,
            fallback,
        })
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn ends(&self) -> &[usize] {
        &self.ends
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn fallback(&self) -> char {
        self.chars[self.fallback]
    }

    pub(crate) fn fallback_index(&self) -> usize {
        self.fallback
    }

    /// Position of `ch`, or of the fallback glyph when `ch` is unknown.
    pub fn index_of(&self, ch: char) -> usize {
        self.chars
            .iter()
            .position(|&c| c == ch)
            .unwrap_or(self.fallback)
    }

    pub fn range(&self, i: usize) -> core::ops::Range<usize> {
        let start = if i > 0 { self.ends[i - 1] } else { 0 };
        start..self.ends[i]
    }

    pub fn get_ch<'b>(&self, blob: &'b FontBlob, ch: char) -> &'b [u8] {
        blob.slice(self.range(self.index_of(ch)))
    }
}
