use alloc::collections::BTreeMap;

use shared::types::FontError;

use crate::encoder::{
    EncodedFont,
    FontBlob,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthEntry {
    pub start: usize,
    pub end: usize,
    pub width: usize,
}

/// Character to byte range and advance width; one global height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidthTable {
    entries: BTreeMap<char, WidthEntry>,
    height: usize,
    fallback: char,
}

impl WidthTable {
    pub(super) fn from_glyphs(font: &EncodedFont, fallback: char) -> Result<Self, FontError> {
        let entries: BTreeMap<char, WidthEntry> = font
            .glyphs
            .iter()
            .map(|g| {
                let entry = WidthEntry {
                    start: g.start,
                    end: g.end,
                    width: g.width,
                };
                (g.character, entry)
            })
            .collect();
        if !entries.contains_key(&fallback) {
            return Err(FontError::MissingFallback(fallback));
        }
        Ok(Self {
            entries,
            height: font.height,
            fallback,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn fallback(&self) -> char {
        self.fallback
    }

    /// Entries ordered by character.
    pub fn entries(&self) -> impl Iterator<Item = (char, WidthEntry)> + '_ {
        self.entries.iter().map(|(&c, &e)| (c, e))
    }

    pub fn fallback_entry(&self) -> WidthEntry {
        self.entries[&self.fallback]
    }

    pub fn entry(&self, ch: char) -> WidthEntry {
        self.entries
            .get(&ch)
            .copied()
            .unwrap_or_else(|| self.fallback_entry())
    }

    pub fn get_ch<'b>(&self, blob: &'b FontBlob, ch: char) -> (&'b [u8], usize) {
        let entry = self.entry(ch);
        (blob.slice(entry.start..entry.end), entry.width)
    }

    /// Advance of `s` in pixels.
    pub fn str_width(&self, s: &str) -> usize {
        s.chars().map(|ch| self.entry(ch).width).sum()
    }
}
