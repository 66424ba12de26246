use log::debug;
use shared::types::FontError;

use crate::encoder::EncodedFont;

mod fixed;
mod width;

pub use fixed::FixedTable;
pub use width::{
    WidthEntry,
    WidthTable,
};

pub const DEFAULT_FALLBACK: char = '?';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Parallel character / cumulative end-offset arrays, one global width.
    Fixed,
    /// Character to `(start, end, width)` mapping for proportional text.
    WidthAware,
}

#[derive(Debug, Clone)]
pub enum LookupTable {
    Fixed(FixedTable),
    WidthAware(WidthTable),
}

impl LookupTable {
    pub fn height(&self) -> usize {
        match self {
            LookupTable::Fixed(t) => t.height(),
            LookupTable::WidthAware(t) => t.height(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            LookupTable::Fixed(t) => t.chars().len(),
            LookupTable::WidthAware(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct TableBuilder<'a> {
    font: &'a EncodedFont,
    fallback: char,
}

impl<'a> TableBuilder<'a> {
    pub fn new(font: &'a EncodedFont) -> Self {
        Self {
            font,
            fallback: DEFAULT_FALLBACK,
        }
    }

    pub fn fallback(mut self, fallback: char) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn build(self, kind: TableKind) -> Result<LookupTable, FontError> {
        match kind {
            TableKind::Fixed => self.fixed().map(LookupTable::Fixed),
            TableKind::WidthAware => self.width_aware().map(LookupTable::WidthAware),
        }
    }

    pub fn fixed(self) -> Result<FixedTable, FontError> {
        self.check()?;
        let table = FixedTable::from_glyphs(self.font, self.fallback)?;
        debug!("fixed table: {} entries", table.chars().len());
        Ok(table)
    }

    pub fn width_aware(self) -> Result<WidthTable, FontError> {
        self.check()?;
        let table = WidthTable::from_glyphs(self.font, self.fallback)?;
        debug!("width-aware table: {} entries", table.len());
        Ok(table)
    }

    /// Ranges must tile the blob in append order.
    fn check(&self) -> Result<(), FontError> {
        let mut expected = 0;
        for glyph in &self.font.glyphs {
            if glyph.start != expected || glyph.end < glyph.start {
                return Err(FontError::NonContiguous(glyph.character));
            }
            expected = glyph.end;
        }
        match self.font.glyphs.last() {
            Some(last) if expected != self.font.blob.len() => {
                Err(FontError::NonContiguous(last.character))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec;
    use shared::bitmap::PixelBitmap;

    use crate::encoder::encode;

    /// `0` and `1` blank and 1px wide, `?` solid, 8 rows.
    pub(crate) fn clock_font() -> EncodedFont {
        let blank = PixelBitmap::new(1, 8, vec![0; 8]).unwrap();
        let solid = PixelBitmap::new(1, 8, vec![1; 8]).unwrap();
        encode(8, [('0', &blank), ('1', &blank), ('?', &solid)]).unwrap()
    }

    #[test]
    fn missing_fallback_is_fatal_for_both_kinds() {
        let blank = PixelBitmap::new(1, 8, vec![0; 8]).unwrap();
        let font = encode(8, [('0', &blank)]).unwrap();
        for kind in [TableKind::Fixed, TableKind::WidthAware] {
            let err = TableBuilder::new(&font).build(kind).unwrap_err();
            assert_eq!(err, FontError::MissingFallback('?'));
        }
    }

    #[test]
    fn empty_font_lacks_fallback() {
        let font = encode::<PixelBitmap, _>(8, []).unwrap();
        assert!(font.blob.is_empty());
        let err = TableBuilder::new(&font).fixed().unwrap_err();
        assert_eq!(err, FontError::MissingFallback('?'));
    }

    #[test]
    fn custom_fallback() {
        let font = clock_font();
        let table = TableBuilder::new(&font).fallback('0').fixed().unwrap();
        assert_eq!(table.fallback(), '0');
        assert!(TableBuilder::new(&font).fallback('#').fixed().is_err());
    }

    #[test]
    fn rejects_tampered_ranges() {
        let mut font = clock_font();
        font.glyphs[1].start = 0;
        let err = TableBuilder::new(&font).fixed().unwrap_err();
        assert_eq!(err, FontError::NonContiguous('1'));

        let mut font = clock_font();
        font.glyphs.pop();
        let err = TableBuilder::new(&font).width_aware().unwrap_err();
        assert_eq!(err, FontError::NonContiguous('1'));
    }

    #[test]
    fn build_dispatches_on_kind() {
        let font = clock_font();
        let fixed = TableBuilder::new(&font).build(TableKind::Fixed).unwrap();
        assert!(matches!(fixed, LookupTable::Fixed(_)));
        let width = TableBuilder::new(&font).build(TableKind::WidthAware).unwrap();
        assert!(matches!(width, LookupTable::WidthAware(_)));
        assert_eq!(width.len(), 3);
        assert_eq!(width.height(), 8);
    }
}
