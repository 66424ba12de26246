use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::bitmap::PixelBitmap;
use crate::types::FontError;

pub const MIN_CHAR: u32 = 32;
pub const MAX_CHAR: u32 = 126;
pub const DEFAULT_CHAR: char = '?';

#[derive(Debug, Clone)]
pub struct BdfGlyph {
    pub encoding: u32,
    pub dwidth: Option<i32>,
    pub bbx_w: i32,
    pub bbx_h: i32,
    pub bbx_xoff: i32,
    pub bbx_yoff: i32,
    /// Leftmost pixel in the MSB of the first byte of each row.
    pub rows: Vec<Vec<u8>>,
}

impl BdfGlyph {
    fn bit(&self, x: usize, y: usize) -> bool {
        if x >= self.bbx_w.max(0) as usize {
            return false;
        }
        self.rows
            .get(y)
            .and_then(|row| row.get(x / 8))
            .is_some_and(|&byte| (byte >> (7 - x % 8)) & 1 == 1)
    }

    fn advance(&self) -> usize {
        match self.dwidth {
            Some(w) if w > 0 => w as usize,
            _ => self.bbx_w.max(0) as usize,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BdfFont {
    pub font_ascent: i32,
    pub font_descent: i32,
    glyphs: BTreeMap<u32, BdfGlyph>,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Cell height in pixels; the font's ascent + descent when `None`.
    pub height: Option<usize>,
    pub min_char: u32,
    pub max_char: u32,
    pub charset: Option<String>,
    pub monospaced: bool,
    pub default_char: char,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            height: None,
            min_char: MIN_CHAR,
            max_char: MAX_CHAR,
            charset: None,
            monospaced: false,
            default_char: DEFAULT_CHAR,
        }
    }
}

/// Glyph cells ready for packing, in enumeration order.
#[derive(Debug, Clone)]
pub struct SourceFont {
    pub width: usize,
    pub height: usize,
    pub glyphs: Vec<(char, PixelBitmap)>,
    /// Requested characters the font could not supply.
    pub skipped: Vec<char>,
}

impl BdfFont {
    pub fn glyph(&self, ch: char) -> Option<&BdfGlyph> {
        self.glyphs.get(&(ch as u32))
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn cell_height(&self) -> usize {
        (self.font_ascent + self.font_descent).max(0) as usize
    }

    pub fn render(&self, opts: &LoadOptions) -> SourceFont {
        let height = opts.height.unwrap_or_else(|| self.cell_height());
        let in_range = |ch: char| (opts.min_char..=opts.max_char).contains(&(ch as u32));

        let order: Vec<char> = match &opts.charset {
            Some(charset) => {
                let mut order: Vec<char> = Vec::new();
                for ch in charset.chars().chain(core::iter::once(opts.default_char)) {
                    if !order.contains(&ch) {
                        order.push(ch);
                    }
                }
                order
            }
            None => self
                .glyphs
                .keys()
                .filter_map(|&code| char::from_u32(code))
                .collect(),
        };

        let mut selected = Vec::with_capacity(order.len());
        let mut skipped = Vec::new();
        for ch in order {
            match self.glyph(ch) {
                Some(glyph) if in_range(ch) => selected.push((ch, glyph)),
                _ => skipped.push(ch),
            }
        }

        let width = selected
            .iter()
            .map(|(_, g)| g.advance())
            .max()
            .unwrap_or(0);

        let glyphs = selected
            .into_iter()
            .map(|(ch, g)| {
                let w = if opts.monospaced { width } else { g.advance() };
                (ch, self.place(g, w, height))
            })
            .collect();

        SourceFont {
            width,
            height,
            glyphs,
            skipped,
        }
    }

    fn place(&self, g: &BdfGlyph, width: usize, height: usize) -> PixelBitmap {
        let top = self.font_ascent - g.bbx_yoff - g.bbx_h;
        PixelBitmap::from_fn(width, height, |row, col| {
            let y = row as i32 - top;
            let x = col as i32 - g.bbx_xoff;
            y >= 0 && x >= 0 && g.bit(x as usize, y as usize)
        })
    }
}

pub fn parse(content: &str) -> Result<BdfFont, FontError> {
    let mut font_ascent: Option<i32> = None;
    let mut font_descent: Option<i32> = None;
    let mut bounding_box: Option<[i32; 4]> = None;
    let mut glyphs = BTreeMap::new();
    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

    let first = lines.clone().map(|(_, l)| l).find(|l| !l.is_empty());
    if !first.is_some_and(|l| l.starts_with("STARTFONT")) {
        return Err(parse_error(1, "missing STARTFONT"));
    }

    while let Some((lineno, line)) = lines.next() {
        if let Some(rest) = line.strip_prefix("FONT_ASCENT ") {
            font_ascent = Some(parse_ints::<1>(lineno, rest)?[0]);
        } else if let Some(rest) = line.strip_prefix("FONT_DESCENT ") {
            font_descent = Some(parse_ints::<1>(lineno, rest)?[0]);
        } else if let Some(rest) = line.strip_prefix("FONTBOUNDINGBOX ") {
            bounding_box = Some(parse_ints::<4>(lineno, rest)?);
        } else if line.starts_with("STARTCHAR") {
            if let Some(glyph) = parse_glyph(lineno, &mut lines)? {
                glyphs.insert(glyph.encoding, glyph);
            }
        } else if line == "ENDFONT" {
            break;
        }
    }

    let (font_ascent, font_descent) = match (font_ascent, font_descent, bounding_box) {
        (Some(a), Some(d), _) => (a, d),
        (a, d, Some([_, h, _, yoff])) => (a.unwrap_or(h + yoff), d.unwrap_or(-yoff)),
        _ => return Err(parse_error(0, "no FONT_ASCENT/FONT_DESCENT or FONTBOUNDINGBOX")),
    };

    Ok(BdfFont {
        font_ascent,
        font_descent,
        glyphs,
    })
}

fn parse_glyph<'a>(
    start: usize,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<Option<BdfGlyph>, FontError> {
    let mut encoding: Option<i64> = None;
    let mut dwidth: Option<i32> = None;
    let mut bbx: Option<[i32; 4]> = None;
    let mut rows: Vec<Vec<u8>> = Vec::new();
    let mut in_bitmap = false;

    for (lineno, line) in lines.by_ref() {
        if line == "ENDCHAR" {
            let Some(encoding) = encoding else {
                return Err(parse_error(start, "glyph without ENCODING"));
            };
            // -1 marks an unencoded glyph
            let Ok(encoding) = u32::try_from(encoding) else {
                return Ok(None);
            };
            let [bbx_w, bbx_h, bbx_xoff, bbx_yoff] = bbx.unwrap_or([0; 4]);
            return Ok(Some(BdfGlyph {
                encoding,
                dwidth,
                bbx_w,
                bbx_h,
                bbx_xoff,
                bbx_yoff,
                rows,
            }));
        }

        if in_bitmap {
            rows.push(parse_hex_row(lineno, line)?);
        } else if let Some(rest) = line.strip_prefix("ENCODING ") {
            let first = rest.split_whitespace().next().unwrap_or("");
            encoding = Some(
                first
                    .parse()
                    .map_err(|_| parse_error(lineno, "bad ENCODING"))?,
            );
        } else if let Some(rest) = line.strip_prefix("DWIDTH ") {
            dwidth = Some(parse_ints::<2>(lineno, rest)?[0]);
        } else if let Some(rest) = line.strip_prefix("BBX ") {
            bbx = Some(parse_ints::<4>(lineno, rest)?);
        } else if line == "BITMAP" {
            if bbx.is_none() {
                return Err(parse_error(lineno, "BITMAP before BBX"));
            }
            in_bitmap = true;
        }
    }

    Err(parse_error(start, "STARTCHAR without ENDCHAR"))
}

fn parse_ints<const N: usize>(lineno: usize, s: &str) -> Result<[i32; N], FontError> {
    let mut out = [0; N];
    let mut fields = s.split_whitespace();
    for slot in out.iter_mut() {
        *slot = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(|| parse_error(lineno, &format!("expected {} integers", N)))?;
    }
    Ok(out)
}

fn parse_hex_row(lineno: usize, s: &str) -> Result<Vec<u8>, FontError> {
    if s.len() % 2 != 0 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(parse_error(lineno, &format!("bad bitmap row {:?}", s)));
    }
    let nibble = |b: u8| (b as char).to_digit(16).unwrap_or(0) as u8;
    Ok(s.as_bytes()
        .chunks(2)
        .map(|pair| (nibble(pair[0]) << 4) | nibble(pair[1]))
        .collect())
}

fn parse_error(line: usize, msg: &str) -> FontError {
    FontError::Parse {
        line,
        msg: String::from(msg),
    }
}
