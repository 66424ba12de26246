use alloc::string::String;
use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontError {
    MalformedBitmap {
        width: usize,
        height: usize,
        len: usize,
    },
    InvalidPixel {
        index: usize,
        value: u8,
    },
    HeightMismatch {
        character: char,
        expected: usize,
        found: usize,
    },
    DuplicateGlyph(char),
    NonContiguous(char),
    MissingFallback(char),
    Parse {
        line: usize,
        msg: String,
    },
    Io(String),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::MalformedBitmap { width, height, len } => write!(
                f,
                "MalformedBitmap: {}x{} bitmap carries {} pixels",
                width, height, len
            ),
            FontError::InvalidPixel { index, value } => {
                write!(f, "InvalidPixel: pixel {} has value {}", index, value)
            }
            FontError::HeightMismatch {
                character,
                expected,
                found,
            } => write!(
                f,
                "HeightMismatch: glyph {:?} is {} rows, font height is {}",
                character, found, expected
            ),
            FontError::DuplicateGlyph(ch) => write!(f, "DuplicateGlyph: {:?}", ch),
            FontError::NonContiguous(ch) => {
                write!(f, "NonContiguous: byte range of {:?} does not follow its predecessor", ch)
            }
            FontError::MissingFallback(ch) => {
                write!(f, "MissingFallback: fallback glyph {:?} not in character set", ch)
            }
            FontError::Parse { line, msg } => write!(f, "ParseError: line {}: {}", line, msg),
            FontError::Io(msg) => write!(f, "IoError: {}", msg),
        }
    }
}

impl core::error::Error for FontError {}
