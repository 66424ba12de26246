use alloc::string::String;
use alloc::vec::Vec;

use crate::types::FontError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const CM_DEFLATE: u8 = 8;
const HEADER_LEN: usize = 10;
const TRAILER_LEN: usize = 8;

const FHCRC: u8 = 0x02;
const FEXTRA: u8 = 0x04;
const FNAME: u8 = 0x08;
const FCOMMENT: u8 = 0x10;

fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    (data[offset] as u16) | ((data[offset + 1] as u16) << 8)
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    (data[offset] as u32)
        | ((data[offset + 1] as u32) << 8)
        | ((data[offset + 2] as u32) << 16)
        | ((data[offset + 3] as u32) << 24)
}

pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Inflates a single-member gzip stream.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, FontError> {
    if data.len() < HEADER_LEN + TRAILER_LEN {
        return Err(FontError::Io(String::from("too small for gzip")));
    }
    if !is_gzip(data) {
        return Err(FontError::Io(String::from("bad gzip magic")));
    }
    if data[2] != CM_DEFLATE {
        return Err(FontError::Io(alloc::format!(
            "unsupported gzip compression method: {}",
            data[2]
        )));
    }

    let flags = data[3];
    let body_end = data.len() - TRAILER_LEN;
    let mut pos = HEADER_LEN;

    if flags & FEXTRA != 0 {
        if pos + 2 > body_end {
            return Err(truncated());
        }
        pos += 2 + read_u16_le(data, pos) as usize;
    }
    if flags & FNAME != 0 {
        pos = skip_zero_terminated(data, pos, body_end)?;
    }
    if flags & FCOMMENT != 0 {
        pos = skip_zero_terminated(data, pos, body_end)?;
    }
    if flags & FHCRC != 0 {
        pos += 2;
    }
    if pos > body_end {
        return Err(truncated());
    }

    let out = inflate(&data[pos..body_end])?;
    let expected = read_u32_le(data, body_end + 4);
    if out.len() as u32 != expected {
        return Err(FontError::Io(alloc::format!(
            "gzip size mismatch: trailer says {} bytes, got {}",
            expected,
            out.len()
        )));
    }
    Ok(out)
}

fn skip_zero_terminated(data: &[u8], pos: usize, end: usize) -> Result<usize, FontError> {
    data[pos.min(end)..end]
        .iter()
        .position(|&b| b == 0)
        .map(|n| pos + n + 1)
        .ok_or_else(truncated)
}

fn truncated() -> FontError {
    FontError::Io(String::from("gzip header truncated"))
}

fn inflate(compressed: &[u8]) -> Result<Vec<u8>, FontError> {
    #[cfg(feature = "deflate")]
    {
        miniz_oxide::inflate::decompress_to_vec(compressed)
            .map_err(|e| FontError::Io(alloc::format!("deflate error: {:?}", e)))
    }
    #[cfg(not(feature = "deflate"))]
    {
        let _ = compressed;
        Err(FontError::Io(String::from(
            "DEFLATE not supported, rebuild with the 'deflate' feature",
        )))
    }
}
