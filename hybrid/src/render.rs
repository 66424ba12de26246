//! Lookup artifacts that sit next to the blob and load it by file name.

use alloc::format;
use alloc::string::String;
use core::fmt::{
    self,
    Write,
};

use crate::table::{
    FixedTable,
    LookupTable,
    WidthTable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// A module for `include!`, pulling the blob in with `include_bytes!`.
    Rust,
    /// A MicroPython module that reads the blob at import time.
    Python,
}

impl ArtifactFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Rust => "rs",
            ArtifactFormat::Python => "py",
        }
    }
}

pub struct Artifact<'a> {
    /// Blob file name as the artifact should refer to it.
    pub blob_file: &'a str,
    /// Command line recorded in the leading comment.
    pub invocation: Option<&'a str>,
}

pub fn render(
    table: &LookupTable,
    format: ArtifactFormat,
    artifact: &Artifact<'_>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    if let Some(invocation) = artifact.invocation {
        let marker = match format {
            ArtifactFormat::Rust => "//",
            ArtifactFormat::Python => "#",
        };
        writeln!(out, "{} {}", marker, invocation.replace(['\r', '\n'], " "))?;
        writeln!(out)?;
    }

    match (table, format) {
        (LookupTable::Fixed(t), ArtifactFormat::Rust) => {
            fixed_rust(&mut out, t, artifact.blob_file)?
        }
        (LookupTable::Fixed(t), ArtifactFormat::Python) => {
            fixed_python(&mut out, t, artifact.blob_file)?
        }
        (LookupTable::WidthAware(t), ArtifactFormat::Rust) => {
            width_rust(&mut out, t, artifact.blob_file)?
        }
        (LookupTable::WidthAware(t), ArtifactFormat::Python) => {
            width_python(&mut out, t, artifact.blob_file)?
        }
    }
    Ok(out)
}

fn blob_rust(out: &mut String, blob_file: &str) -> fmt::Result {
    writeln!(out, "pub const FONT_FILE: &str = {:?};", blob_file)?;
    writeln!(out, "pub static FONT_BIN: &[u8] = include_bytes!({:?});", blob_file)?;
    writeln!(out)
}

fn fixed_rust(out: &mut String, t: &FixedTable, blob_file: &str) -> fmt::Result {
    let n = t.chars().len();
    blob_rust(out, blob_file)?;

    write!(out, "pub const CHAR_SET: [char; {}] = [", n)?;
    for (i, ch) in t.chars().iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        write!(out, "{:?}", ch)?;
    }
    writeln!(out, "];")?;

    write!(out, "pub const CHAR_END: [usize; {}] = [", n)?;
    for (i, end) in t.ends().iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        write!(out, "{}", end)?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;

    writeln!(out, "pub const WIDTH: usize = {};", t.width())?;
    writeln!(out, "pub const HEIGHT: usize = {};", t.height())?;
    writeln!(out)?;
    writeln!(out, "const FALLBACK: usize = {};", t.fallback_index())?;
    writeln!(out)?;
    out.push_str(
        "\
pub fn get_ch(ch: char) -> &'static [u8] {
    let i = CHAR_SET.iter().position(|&c| c == ch).unwrap_or(FALLBACK);
    let start = if i > 0 { CHAR_END[i - 1] } else { 0 };
    &FONT_BIN[start..CHAR_END[i]]
}
",
    );
    Ok(())
}

fn width_rust(out: &mut String, t: &WidthTable, blob_file: &str) -> fmt::Result {
    blob_rust(out, blob_file)?;
    writeln!(out, "pub const HEIGHT: usize = {};", t.height())?;
    writeln!(out)?;

    writeln!(out, "/// `(start, end, width)` of a glyph in `FONT_BIN`.")?;
    writeln!(out, "fn glyph(ch: char) -> (usize, usize, usize) {{")?;
    writeln!(out, "    match ch {{")?;
    for (ch, e) in t.entries() {
        writeln!(out, "        {:?} => ({}, {}, {}),", ch, e.start, e.end, e.width)?;
    }
    let fb = t.fallback_entry();
    writeln!(out, "        _ => ({}, {}, {}),", fb.start, fb.end, fb.width)?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    out.push_str(
        "\
pub fn get_ch(ch: char) -> (&'static [u8], usize) {
    let (start, end, width) = glyph(ch);
    (&FONT_BIN[start..end], width)
}

pub fn str_width(s: &str) -> usize {
    s.chars().map(|ch| glyph(ch).2).sum()
}
",
    );
    Ok(())
}

fn fixed_python(out: &mut String, t: &FixedTable, blob_file: &str) -> fmt::Result {
    writeln!(out, "_font_file = {}", py_str(blob_file))?;
    write!(out, "_char_set = [")?;
    for (i, ch) in t.chars().iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        write!(out, "{}", py_char(*ch))?;
    }
    writeln!(out, "]")?;
    write!(out, "_char_end = [")?;
    for (i, end) in t.ends().iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        write!(out, "{}", end)?;
    }
    writeln!(out, "]")?;
    writeln!(out)?;
    writeln!(out, "width = {}", t.width())?;
    writeln!(out, "height = {}", t.height())?;
    writeln!(out)?;
    py_load_blob(out)?;
    write!(
        out,
        "\
def get_ch(ch):
    if ch not in _char_set:
        ch = {}
    i = _char_set.index(ch)
    start = _char_end[i-1] if i > 0 else 0
    end = _char_end[i]
    return _font_bin[start:end]
",
        py_char(t.fallback())
    )
}

fn width_python(out: &mut String, t: &WidthTable, blob_file: &str) -> fmt::Result {
    writeln!(out, "_font_file = {}", py_str(blob_file))?;
    writeln!(out, "_glyphs = {{")?;
    for (ch, e) in t.entries() {
        writeln!(out, "    {}: ({}, {}, {}),", py_char(ch), e.start, e.end, e.width)?;
    }
    writeln!(out, "}}")?;
    writeln!(out, "_fallback = _glyphs[{}]", py_char(t.fallback()))?;
    writeln!(out)?;
    writeln!(out, "height = {}", t.height())?;
    writeln!(out)?;
    py_load_blob(out)?;
    out.push_str(
        "\
def get_ch(ch):
    start, end, width = _glyphs.get(ch, _fallback)
    return _font_bin[start:end], width

def str_width(s):
    return sum(_glyphs.get(ch, _fallback)[2] for ch in s)
",
    );
    Ok(())
}

fn py_load_blob(out: &mut String) -> fmt::Result {
    writeln!(out, "with open(_font_file, 'rb') as f:")?;
    writeln!(out, "    _font_bin = f.read()")?;
    writeln!(out)
}

fn py_char(ch: char) -> String {
    let mut s = String::new();
    let mut buf = [0u8; 4];
    py_escape(&mut s, ch.encode_utf8(&mut buf));
    format!("\"{}\"", s)
}

fn py_str(text: &str) -> String {
    let mut s = String::new();
    py_escape(&mut s, text);
    format!("\"{}\"", s)
}

fn py_escape(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
}
