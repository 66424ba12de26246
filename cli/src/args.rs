use std::path::PathBuf;

use clap::{
    ArgAction,
    Parser,
    ValueEnum,
};
use hybrid::render::ArtifactFormat;
use hybrid::table::{
    DEFAULT_FALLBACK,
    TableKind,
};
use log::LevelFilter;
use shared::bdf::{
    LoadOptions,
    MAX_CHAR,
    MIN_CHAR,
};

#[derive(Parser, Debug)]
#[command(
    name = "hybrid-font",
    version,
    about = "Pack a BDF font into a vertically byte-packed blob plus a lookup module"
)]
pub struct Args {
    /// Input file path (.bdf, or .bdf.gz)
    pub infile: PathBuf,

    /// Font height in pixels
    pub height: usize,

    /// Character set, e.g. `1234567890:` to restrict for a clock display
    pub charset: String,

    /// Path and name of output files, `.bin` and `.rs`/`.py` are appended
    pub outfile: PathBuf,

    /// Language of the lookup module
    #[arg(long, value_enum, default_value_t = Format::Rust)]
    pub format: Format,

    /// Lookup table layout
    #[arg(long, value_enum, default_value_t = Table::Fixed)]
    pub table: Table,

    /// Lowest character code to include
    #[arg(long, default_value_t = MIN_CHAR)]
    pub min_char: u32,

    /// Highest character code to include
    #[arg(long, default_value_t = MAX_CHAR)]
    pub max_char: u32,

    /// Glyph served for characters outside the set
    #[arg(long, default_value_t = DEFAULT_FALLBACK)]
    pub fallback: char,

    /// Keep each glyph's own advance width in the fixed table
    #[arg(long, conflicts_with = "monospaced")]
    pub proportional: bool,

    /// Pad every glyph to the widest one in the width table
    #[arg(long)]
    pub monospaced: bool,

    /// More log output, repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Rust,
    Python,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Table {
    /// Character list plus cumulative end offsets, one global width
    Fixed,
    /// Per-character range and width, adds `str_width`
    Width,
}

impl From<Format> for ArtifactFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Rust => ArtifactFormat::Rust,
            Format::Python => ArtifactFormat::Python,
        }
    }
}

impl From<Table> for TableKind {
    fn from(t: Table) -> Self {
        match t {
            Table::Fixed => TableKind::Fixed,
            Table::Width => TableKind::WidthAware,
        }
    }
}

impl Args {
    pub fn level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn monospaced(&self) -> bool {
        match self.table {
            Table::Fixed => !self.proportional,
            Table::Width => self.monospaced,
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            height: Some(self.height),
            min_char: self.min_char,
            max_char: self.max_char,
            charset: Some(self.charset.clone()),
            monospaced: self.monospaced(),
            default_char: self.fallback,
        }
    }
}
