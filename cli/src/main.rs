use std::ffi::OsString;
use std::fs;
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use log::{
    debug,
    error,
    info,
    warn,
};

mod args;
mod logger;

use args::{
    Args,
    Table,
};
use hybrid::encoder;
use hybrid::render::{
    self,
    Artifact,
    ArtifactFormat,
};
use hybrid::table::TableBuilder;
use shared::{
    bdf,
    gzip,
};

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.level());

    match convert(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn convert(args: &Args) -> Result<()> {
    let data = fs::read(&args.infile)
        .with_context(|| format!("reading {}", args.infile.display()))?;
    let data = if gzip::is_gzip(&data) {
        debug!("{} is gzip-compressed", args.infile.display());
        gzip::decompress(&data).with_context(|| format!("inflating {}", args.infile.display()))?
    } else {
        data
    };

    let text = String::from_utf8_lossy(&data);
    let font =
        bdf::parse(&text).with_context(|| format!("parsing {}", args.infile.display()))?;
    debug!(
        "{}: {} glyphs, ascent {}, descent {}",
        args.infile.display(),
        font.glyph_count(),
        font.font_ascent,
        font.font_descent
    );
    if font.cell_height() != args.height {
        warn!(
            "font cell is {} rows, placing glyphs in {} rows",
            font.cell_height(),
            args.height
        );
    }

    let source = font.render(&args.load_options());
    for ch in &source.skipped {
        warn!("no glyph for {:?} in {}", ch, args.infile.display());
    }

    let encoded = encoder::encode(source.height, source.glyphs.iter().map(|(c, b)| (*c, b)))?;
    let table = TableBuilder::new(&encoded)
        .fallback(args.fallback)
        .build(args.table.into())
        .context("building lookup table")?;

    let format = ArtifactFormat::from(args.format);
    let blob_path = with_suffix(&args.outfile, "bin");
    let artifact_path = with_suffix(&args.outfile, format.extension());
    let blob_file = blob_reference(&blob_path, &format, args)?;

    let invocation = std::env::args_os()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let artifact = Artifact {
        blob_file: &blob_file,
        invocation: Some(&invocation),
    };
    let module = render::render(&table, format, &artifact).context("rendering lookup module")?;

    write_all(&[
        (blob_path.as_path(), encoded.blob.as_bytes()),
        (artifact_path.as_path(), module.as_bytes()),
    ])?;

    info!(
        "{} glyphs, {} bytes -> {}, {}",
        table.len(),
        encoded.blob.len(),
        blob_path.display(),
        artifact_path.display()
    );
    Ok(())
}

/// `clock` + `bin` -> `clock.bin`, keeping any dots already in the name.
fn with_suffix(path: &Path, ext: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// How the lookup module names the blob: the MicroPython fixed table opens
/// the output path as given, every other artifact sits beside the blob and
/// uses its file name.
fn blob_reference(blob_path: &Path, format: &ArtifactFormat, args: &Args) -> Result<String> {
    let name = match (args.table, format) {
        (Table::Fixed, ArtifactFormat::Python) => Some(blob_path.as_os_str()),
        _ => blob_path.file_name(),
    }
    .context("output path has no file name")?;
    name.to_str()
        .map(String::from)
        .with_context(|| format!("{} is not valid UTF-8", blob_path.display()))
}

/// Stages every file first so a failed write leaves none of them behind.
fn write_all(files: &[(&Path, &[u8])]) -> Result<()> {
    let staged: Vec<PathBuf> = files
        .iter()
        .map(|(path, _)| with_suffix(path, "tmp"))
        .collect();

    let result = files
        .iter()
        .zip(&staged)
        .try_for_each(|((_, bytes), tmp)| {
            fs::write(tmp, bytes).with_context(|| format!("writing {}", tmp.display()))
        })
        .and_then(|()| commit(files, &staged));

    if result.is_err() {
        for tmp in &staged {
            let _ = fs::remove_file(tmp);
        }
    }
    result
}

/// Moves staged files into place. If any step fails, every target already
/// replaced gets its previous contents back.
fn commit(files: &[(&Path, &[u8])], staged: &[PathBuf]) -> Result<()> {
    let mut done: Vec<(&Path, Option<PathBuf>)> = Vec::with_capacity(files.len());
    for ((path, _), tmp) in files.iter().zip(staged) {
        match install(path, tmp) {
            Ok(backup) => done.push((path, backup)),
            Err(e) => {
                rollback(&done);
                return Err(e);
            }
        }
    }
    for backup in done.iter().filter_map(|(_, b)| b.as_ref()) {
        if let Err(e) = fs::remove_file(backup) {
            warn!("leaving {}: {}", backup.display(), e);
        }
    }
    Ok(())
}

fn install(path: &Path, tmp: &Path) -> Result<Option<PathBuf>> {
    let backup = if path.exists() {
        let bak = with_suffix(path, "bak");
        fs::rename(path, &bak).with_context(|| format!("backing up {}", path.display()))?;
        Some(bak)
    } else {
        None
    };
    if let Err(e) = fs::rename(tmp, path) {
        if let Some(bak) = &backup {
            let _ = fs::rename(bak, path);
        }
        return Err(e).with_context(|| format!("writing {}", path.display()));
    }
    Ok(backup)
}

fn rollback(done: &[(&Path, Option<PathBuf>)]) {
    for (path, backup) in done.iter().rev() {
        let restored = match backup {
            Some(bak) => fs::rename(bak, path),
            None => fs::remove_file(path),
        };
        if let Err(e) = restored {
            error!("could not restore {}: {}", path.display(), e);
        }
    }
}
