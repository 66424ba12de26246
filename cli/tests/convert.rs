use std::ffi::OsStr;
use std::fs;
use std::process::{
    Command,
    Output,
};

use tempfile::TempDir;

const CLOCK_BDF: &str = "\
STARTFONT 2.1
FONT -test-clock-
SIZE 8 75 75
FONTBOUNDINGBOX 1 8 0 -1
FONT_ASCENT 7
FONT_DESCENT 1
CHARS 3
STARTCHAR zero
ENCODING 48
DWIDTH 1 0
BBX 1 8 0 -1
BITMAP
00
00
00
00
00
00
00
00
ENDCHAR
STARTCHAR one
ENCODING 49
DWIDTH 1 0
BBX 1 8 0 -1
BITMAP
00
00
00
00
00
00
00
00
ENDCHAR
STARTCHAR question
ENCODING 63
DWIDTH 1 0
BBX 1 8 0 -1
BITMAP
80
80
80
80
80
80
80
80
ENDCHAR
ENDFONT
";

fn run<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_hybrid-font"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn clock_font_fixed_rust() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let bdf = dir.join("clock.bdf");
    fs::write(&bdf, CLOCK_BDF).unwrap();
    let out = dir.join("clock");

    let status = run([bdf.as_os_str(), "8".as_ref(), "01".as_ref(), out.as_os_str()]);
    assert!(status.status.success(), "{}", String::from_utf8_lossy(&status.stderr));

    assert_eq!(fs::read(dir.join("clock.bin")).unwrap(), [0xff, 0xff, 0x00]);
    let module = fs::read_to_string(dir.join("clock.rs")).unwrap();
    assert!(module.starts_with("// "));
    assert!(module.contains("include_bytes!(\"clock.bin\")"));
    assert!(module.contains("pub const CHAR_SET: [char; 3] = ['0', '1', '?'];"));
    assert!(module.contains("pub const CHAR_END: [usize; 3] = [1, 2, 3];"));
    assert!(module.contains("pub const HEIGHT: usize = 8;"));
    assert!(!dir.join("clock.bin.tmp").exists());
}

#[test]
fn width_table_python() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let bdf = dir.join("clock.bdf");
    fs::write(&bdf, CLOCK_BDF).unwrap();
    let out = dir.join("clock");

    let status = run([
        bdf.as_os_str(),
        "8".as_ref(),
        "10".as_ref(),
        out.as_os_str(),
        "--table".as_ref(),
        "width".as_ref(),
        "--format".as_ref(),
        "python".as_ref(),
    ]);
    assert!(status.status.success(), "{}", String::from_utf8_lossy(&status.stderr));

    assert_eq!(fs::read(dir.join("clock.bin")).unwrap(), [0xff, 0xff, 0x00]);
    let module = fs::read_to_string(dir.join("clock.py")).unwrap();
    assert!(module.contains("_font_file = \"clock.bin\""));
    // '1' was enumerated first
    assert!(module.contains("\"1\": (0, 1, 1),"));
    assert!(module.contains("\"0\": (1, 2, 1),"));
    assert!(module.contains("def str_width(s):"));
}

#[test]
fn fixed_python_opens_outfile_as_given() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("fonts")).unwrap();
    fs::write(tmp.path().join("clock.bdf"), CLOCK_BDF).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_hybrid-font"))
        .current_dir(tmp.path())
        .args(["clock.bdf", "8", "01", "fonts/clock", "--format", "python"])
        .output()
        .unwrap();
    assert!(status.status.success(), "{}", String::from_utf8_lossy(&status.stderr));

    let module = fs::read_to_string(tmp.path().join("fonts/clock.py")).unwrap();
    assert!(module.contains("_font_file = \"fonts/clock.bin\""), "{}", module);
    assert_eq!(fs::read(tmp.path().join("fonts/clock.bin")).unwrap(), [0xff, 0xff, 0x00]);
}

#[test]
fn gzip_input() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let mut gz = vec![0x1f, 0x8b, 8, 0, 0, 0, 0, 0, 0, 0xff];
    gz.extend(miniz_oxide::deflate::compress_to_vec(CLOCK_BDF.as_bytes(), 6));
    gz.extend_from_slice(&[0, 0, 0, 0]);
    gz.extend_from_slice(&(CLOCK_BDF.len() as u32).to_le_bytes());
    let bdf = dir.join("clock.bdf.gz");
    fs::write(&bdf, gz).unwrap();
    let out = dir.join("clock");

    let status = run([bdf.as_os_str(), "8".as_ref(), "01".as_ref(), out.as_os_str()]);
    assert!(status.status.success(), "{}", String::from_utf8_lossy(&status.stderr));
    assert_eq!(fs::read(dir.join("clock.bin")).unwrap(), [0xff, 0xff, 0x00]);
}

#[test]
fn missing_fallback_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let bdf = dir.join("clock.bdf");
    let without_question = CLOCK_BDF.replace("ENCODING 63", "ENCODING 64");
    fs::write(&bdf, without_question).unwrap();
    let out = dir.join("clock");

    let status = run([bdf.as_os_str(), "8".as_ref(), "01".as_ref(), out.as_os_str()]);
    assert!(!status.status.success());
    let stderr = String::from_utf8_lossy(&status.stderr);
    assert!(stderr.contains("MissingFallback"), "{}", stderr);
    assert!(!dir.join("clock.bin").exists());
    assert!(!dir.join("clock.rs").exists());
}

#[test]
fn unreadable_input_fails() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let out = dir.join("clock");
    let status = run([dir.join("nope.bdf").as_os_str(), "8".as_ref(), "01".as_ref(), out.as_os_str()]);
    assert!(!status.status.success());
    assert!(!dir.join("clock.bin").exists());
}

#[cfg(unix)]
mod unix {
    use std::os::unix::ffi::OsStrExt;

    use super::*;

    #[test]
    fn non_utf8_input_in_other_directory() {
        let tmp = TempDir::new().unwrap();
        let fonts = tmp.path().join("fonts");
        fs::create_dir(&fonts).unwrap();
        let bdf = fonts.join(OsStr::from_bytes(b"cl\xffock.bdf"));
        fs::write(&bdf, CLOCK_BDF).unwrap();
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();
        let out = out.join("clock");

        let status = run([bdf.as_os_str(), "8".as_ref(), "01".as_ref(), out.as_os_str()]);
        assert!(status.status.success(), "{}", String::from_utf8_lossy(&status.stderr));
        assert_eq!(fs::read(tmp.path().join("out/clock.bin")).unwrap(), [0xff, 0xff, 0x00]);
        let module = fs::read_to_string(tmp.path().join("out/clock.rs")).unwrap();
        assert!(module.contains("include_bytes!(\"clock.bin\")"));
        assert!(module.contains("\u{fffd}"), "{}", module);
    }

    #[test]
    fn non_utf8_outfile_fails_cleanly() {
        let tmp = TempDir::new().unwrap();
        let bdf = tmp.path().join("clock.bdf");
        fs::write(&bdf, CLOCK_BDF).unwrap();
        let out = tmp.path().join(OsStr::from_bytes(b"cl\xffock"));

        let status = run([bdf.as_os_str(), "8".as_ref(), "01".as_ref(), out.as_os_str()]);
        assert_eq!(status.status.code(), Some(1), "{}", String::from_utf8_lossy(&status.stderr));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_replace_restores_previous_outputs() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        let bdf = dir.join("clock.bdf");
        fs::write(&bdf, CLOCK_BDF).unwrap();
        fs::write(dir.join("clock.bin"), b"old blob").unwrap();
        fs::write(dir.join("clock.rs"), b"old module").unwrap();
        // the module's backup slot is taken, so replacing it fails after the blob moved
        fs::create_dir(dir.join("clock.rs.bak")).unwrap();
        fs::write(dir.join("clock.rs.bak/keep"), b"").unwrap();
        let out = dir.join("clock");

        let status = run([bdf.as_os_str(), "8".as_ref(), "01".as_ref(), out.as_os_str()]);
        assert!(!status.status.success());
        assert_eq!(fs::read(dir.join("clock.bin")).unwrap(), b"old blob");
        assert_eq!(fs::read(dir.join("clock.rs")).unwrap(), b"old module");
        assert!(!dir.join("clock.bin.bak").exists());
        assert!(!dir.join("clock.bin.tmp").exists());
        assert!(!dir.join("clock.rs.tmp").exists());
    }
}
