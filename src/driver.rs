//! Run a file through compression and expansion in one pass.
//!
//! Each direction opens its own pair of files.  If either file of a pair
//! cannot be opened, that direction is reported as failed and any file already
//! opened is closed when it goes out of scope.  Any other failure while
//! compressing aborts the run, expansion is not attempted.
//!
//! Output files are not truncated on open, bytes before `out_offset` are kept.

use std::fs::{File,OpenOptions};
use std::path::Path;
use crate::lz77::{self,Options};
use crate::Error;

/// Outcome of each direction, `(in_size,out_size)` on success
pub struct RunReport {
    pub compress: Result<(u64,u64),Error>,
    pub expand: Result<(u64,u64),Error>
}

fn open_pair(path_in: &Path,path_out: &Path) -> Result<(File,File),Error> {
    let in_file = File::open(path_in).map_err(|e| Error::StreamOpen {
        path: path_in.display().to_string(),
        source: e
    })?;
    let out_file = OpenOptions::new().write(true).truncate(false).create(true).open(path_out).map_err(|e| Error::StreamOpen {
        path: path_out.display().to_string(),
        source: e
    })?;
    Ok((in_file,out_file))
}

fn compress_file(path_in: &Path,path_out: &Path,opt: &Options) -> Result<(u64,u64),Error> {
    let (mut in_file,mut out_file) = open_pair(path_in,path_out)?;
    let (in_size,out_size) = lz77::compress(&mut in_file,&mut out_file,opt)?;
    out_file.set_len(opt.out_offset + out_size).map_err(Error::StreamWrite)?;
    Ok((in_size,out_size))
}

fn expand_file(path_in: &Path,path_out: &Path,opt: &Options) -> Result<(u64,u64),Error> {
    let (mut in_file,mut out_file) = open_pair(path_in,path_out)?;
    let (in_size,out_size) = lz77::expand(&mut in_file,&mut out_file,opt)?;
    out_file.set_len(opt.out_offset + out_size).map_err(Error::StreamWrite)?;
    Ok((in_size,out_size))
}

/// Compress `plain` into `compressed`, then expand `compressed` into `expanded`.
/// Failures are logged and reported, never a panic.  If compression fails for any
/// reason other than opening a file, `expanded` is not touched and the expand
/// direction reports `Error::RunAborted`.
pub fn run(plain: &Path,compressed: &Path,expanded: &Path,opt: &Options) -> RunReport {
    let compress = compress_file(plain,compressed,opt);
    let expand = match &compress {
        Err(Error::StreamOpen { .. }) | Ok(_) => {
            if let Err(e) = &compress {
                log::error!("compression failed: {}",e);
            }
            expand_file(compressed,expanded,opt)
        },
        Err(e) => {
            log::error!("compression failed, aborting run: {}",e);
            Err(Error::RunAborted)
        }
    };
    if let Err(e) = &expand {
        log::error!("expansion failed: {}",e);
    }
    RunReport { compress, expand }
}

#[test]
fn full_cycle() {
    let temp_dir = tempfile::tempdir().expect("no temp dir");
    let plain = temp_dir.path().join("plain.txt");
    let compressed = temp_dir.path().join("plain.lz77");
    let expanded = temp_dir.path().join("expanded.txt");
    let test_data = "To be, or not to be, that is the question.\n".repeat(20);
    std::fs::write(&plain,&test_data).expect("could not write input");
    let report = run(&plain,&compressed,&expanded,&lz77::STD_OPTIONS);
    let (in_size,out_size) = report.compress.expect("compression failed");
    assert_eq!(in_size,test_data.len() as u64);
    assert!(out_size < in_size);
    let (_,expanded_size) = report.expand.expect("expansion failed");
    assert_eq!(expanded_size,in_size);
    assert_eq!(std::fs::read(&expanded).expect("could not read output"),test_data.as_bytes());
}

#[test]
fn missing_input_is_reported() {
    let temp_dir = tempfile::tempdir().expect("no temp dir");
    let plain = temp_dir.path().join("missing.txt");
    let compressed = temp_dir.path().join("missing.lz77");
    let expanded = temp_dir.path().join("missing.out");
    let report = run(&plain,&compressed,&expanded,&lz77::STD_OPTIONS);
    assert!(matches!(report.compress,Err(Error::StreamOpen { .. })));
    // the compressed file was never created, so expansion cannot open it either
    assert!(matches!(report.expand,Err(Error::StreamOpen { .. })));
    assert!(!expanded.exists());
}

#[test]
fn read_failure_aborts_run() {
    // a directory opens fine but cannot be read
    let temp_dir = tempfile::tempdir().expect("no temp dir");
    let compressed = temp_dir.path().join("dir.lz77");
    let expanded = temp_dir.path().join("dir.out");
    let report = run(temp_dir.path(),&compressed,&expanded,&lz77::STD_OPTIONS);
    assert!(matches!(report.compress,Err(Error::StreamRead(_))));
    assert!(matches!(report.expand,Err(Error::RunAborted)));
    assert!(!expanded.exists());
}

#[test]
fn output_prefix_is_kept() {
    let temp_dir = tempfile::tempdir().expect("no temp dir");
    let plain = temp_dir.path().join("plain.txt");
    let compressed = temp_dir.path().join("plain.lz77");
    let expanded = temp_dir.path().join("expanded.txt");
    std::fs::write(&plain,"xyzabcabcabc").expect("could not write input");
    // stale content past the end must not survive
    std::fs::write(&compressed,"HDR".repeat(40)).expect("could not write input");
    std::fs::write(&expanded,"abc").expect("could not write input");
    let opt = lz77::Options { in_offset: 3, out_offset: 3, ..lz77::STD_OPTIONS };
    let report = run(&plain,&compressed,&expanded,&opt);
    let (_,out_size) = report.compress.expect("compression failed");
    let cmp = std::fs::read(&compressed).expect("could not read output");
    assert_eq!(cmp[0..3],b"HDR"[..]);
    assert_eq!(cmp.len() as u64,3 + out_size);
    report.expand.expect("expansion failed");
    assert_eq!(std::fs::read(&expanded).expect("could not read output"),b"abcabcabcabc".to_vec());
}
