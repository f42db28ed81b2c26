// src/debug/helpers.rs

//! Miscellaneous helper functions for testing: temporary files and
//! temporary case directories.

use crate::common::FPath;

use crate::readers::helpers::path_to_fpath;

use std::fs::create_dir_all;
use std::fs::File;
use std::path::PathBuf;

#[allow(unused_imports)] // XXX: clippy wrongly marks this as unused
use std::io::Write; // for `NamedTempFile.write_all`

extern crate lazy_static;
use lazy_static::lazy_static;

extern crate si_trace_print;
use si_trace_print::{dpfo, dpfñ};

extern crate tempfile;

#[doc(hidden)]
pub use tempfile::NamedTempFile;
#[doc(hidden)]
pub use tempfile::TempDir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile instances default to this file name prefix.
///
/// A known prefix eases cleanup of temporary files left behind after
/// testing.
/// See <https://github.com/Stebalien/tempfile/issues/183>.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-frp-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    path_to_fpath(ntf.path())
}

/// Testing helper function to write a `[u8]` to a temporary file.
///
/// BUG: `NamedTempFile` created within `lazy_static` will fail to remove itself
///      <https://github.com/Stebalien/tempfile/issues/183>.
pub fn create_temp_file_bytes(data: &[u8]) -> NamedTempFile {
    let mut ntf = match tempfile::Builder::new()
        // use known prefix for easier cleanup
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("NamedTempFile::new() return Err {}", err);
        }
    };
    match ntf.write_all(data) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }

    ntf
}

/// Testing helper function to write a `str` to a temporary file.
pub fn create_temp_file(data: &str) -> NamedTempFile {
    create_temp_file_bytes(data.as_bytes())
}

/// Create a temporary directory
pub fn create_temp_dir() -> TempDir {
    dpfñ!();
    match tempfile::Builder::new()
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempdir()
    {
        Ok(val) => val,
        Err(err) => panic!("tempfile::Builder::tempdir() return Err {}", err),
    }
}

/// Testing helper function to write `data` to a file in a temporary directory.
/// Will create leading directories in `name`, e.g. `name` value `case1/FX`
/// creates directory `case1` and file `FX`.
///
/// Returns the path of the new file.
pub fn create_file_in_tmpdir(
    tempdir: &TempDir,
    name: &str,
    data: &str,
) -> FPath {
    let path_file: PathBuf = tempdir.path().join(name);
    if let Some(parent) = path_file.parent() {
        dpfo!("create_dir_all({:?})", parent);
        if let Err(err) = create_dir_all(parent) {
            panic!("create_dir_all({:?}) Error {:?}", parent, err);
        }
    }
    dpfo!("File::create({:?})", path_file);
    let mut file_ = match File::create(&path_file) {
        Ok(f) => f,
        Err(err) => panic!("File::create({:?}) Error {:?}", path_file, err),
    };
    if let Err(err) = file_.write_all(data.as_bytes()) {
        panic!("write_all({:?}) Error {:?}", path_file, err);
    }

    path_to_fpath(&path_file)
}

/// Testing helper to create a `TempDir` and files within it.
/// Each entry of `files` is a tuple of (relative path, file contents).
pub fn create_files_and_tmpdir(files: &[(&str, &str)]) -> (TempDir, Vec<FPath>) {
    let tmpdir = create_temp_dir();
    let fpaths: Vec<FPath> = files
        .iter()
        .map(|(name, data)| create_file_in_tmpdir(&tmpdir, name, data))
        .collect();

    (tmpdir, fpaths)
}
