// src/printer/printers.rs

//! Functions to write the harvested data as JSON files, and to safely
//! write bytes to stdout and stderr.
//!
//! JSON is written "pretty" with two-space indentation. Mappings keep the
//! order of appearance in the report files.

use crate::common::{FPath, FPaths, FileOpenOptions};
use crate::data::caserecord::CaseRecord;
use crate::debug::printers::de_err;
use crate::readers::helpers::{basename, fpath_to_path};

use std::collections::BTreeMap;
use std::io::{BufWriter, Error, ErrorKind, Result, Write};

use ::serde::Serialize;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Case directory name → [`CaseRecord`]; the combined output of one run.
///
/// Ordered by directory name so output does not depend on the order in which
/// worker threads finish.
///
/// [`CaseRecord`]: crate::data::caserecord::CaseRecord
pub type CaseRecords = BTreeMap<FPath, CaseRecord>;

/// Case directory path → [`CaseRecord`], one entry per case directory
/// processed.
///
/// [`CaseRecord`]: crate::data::caserecord::CaseRecord
pub type CaseRecordsByDir = BTreeMap<FPath, CaseRecord>;

/// Key the records of `records_by_dir` by directory name for the combined
/// output.
///
/// A directory name shared by more than one case directory does not name one
/// case; each of those cases is keyed by its full directory path instead.
/// Returns the combined records and the directories keyed by full path.
pub fn combine_case_records(records_by_dir: &CaseRecordsByDir) -> (CaseRecords, FPaths) {
    defn!("({} records)", records_by_dir.len());
    let mut name_counts: BTreeMap<FPath, usize> = BTreeMap::new();
    for dir in records_by_dir.keys() {
        *name_counts.entry(basename(dir)).or_insert(0) += 1;
    }

    let mut records = CaseRecords::new();
    let mut dirs_full: FPaths = FPaths::new();
    for (dir, record) in records_by_dir.iter() {
        let name: FPath = basename(dir);
        let key: FPath = match name_counts.get(&name) {
            Some(count) if *count > 1 => {
                dirs_full.push(dir.clone());
                dir.clone()
            }
            _ => name,
        };
        records.insert(key, record.clone());
    }
    defx!("{} keyed by full path", dirs_full.len());

    (records, dirs_full)
}

/// Serialize `value` as pretty JSON to `writer`, followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value).map_err(|err| Error::new(ErrorKind::InvalidData, err))?;
    writer.write_all(b"\n")?;

    Ok(())
}

/// Serialize `value` as pretty JSON to a new file at `path`, replacing any
/// existing file.
pub fn write_json_file<T: Serialize + ?Sized>(
    path: &FPath,
    value: &T,
) -> Result<()> {
    defn!("({:?})", path);
    let file = FileOpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(fpath_to_path(path))?;
    let mut writer = BufWriter::new(file);
    write_json(&mut writer, value)?;
    writer.flush()?;
    defx!("({:?})", path);

    Ok(())
}

/// Safely write the `buffer` to stdout with help of [`StdoutLock`].
///
/// [`StdoutLock`]: std::io::StdoutLock
pub fn write_stdout(buffer: &[u8]) {
    let mut stdout_lock = std::io::stdout().lock();
    match stdout_lock.write_all(buffer) {
        Ok(_) => {}
        Err(_err) => {
            // XXX: this will print when this program stdout is truncated, like to due to `head`
            //          Broken pipe (os error 32)
            de_err!("stdout_lock.write_all(buffer@{:p} (len {})) error {}", buffer, buffer.len(), _err);
        }
    }
    match stdout_lock.flush() {
        Ok(_) => {}
        Err(_err) => {
            de_err!("stdout_lock.flush() error {}", _err);
        }
    }
}

/// Safely write the `buffer` to stderr with help of [`StderrLock`].
///
/// [`StderrLock`]: std::io::StderrLock
pub fn write_stderr(buffer: &[u8]) {
    let mut stderr_lock = std::io::stderr().lock();
    match stderr_lock.write_all(buffer) {
        Ok(_) => {}
        Err(_err) => {
            de_err!("stderr_lock.write_all(buffer@{:p} (len {})) error {}", buffer, buffer.len(), _err);
        }
    }
    match stderr_lock.flush() {
        Ok(_) => {}
        Err(_err) => {
            de_err!("stderr flushing error {}", _err);
        }
    }
}
