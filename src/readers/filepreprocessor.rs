// src/readers/filepreprocessor.rs

//! A collection of functions to search for case directories, and prepare
//! data needed to create a [`ReportAggregator`] instance.
//!
//! A "case directory" is a directory holding every file of the role table.
//!
//! [`ReportAggregator`]: crate::readers::reportaggregator::ReportAggregator

use crate::common::{FPath, FPaths, FileRoles};
use crate::readers::helpers::{fpath_to_path, path_to_fpath};

use std::path::Path;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FilePreProcessor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Initial path processing return type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProcessPathResult {
    /// Directory holds every role file
    CaseValid(FPath),
    /// Directory lacks the listed role files
    CaseErrMissingFiles(FPath, FPaths),
    /// Path exists and is not a directory
    PathErrNotADir(FPath),
    /// Path does not exist
    PathErrNotExist(FPath),
}

pub type ProcessPathResults = Vec<ProcessPathResult>;

impl ProcessPathResult {
    /// The path this result is about.
    pub const fn path(&self) -> &FPath {
        match self {
            ProcessPathResult::CaseValid(path)
            | ProcessPathResult::CaseErrMissingFiles(path, _)
            | ProcessPathResult::PathErrNotADir(path)
            | ProcessPathResult::PathErrNotExist(path) => path,
        }
    }

    pub const fn is_valid(&self) -> bool {
        matches!(self, ProcessPathResult::CaseValid(_))
    }
}

/// Role file names of `roles` that are not regular files within `dir`.
pub fn missing_role_files(
    dir: &Path,
    roles: &FileRoles,
) -> FPaths {
    roles
        .iter()
        .filter(|role| !dir.join(&role.filename).is_file())
        .map(|role| role.filename.clone())
        .collect()
}

/// Return a `ProcessPathResult` for `path`.
///
/// Given a directory holding every role file, returns that directory.<br/>
/// Given any other directory, checks each immediate sub-directory, sorted by
/// name. A parent directory with no sub-directories is itself reported as
/// missing files.
pub fn process_path(
    path: &FPath,
    roles: &FileRoles,
) -> ProcessPathResults {
    defn!("({:?})", path);

    let std_path: &Path = fpath_to_path(path);
    if !std_path.exists() {
        defx!("not exist {:?}", path);
        return vec![ProcessPathResult::PathErrNotExist(path.clone())];
    }
    if !std_path.is_dir() {
        defx!("not a directory {:?}", path);
        return vec![ProcessPathResult::PathErrNotADir(path.clone())];
    }
    let missing: FPaths = missing_role_files(std_path, roles);
    if missing.is_empty() {
        defx!("case directory {:?}", path);
        return vec![ProcessPathResult::CaseValid(path.clone())];
    }

    // getting here means `path` is a directory of case directories, or
    // an incomplete case directory

    let mut results: ProcessPathResults = ProcessPathResults::new();
    defo!("WalkDir({:?})…", path);
    for entry in walkdir::WalkDir::new(std_path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(val) => val,
            Err(_err) => {
                defo!("Err({:?})", _err);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let fpath_entry: FPath = path_to_fpath(entry.path());
        let missing_: FPaths = missing_role_files(entry.path(), roles);
        match missing_.is_empty() {
            true => {
                defo!("results.push(CaseValid({:?}))", fpath_entry);
                results.push(ProcessPathResult::CaseValid(fpath_entry));
            }
            false => {
                defo!("results.push(CaseErrMissingFiles({:?}, {:?}))", fpath_entry, missing_);
                results.push(ProcessPathResult::CaseErrMissingFiles(fpath_entry, missing_));
            }
        }
    }
    if results.is_empty() {
        results.push(ProcessPathResult::CaseErrMissingFiles(path.clone(), missing));
    }
    defx!("return {:?}", results);

    results
}

/// Return a `ProcessPathResult` for each path of `paths`, in order.
pub fn find_case_dirs(
    paths: &[FPath],
    roles: &FileRoles,
) -> ProcessPathResults {
    paths
        .iter()
        .flat_map(|path| process_path(path, roles))
        .collect()
}
