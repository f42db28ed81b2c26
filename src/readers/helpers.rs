// src/readers/helpers.rs

//! Miscellaneous helper functions for _Readers_.

use std;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::common::{
    CRu8,
    FPath,
    FileSz,
    NLu8,
};

use ::lazy_static::lazy_static;
use ::regex::Regex;

/// Return the basename of an `FPath`.
pub fn basename(path: &FPath) -> FPath {
    match fpath_to_path(path).file_name() {
        Some(name) => (*name.to_string_lossy()).to_string(),
        None => FPath::from(""),
    }
}

/// Helper function for a slightly annoying set of calls.
pub fn path_to_fpath(path: &std::path::Path) -> FPath {
    // `PathBuf` to `String` https://stackoverflow.com/q/37388107/471376
    (*(path.to_string_lossy())).to_string()
}

/// Helper function for completeness.
pub fn fpath_to_path(path: &FPath) -> &std::path::Path {
    std::path::Path::new(path)
}

/// Return the size of the file.
pub fn path_filesz(path: &std::path::Path) -> Option<FileSz> {
    defn!("({:?})", path);
    let metadata = match std::fs::metadata(path) {
        Ok(val) => val,
        Err(_err) => {
            defx!("error {}, return None", _err);
            return None;
        }
    };
    let len: FileSz = metadata.len();
    defx!("return {}", len);

    Some(len)
}

/// Remove trailing `'\n'` and `'\r'` bytes.
pub fn trim_line_end(line: &[u8]) -> &[u8] {
    let mut end: usize = line.len();
    while end > 0 && (line[end - 1] == NLu8 || line[end - 1] == CRu8) {
        end -= 1;
    }

    &line[..end]
}

/// Remove trailing `'\n'` and `'\r'` chars.
pub fn trim_str_end(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Parse a report value. Non-finite values (`inf`, `NaN`) are errors.
pub fn parse_value(token: &str) -> std::result::Result<f64, String> {
    match token.parse::<f64>() {
        Ok(val) if val.is_finite() => Ok(val),
        Ok(_) => Err(String::from("value is not finite")),
        Err(err) => Err(err.to_string()),
    }
}

/// `true` if the line is empty or only whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

lazy_static! {
    /// A column separator: a tab, or a run of two or more whitespace.
    static ref REGEX_COLUMN_SEP: Regex = Regex::new(r"\t|\s{2,}")
        .unwrap_or_else(|err| panic!("bad REGEX_COLUMN_SEP {}", err));
}

/// Split `line` into columns separated by runs of two or more blanks, or by
/// any tab.
///
/// Report headers align multi-word column titles like `"Forces (n)"`
/// with wide spacing; a single space belongs to the title.
pub fn split_columns(line: &str) -> Vec<String> {
    let columns: Vec<String> = REGEX_COLUMN_SEP
        .split(line.trim())
        .filter(|column| !column.is_empty())
        .map(String::from)
        .collect();
    defñ!("({:?}) return {:?}", line, columns);

    columns
}
