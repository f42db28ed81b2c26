// src/printer/summary.rs

//! CLI option `--summary` printing functions.
//! Only used by `frp.rs`.

use crate::common::{Count, FPath, RoleName};
use crate::readers::filepreprocessor::ProcessPathResult;
use crate::readers::reportaggregator::RoleErrors;

use std::fmt;
use std::io::Write;
use std::time::Duration;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// For printing various levels of indentation.
const OPT_SUMMARY_PRINT_INDENT1: &str = "  ";
const OPT_SUMMARY_PRINT_INDENT2: &str = "      ";

/// One per-file error as printed in a summary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SummaryError {
    pub role: RoleName,
    /// short error kind, e.g. `"MalformedDataRowError"`
    pub kind: &'static str,
    pub message: String,
}

/// Accumulated processing results of one case directory.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SummaryCase {
    pub dir: FPath,
    pub count_files_parsed: Count,
    pub errors: Vec<SummaryError>,
    pub warnings: Vec<String>,
}

impl SummaryCase {
    pub fn new(
        dir: FPath,
        count_files_parsed: Count,
        errors: &RoleErrors,
        warnings: &[String],
    ) -> SummaryCase {
        SummaryCase {
            dir,
            count_files_parsed,
            errors: errors
                .iter()
                .map(|role_error| SummaryError {
                    role: role_error.role.clone(),
                    kind: role_error.error.kind_str(),
                    message: role_error.error.to_string(),
                })
                .collect(),
            warnings: warnings.to_vec(),
        }
    }
}

/// Accumulated processing results of one program run.
#[derive(Clone, Debug, Default)]
pub struct Summary {
    pub paths: Vec<ProcessPathResult>,
    pub cases: Vec<SummaryCase>,
    /// output files written
    pub outputs: Vec<FPath>,
    pub elapsed: Duration,
}

impl Summary {
    pub fn count_cases(&self) -> Count {
        self.cases.len() as Count
    }

    pub fn count_files_parsed(&self) -> Count {
        self.cases.iter().map(|case| case.count_files_parsed).sum()
    }

    pub fn count_errors(&self) -> Count {
        self.cases.iter().map(|case| case.errors.len() as Count).sum()
    }

    pub fn count_warnings(&self) -> Count {
        self.cases.iter().map(|case| case.warnings.len() as Count).sum()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Paths:")?;
        for result in self.paths.iter() {
            match result {
                ProcessPathResult::CaseValid(path) => {
                    writeln!(f, "{}accepted {:?}", OPT_SUMMARY_PRINT_INDENT1, path)?;
                }
                ProcessPathResult::CaseErrMissingFiles(path, missing) => {
                    writeln!(f, "{}omitted {:?}, missing files {:?}", OPT_SUMMARY_PRINT_INDENT1, path, missing)?;
                }
                ProcessPathResult::PathErrNotADir(path) => {
                    writeln!(f, "{}omitted {:?}, not a directory", OPT_SUMMARY_PRINT_INDENT1, path)?;
                }
                ProcessPathResult::PathErrNotExist(path) => {
                    writeln!(f, "{}omitted {:?}, does not exist", OPT_SUMMARY_PRINT_INDENT1, path)?;
                }
            }
        }
        writeln!(f, "Cases:")?;
        for case in self.cases.iter() {
            writeln!(
                f,
                "{}{:?}: files parsed {}, errors {}, warnings {}",
                OPT_SUMMARY_PRINT_INDENT1,
                case.dir,
                case.count_files_parsed,
                case.errors.len(),
                case.warnings.len(),
            )?;
            for error in case.errors.iter() {
                writeln!(
                    f,
                    "{}{} {:?}: {}",
                    OPT_SUMMARY_PRINT_INDENT2, error.kind, error.role, error.message
                )?;
            }
            for warning in case.warnings.iter() {
                writeln!(f, "{}warning: {}", OPT_SUMMARY_PRINT_INDENT2, warning)?;
            }
        }
        if !self.outputs.is_empty() {
            writeln!(f, "Outputs:")?;
            for output in self.outputs.iter() {
                writeln!(f, "{}{:?}", OPT_SUMMARY_PRINT_INDENT1, output)?;
            }
        }
        writeln!(
            f,
            "Totals: cases {}, files parsed {}, errors {}, warnings {}",
            self.count_cases(),
            self.count_files_parsed(),
            self.count_errors(),
            self.count_warnings(),
        )?;
        writeln!(f, "Elapsed: {:?}", self.elapsed)
    }
}

/// Print the summary to `writer`, e.g. stderr.
pub fn print_summary<W: Write>(
    writer: &mut W,
    summary: &Summary,
) -> std::io::Result<()> {
    defñ!("{} cases", summary.cases.len());
    write!(writer, "\nSummary:\n{}", summary)?;
    writer.flush()
}
