// src/readers/residuallogparser.rs

//! Implements a [`ResidualLogParser`], the driver of deriving a [`LogRecord`]
//! from a solver transcript.
//!
//! A log is read in three independent passes:
//!
//! 1. forward to the first non-blank line, for the case name.
//! 2. backward with a [`ReverseLineReader`] to the most recent residual table
//!    header, for the iteration count and the residuals.
//! 3. forward to the pressure far-field record, for the freestream
//!    conditions. This pass is best-effort; a failure is a warning.
//!
//! [`ResidualLogParser`]: self::ResidualLogParser
//! [`LogRecord`]: crate::data::logrecord::LogRecord
//! [`ReverseLineReader`]: crate::readers::reverselinereader::ReverseLineReader

use crate::common::FPath;
use crate::data::logrecord::{FarField, Iteration, LogRecord, Residuals};
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn, e_err, e_wrn};
use crate::readers::helpers::parse_value;
use crate::readers::linereader::{Line, LineReader};
use crate::readers::parseerror::{ParseError, ResultParse};
use crate::readers::reverselinereader::{BufSz, ReverseLineReader};

use std::fmt;

use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Substring marking the pressure far-field boundary-condition record.
/// The following line holds the condition values.
pub const FAR_FIELD_MARKER: &str = "pressure-far-field";

/// Tokens of a far-field record that are answers to solver prompts, not
/// values.
const FAR_FIELD_PROMPT_ANSWERS: [&str; 2] = ["yes", "no"];

/// Count of far-field values used: static pressure, Mach number,
/// temperature, flow-direction x and y components.
const FAR_FIELD_VALUES_MIN: usize = 5;

lazy_static! {
    /// The journal argument `-i <case>.jou`. The case name may contain
    /// whitespace and path separators.
    static ref REGEX_CASE_NAME: Regex = Regex::new(r"-i\s*([\w\s*./\\:-]+?)\.jou\b")
        .unwrap_or_else(|err| panic!("bad REGEX_CASE_NAME {}", err));
    /// Header line of a residual table, e.g.
    /// `  iter  continuity  x-velocity  y-velocity     time/iter`.
    static ref REGEX_RESIDUAL_HEADER: Regex = Regex::new(r"^\s*iter(\s|$)")
        .unwrap_or_else(|err| panic!("bad REGEX_RESIDUAL_HEADER {}", err));
}

/// Map an I/O error of `path` into a [`ParseError::Io`].
///
/// [`ParseError::Io`]: crate::readers::parseerror::ParseError
fn error_io(path: &FPath) -> impl FnOnce(std::io::Error) -> ParseError + '_ {
    move |source| ParseError::Io {
        path: path.clone(),
        source,
    }
}

/// Derives a [`LogRecord`] from one solver transcript.
///
/// Holds no open file between calls; each pass opens and closes its own
/// file handle.
///
/// [`LogRecord`]: crate::data::logrecord::LogRecord
pub struct ResidualLogParser {
    path: FPath,
    /// chunk size for the backward pass
    bufsz: BufSz,
    /// non-fatal problems found during the most recent `parse`
    warnings: Vec<String>,
}

impl fmt::Debug for ResidualLogParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ResidualLogParser")
            .field("path", &self.path)
            .field("bufsz", &self.bufsz)
            .field("warnings", &self.warnings.len())
            .finish()
    }
}

impl ResidualLogParser {
    pub fn new(
        path: FPath,
        bufsz: BufSz,
    ) -> ResidualLogParser {
        ResidualLogParser {
            path,
            bufsz,
            warnings: Vec::new(),
        }
    }

    pub const fn path(&self) -> &FPath {
        &self.path
    }

    /// Non-fatal problems found during the most recent `parse`.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Parse the log.
    ///
    /// A missing case name or residual table is an error. A missing or
    /// malformed far-field record is a warning and the `LogRecord` has no
    /// `far_field`.
    pub fn parse(&mut self) -> ResultParse<LogRecord> {
        defn!("({:?})", self.path);
        self.warnings.clear();

        let case_name: String = parse_case_name(&self.path)?;
        defo!("case_name {:?}", case_name);
        let (iteration, residuals) = parse_residual_table(&self.path, self.bufsz)?;
        defo!("iteration {}, residuals {:?}", iteration, residuals);
        let far_field: Option<FarField> = match parse_far_field(&self.path) {
            Ok(val) => Some(val),
            Err(err) => {
                self.warnings.push(err);
                None
            }
        };
        defx!("far_field {:?}", far_field);

        Ok(LogRecord::new(case_name, iteration, residuals, far_field))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// pass 1: case name
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Extract the case name from `line`, e.g. `"wing aoa 4"` from
/// `"fluent 3ddp -g -i wing aoa 4.jou"`.
pub fn case_name_from_line(line: &str) -> Option<String> {
    let captures = REGEX_CASE_NAME.captures(line)?;
    let name: &str = captures.get(1)?.as_str().trim();
    if name.is_empty() {
        return None;
    }

    Some(String::from(name))
}

/// Read the case name from the first non-blank line of the log at `path`.
pub fn parse_case_name(path: &FPath) -> ResultParse<String> {
    defn!("({:?})", path);
    let mut reader = LineReader::new(path.clone()).map_err(error_io(path))?;
    let line: Option<Line> = reader.next_nonblank_line().map_err(error_io(path))?;
    let line: Line = match line {
        Some(line) => line,
        None => {
            defx!("no non-blank line");
            return Err(ParseError::MissingCaseName {
                path: path.clone(),
                line: None,
            });
        }
    };
    match case_name_from_line(&line.text) {
        Some(name) => {
            defx!("return {:?}", name);
            Ok(name)
        }
        None => {
            defx!("no case name in line {}", line.number);
            Err(ParseError::MissingCaseName {
                path: path.clone(),
                line: Some(line.text),
            })
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// pass 2: residual table
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `true` if `line` is a residual table header line.
pub fn is_residual_header(line: &str) -> bool {
    REGEX_RESIDUAL_HEADER.is_match(line)
}

/// Derive the iteration and residuals from a residual table `header` and the
/// lines following it, `rows`, in file order.
///
/// A row has one more token than the header; the header's last column
/// `time/iter` spans two row tokens. Consecutive rows of that width are
/// accepted and the last accepted row is used. The first row of a different
/// width ends the table.
///
/// From the header, the first (`iter`) and last (`time/iter`) tokens are
/// dropped. From the row, the first token is the iteration, and the last two
/// tokens are dropped.
pub fn residuals_from_table<S: AsRef<str>>(
    path: &FPath,
    header: &str,
    rows: &[S],
) -> ResultParse<(Iteration, Residuals)> {
    let names: Vec<&str> = header.split_whitespace().collect();
    let malformed = |detail: String| ParseError::MalformedResidualRow {
        path: path.clone(),
        header: String::from(header),
        detail,
    };
    if names.len() < 2 {
        return Err(malformed(format!("header has {} columns, expected at least 2", names.len())));
    }
    let width: usize = names.len() + 1;

    let mut row_last: Option<&str> = None;
    for row in rows.iter() {
        let row: &str = row.as_ref();
        if row.split_whitespace().count() != width {
            defo!("row width differs; table ends before {:?}", row);
            break;
        }
        row_last = Some(row);
    }
    let row: &str = match row_last {
        Some(row) => row,
        None => {
            return Err(malformed(format!("no row with {} columns follows the header", width)));
        }
    };
    let tokens: Vec<&str> = row.split_whitespace().collect();

    let iteration: Iteration = match tokens[0].parse::<Iteration>() {
        Ok(val) => val,
        Err(err) => {
            return Err(malformed(format!("iteration {:?} in row {:?}: {}", tokens[0], row, err)));
        }
    };
    let mut residuals = Residuals::with_capacity(names.len() - 2);
    for (name, token) in names[1..names.len() - 1]
        .iter()
        .zip(tokens[1..tokens.len() - 2].iter())
    {
        let value: f64 = match parse_value(token) {
            Ok(val) => val,
            Err(err) => {
                return Err(malformed(format!("residual {:?} value {:?} in row {:?}: {}", name, token, row, err)));
            }
        };
        residuals.insert(String::from(*name), value);
    }

    Ok((iteration, residuals))
}

/// Read the most recent residual table of the log at `path`, reading the file
/// backward in chunks of `bufsz` bytes.
///
/// Only the lines after the most recent residual table header are held in
/// memory.
pub fn parse_residual_table(
    path: &FPath,
    bufsz: BufSz,
) -> ResultParse<(Iteration, Residuals)> {
    defn!("({:?}, {})", path, bufsz);
    let reader = ReverseLineReader::new(path.clone(), bufsz).map_err(error_io(path))?;
    // lines after the header, last line of the file first
    let mut lines_after: Vec<String> = Vec::new();
    let mut header: Option<String> = None;
    for line in reader {
        let line: String = line.map_err(error_io(path))?;
        if is_residual_header(&line) {
            header = Some(line);
            break;
        }
        lines_after.push(line);
    }
    let header: String = match header {
        Some(header) => header,
        None => {
            defx!("no header among {} lines", lines_after.len());
            return Err(ParseError::MissingResidualTable { path: path.clone() });
        }
    };
    defo!("header {:?}, {} lines after", header, lines_after.len());
    lines_after.reverse();
    let result = residuals_from_table(path, &header, &lines_after);
    defx!("return {:?}", result.as_ref().map(|(iteration, _)| iteration));

    result
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// pass 3: far field
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Derive the far-field conditions from the record line that follows the
/// far-field marker.
///
/// Prompt answers `yes` and `no` are dropped, as are other tokens that are
/// not numbers (e.g. the boundary zone name). The remaining numbers are, in
/// order, static pressure, Mach number, temperature, flow-direction x
/// component, flow-direction y component.
///
/// The angle of attack is `atan2(y, x)` in degrees, i.e. the angle of the
/// flow direction in the x-y plane measured from the x axis.
pub fn far_field_from_line(line: &str) -> Option<FarField> {
    let values: Vec<f64> = line
        .split_whitespace()
        .filter(|token| !FAR_FIELD_PROMPT_ANSWERS.contains(token))
        .filter_map(|token| parse_value(token).ok())
        .collect();
    defñ!("({:?}) values {:?}", line, values);
    if values.len() < FAR_FIELD_VALUES_MIN {
        return None;
    }

    Some(FarField {
        static_pressure: values[0],
        mach: values[1],
        temperature: values[2],
        alpha: values[4].atan2(values[3]).to_degrees(),
    })
}

/// Read the far-field conditions of the log at `path`.
///
/// `Err` holds a warning message: the marker is absent, or the record that
/// follows it is malformed, or the file is unreadable.
pub fn parse_far_field(path: &FPath) -> std::result::Result<FarField, String> {
    defn!("({:?})", path);
    let mut reader = match LineReader::new(path.clone()) {
        Ok(val) => val,
        Err(err) => {
            defx!("error {}", err);
            return Err(format!("far-field conditions not read from {:?}: {}", path, err));
        }
    };
    loop {
        let line: Line = match reader.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                defx!("no marker");
                return Err(format!("far-field marker {:?} not found in {:?}", FAR_FIELD_MARKER, path));
            }
            Err(err) => {
                defx!("error {}", err);
                return Err(format!("far-field conditions not read from {:?}: {}", path, err));
            }
        };
        if !line.text.contains(FAR_FIELD_MARKER) {
            continue;
        }
        defo!("marker at line {}", line.number);
        let record: Line = match reader.next_line() {
            Ok(Some(record)) => record,
            Ok(None) => {
                defx!("marker on last line");
                return Err(format!(
                    "far-field marker on last line {} of {:?}; no record follows",
                    line.number, path
                ));
            }
            Err(err) => {
                defx!("error {}", err);
                return Err(format!("far-field conditions not read from {:?}: {}", path, err));
            }
        };
        return match far_field_from_line(&record.text) {
            Some(far_field) => {
                defx!("return {:?}", far_field);
                Ok(far_field)
            }
            None => {
                defx!("malformed record");
                Err(format!(
                    "far-field record at line {} of {:?} has fewer than {} values: {:?}",
                    record.number, path, FAR_FIELD_VALUES_MIN, record.text
                ))
            }
        };
    }
}
