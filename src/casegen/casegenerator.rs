// src/casegen/casegenerator.rs

//! Generate one solver journal file per case from a template journal and a
//! table of case parameters.
//!
//! The case table is a JSON object of case name to an object of variable
//! name to parameter value, e.g.
//!
//! ```text
//! {
//!     "aoa_0": {"AOA": 0, "MACH": 0.3},
//!     "sweep": {"AOA": "0:2:10", "MACH": [0.3, 0.5]}
//! }
//! ```
//!
//! Every token `TEMPLATE_<VAR>` of the template is replaced by the value of
//! `<VAR>` for each case. Lines without tokens are copied to every case.
//! The journal of case `<case>` is written to `<out-dir>/<case>/<case>.jou`.

use crate::common::{FPath, FPaths, FileOpenOptions, LineNumber};
use crate::readers::helpers::{fpath_to_path, path_to_fpath};

use std::fmt;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use ::indexmap::IndexMap;
use ::lazy_static::lazy_static;
use ::regex::Regex;
use ::serde_json::Value as JsonValue;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::thiserror::Error;

/// Name of a case; also the name of its output directory and journal file.
pub type CaseName = String;
/// Name of a template variable, the `<VAR>` of `TEMPLATE_<VAR>`.
pub type VarName = String;
/// Variable name → value, for one case.
pub type CaseParams = IndexMap<VarName, ParamValue>;
/// Case name → variables, in order of the case table.
pub type CaseTable = IndexMap<CaseName, CaseParams>;

/// Prefix of a template variable token.
pub const TEMPLATE_PREFIX: &str = "TEMPLATE_";

/// File extension of generated journal files.
pub const JOURNAL_EXTENSION: &str = "jou";

/// Separator of the parts of a `start:step:end` range.
const RANGE_SEP: char = ':';

/// Ranges expand to at most this many values.
pub const RANGE_VALUES_MAX: usize = 100_000;

lazy_static! {
    static ref REGEX_TEMPLATE_VAR: Regex = Regex::new(r"\bTEMPLATE_([A-Za-z0-9_]+)\b")
        .unwrap_or_else(|err| panic!("bad REGEX_TEMPLATE_VAR {}", err));
}

/// Errors of journal generation.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("I/O error for {path:?}: {source}")]
    Io {
        path: FPath,
        #[source]
        source: std::io::Error,
    },
    #[error("case table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("case table must be a JSON object of case name to variables")]
    CasesNotAnObject,
    #[error("case {case:?}: variables must be a JSON object")]
    CaseNotAnObject {
        case: CaseName,
    },
    #[error("case name {case:?} is not usable as a directory name")]
    InvalidCaseName {
        case: CaseName,
    },
    #[error("case {case:?} variable {var:?}: {detail}")]
    InvalidParam {
        case: CaseName,
        var: VarName,
        detail: String,
    },
    #[error("case {case:?} has no variable {var:?} used by template line {line_number}")]
    MissingVariable {
        case: CaseName,
        var: VarName,
        line_number: LineNumber,
    },
}

/// A crate-local `Result` for journal generation.
pub type ResultTemplate<T> = std::result::Result<T, TemplateError>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ParamValue
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The value of one template variable for one case.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// A number, boolean or text, substituted as written.
    Scalar(String),
    /// A JSON array, substituted as space-separated values.
    List(Vec<String>),
    /// A string `start:step:end`, substituted as the space-separated values
    /// from `start` to `end` inclusive.
    LinearRange {
        start: f64,
        step: f64,
        end: f64,
    },
}

/// Format a range value without float noise, e.g. `0.30000000000000004` is
/// `0.3`.
fn format_range_value(value: f64) -> String {
    let rounded: f64 = (value * 1e9).round() / 1e9;
    match rounded == 0.0 {
        // no "-0"
        true => String::from("0"),
        false => format!("{}", rounded),
    }
}

/// Text of one scalar JSON value, or `None` for arrays, objects and `null`.
fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

impl ParamValue {
    /// Resolve a JSON value of the case table.
    pub fn from_json(value: &JsonValue) -> std::result::Result<ParamValue, String> {
        match value {
            JsonValue::String(s) => match ParamValue::parse_range(s)? {
                Some(range) => Ok(range),
                None => Ok(ParamValue::Scalar(s.clone())),
            },
            JsonValue::Array(values) => {
                let mut list: Vec<String> = Vec::with_capacity(values.len());
                for value_ in values.iter() {
                    match scalar_text(value_) {
                        Some(text) => list.push(text),
                        None => return Err(format!("list element {} is not a number, boolean or string", value_)),
                    }
                }
                Ok(ParamValue::List(list))
            }
            JsonValue::Number(_) | JsonValue::Bool(_) => match scalar_text(value) {
                Some(text) => Ok(ParamValue::Scalar(text)),
                None => Err(format!("unsupported value {}", value)),
            },
            JsonValue::Null | JsonValue::Object(_) => Err(format!("unsupported value {}", value)),
        }
    }

    /// Parse `start:step:end`. `Ok(None)` if `s` is not three numbers
    /// separated by `:`.
    pub fn parse_range(s: &str) -> std::result::Result<Option<ParamValue>, String> {
        let parts: Vec<&str> = s.split(RANGE_SEP).map(str::trim).collect();
        if parts.len() != 3 {
            return Ok(None);
        }
        let mut numbers: [f64; 3] = [0.0; 3];
        for (number, part) in numbers.iter_mut().zip(parts.iter()) {
            match part.parse::<f64>() {
                Ok(val) if val.is_finite() => *number = val,
                _ => return Ok(None),
            }
        }
        let [start, step, end] = numbers;
        if step == 0.0 {
            return Err(format!("range {:?} has step 0", s));
        }
        if (end - start) * step < 0.0 {
            return Err(format!("range {:?} never reaches its end", s));
        }
        if ((end - start) / step).floor() as usize >= RANGE_VALUES_MAX {
            return Err(format!("range {:?} has more than {} values", s, RANGE_VALUES_MAX));
        }

        Ok(Some(ParamValue::LinearRange { start, step, end }))
    }

    /// The substituted values in order.
    pub fn values(&self) -> Vec<String> {
        match self {
            ParamValue::Scalar(s) => vec![s.clone()],
            ParamValue::List(list) => list.clone(),
            ParamValue::LinearRange { start, step, end } => {
                // tolerate float error at the inclusive end
                let count: usize = ((end - start) / step + 1e-9).floor() as usize + 1;
                (0..count)
                    .map(|index| format_range_value(start + step * index as f64))
                    .collect()
            }
        }
    }

    /// The substitution text.
    pub fn render(&self) -> String {
        self.values().join(" ")
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// case table
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `true` if `case` can name one directory.
fn valid_case_name(case: &str) -> bool {
    !case.trim().is_empty() && case != "." && case != ".." && !case.contains(['/', '\\'])
}

/// Load a case table from JSON text.
pub fn load_cases_str(data: &str) -> ResultTemplate<CaseTable> {
    let value: JsonValue = serde_json::from_str(data)?;
    let cases = match value {
        JsonValue::Object(cases) => cases,
        _ => return Err(TemplateError::CasesNotAnObject),
    };
    let mut table = CaseTable::with_capacity(cases.len());
    for (case, vars) in cases.into_iter() {
        if !valid_case_name(&case) {
            return Err(TemplateError::InvalidCaseName { case });
        }
        let vars = match vars {
            JsonValue::Object(vars) => vars,
            _ => return Err(TemplateError::CaseNotAnObject { case }),
        };
        let mut params = CaseParams::with_capacity(vars.len());
        for (var, value) in vars.iter() {
            match ParamValue::from_json(value) {
                Ok(param) => {
                    params.insert(var.clone(), param);
                }
                Err(detail) => {
                    return Err(TemplateError::InvalidParam {
                        case,
                        var: var.clone(),
                        detail,
                    })
                }
            }
        }
        defo!("case {:?} {} variables", case, params.len());
        table.insert(case, params);
    }

    Ok(table)
}

/// Load a case table from the JSON file at `path`.
pub fn load_cases_file(path: &FPath) -> ResultTemplate<CaseTable> {
    defñ!("({:?})", path);
    let data: String = std::fs::read_to_string(fpath_to_path(path)).map_err(|source| TemplateError::Io {
        path: path.clone(),
        source,
    })?;

    load_cases_str(&data)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// rendering
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Variable names used by `line`, in order of appearance.
pub fn template_vars(line: &str) -> Vec<&str> {
    REGEX_TEMPLATE_VAR
        .captures_iter(line)
        .filter_map(|captures| captures.get(1).map(|var| var.as_str()))
        .collect()
}

/// Render the `template` once per case of `cases`.
///
/// Returns case name → journal text, in order of `cases`. Line endings of the
/// template are kept.
pub fn render(
    template: &str,
    cases: &CaseTable,
) -> ResultTemplate<IndexMap<CaseName, String>> {
    defn!("({} bytes, {} cases)", template.len(), cases.len());
    let mut journals: IndexMap<CaseName, String> = cases
        .keys()
        .map(|case| (case.clone(), String::with_capacity(template.len())))
        .collect();
    for (index, line) in template.split_inclusive('\n').enumerate() {
        let line_number: LineNumber = index as LineNumber + 1;
        if template_vars(line).is_empty() {
            for journal in journals.values_mut() {
                journal.push_str(line);
            }
            continue;
        }
        for (case, params) in cases.iter() {
            let mut missing: Option<VarName> = None;
            let rendered = REGEX_TEMPLATE_VAR.replace_all(line, |captures: &regex::Captures| {
                let var: &str = captures.get(1).map_or("", |var| var.as_str());
                match params.get(var) {
                    Some(param) => param.render(),
                    None => {
                        missing.get_or_insert_with(|| VarName::from(var));
                        String::new()
                    }
                }
            });
            if let Some(var) = missing {
                defx!("case {:?} missing {:?}", case, var);
                return Err(TemplateError::MissingVariable {
                    case: case.clone(),
                    var,
                    line_number,
                });
            }
            if let Some(journal) = journals.get_mut(case) {
                journal.push_str(&rendered);
            }
        }
    }
    defx!();

    Ok(journals)
}

/// Path of the journal of `case` under `out_dir`.
pub fn journal_path(
    out_dir: &FPath,
    case: &str,
) -> FPath {
    let path: PathBuf = fpath_to_path(out_dir)
        .join(case)
        .join(format!("{}.{}", case, JOURNAL_EXTENSION));

    path_to_fpath(&path)
}

/// Write one journal file per case of `cases` under `out_dir`, creating
/// directories as needed. Returns the paths written.
pub fn write_journals(
    template: &str,
    cases: &CaseTable,
    out_dir: &FPath,
) -> ResultTemplate<FPaths> {
    let journals: IndexMap<CaseName, String> = render(template, cases)?;
    let mut paths: FPaths = FPaths::with_capacity(journals.len());
    for (case, journal) in journals.iter() {
        let path: FPath = journal_path(out_dir, case);
        let error_io = |source: std::io::Error| TemplateError::Io {
            path: path.clone(),
            source,
        };
        if let Some(dir) = fpath_to_path(&path).parent() {
            std::fs::create_dir_all(dir).map_err(error_io)?;
        }
        let file = FileOpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(fpath_to_path(&path))
            .map_err(error_io)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(journal.as_bytes()).map_err(error_io)?;
        writer.flush().map_err(error_io)?;
        defo!("wrote {:?}", path);
        paths.push(path);
    }

    Ok(paths)
}

/// Generate the journals of the case table file `cases_path` from the
/// template file `template_path` under `out_dir`.
pub fn generate(
    cases_path: &FPath,
    template_path: &FPath,
    out_dir: &FPath,
) -> ResultTemplate<FPaths> {
    defn!("({:?}, {:?}, {:?})", cases_path, template_path, out_dir);
    let cases: CaseTable = load_cases_file(cases_path)?;
    let template: String = std::fs::read_to_string(fpath_to_path(template_path)).map_err(|source| {
        TemplateError::Io {
            path: template_path.clone(),
            source,
        }
    })?;
    let paths: FPaths = write_journals(&template, &cases, out_dir)?;
    defx!("{} journals", paths.len());

    Ok(paths)
}
