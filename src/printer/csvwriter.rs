// src/printer/csvwriter.rs

//! Projection of [`CaseRecord`]s into a CSV table, one row per case
//! directory.
//!
//! The columns are a [`ColumnSpec`], an ordered list of titled
//! [JSON pointers] into the JSON form of a `CaseRecord`. The first cell of
//! every row is the case directory name.
//!
//! Cells are quoted per [RFC 4180] when needed.
//!
//! [`CaseRecord`]: crate::data::caserecord::CaseRecord
//! [`ColumnSpec`]: self::ColumnSpec
//! [JSON pointers]: https://www.rfc-editor.org/rfc/rfc6901
//! [RFC 4180]: https://www.rfc-editor.org/rfc/rfc4180

use crate::common::{FPath, FileOpenOptions};
use crate::data::caserecord::RoleRecord;
use crate::printer::printers::CaseRecords;
use crate::readers::helpers::fpath_to_path;

use std::borrow::Cow;
use std::io::{BufWriter, Write};

use ::indexmap::IndexSet;
use ::serde_json::Value as JsonValue;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::thiserror::Error;

/// Title of the first CSV column, the case directory name.
pub const COLUMN_TITLE_DIRECTORY: &str = "directory";

/// Separator of key path parts in default column titles.
pub const COLUMN_TITLE_SEP: &str = " / ";

/// CSV field separator.
const CSV_SEP: char = ',';

/// Errors of loading a [`ColumnSpec`].
///
/// [`ColumnSpec`]: self::ColumnSpec
#[derive(Debug, Error)]
pub enum ColumnSpecError {
    #[error("I/O error for {path:?}: {source}")]
    Io {
        path: FPath,
        #[source]
        source: std::io::Error,
    },
    #[error("column table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("column table must be a JSON object of title to JSON pointer")]
    NotAnObject,
    #[error("column {title:?}: JSON pointer must be a string, found {found}")]
    PointerNotString {
        title: String,
        found: String,
    },
    #[error("column {title:?}: JSON pointer {pointer:?} must be empty or start with '/'")]
    InvalidPointer {
        title: String,
        pointer: String,
    },
}

/// One CSV column: a title and the JSON pointer of its leaf.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Column {
    pub title: String,
    pub pointer: String,
}

impl Column {
    pub fn new(
        title: &str,
        pointer: &str,
    ) -> Column {
        Column {
            title: String::from(title),
            pointer: String::from(pointer),
        }
    }
}

/// Escape one JSON pointer reference token.
pub fn pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// JSON pointer of the key path `tokens`.
pub fn pointer_from_tokens(tokens: &[&str]) -> String {
    let mut pointer = String::new();
    for token in tokens.iter() {
        pointer.push('/');
        pointer.push_str(&pointer_token(token));
    }

    pointer
}

/// The columns of a CSV table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ColumnSpec {
    columns: Vec<Column>,
}

impl ColumnSpec {
    pub fn new(columns: Vec<Column>) -> ColumnSpec {
        ColumnSpec { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column titles; the header row without the directory column.
    pub fn titles(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.title.as_str()).collect()
    }

    /// Load a column table from a JSON object of title to JSON pointer, e.g.
    /// `{"Fx total": "/FX/Forces - Direction Vector (1 0 0)/Forces (n)/Total/Net"}`.
    /// Column order is the order of the object.
    pub fn from_json_str(data: &str) -> Result<ColumnSpec, ColumnSpecError> {
        let value: JsonValue = serde_json::from_str(data)?;
        let object = match value {
            JsonValue::Object(object) => object,
            _ => return Err(ColumnSpecError::NotAnObject),
        };
        let mut columns: Vec<Column> = Vec::with_capacity(object.len());
        for (title, pointer) in object.into_iter() {
            let pointer: String = match pointer {
                JsonValue::String(pointer) => pointer,
                other => {
                    return Err(ColumnSpecError::PointerNotString {
                        title,
                        found: other.to_string(),
                    })
                }
            };
            if !pointer.is_empty() && !pointer.starts_with('/') {
                return Err(ColumnSpecError::InvalidPointer { title, pointer });
            }
            columns.push(Column { title, pointer });
        }

        Ok(ColumnSpec { columns })
    }

    /// Load a column table from the JSON file at `path`.
    pub fn from_json_file(path: &FPath) -> Result<ColumnSpec, ColumnSpecError> {
        let data: String = std::fs::read_to_string(fpath_to_path(path)).map_err(|source| ColumnSpecError::Io {
            path: path.clone(),
            source,
        })?;

        ColumnSpec::from_json_str(&data)
    }

    /// The default columns for `zone` over all `records`.
    ///
    /// * `case`, the case name of the log.
    /// * `iteration`, the final iteration of the log.
    /// * one column per residual name.
    /// * one column per force report leaf of `zone`, titled by the joined key
    ///   path `role / block / group / force-type`.
    ///
    /// Columns appear in order of first appearance over `records`.
    pub fn for_zone(
        zone: &str,
        records: &CaseRecords,
    ) -> ColumnSpec {
        defn!("({:?}, {} records)", zone, records.len());
        let mut columns: IndexSet<Column> = IndexSet::new();
        for record in records.values() {
            for (role, role_record) in record.iter() {
                match role_record {
                    RoleRecord::Log(log) => {
                        let role: &str = role.as_str();
                        columns.insert(Column::new("case", &pointer_from_tokens(&[role, "caseName"])));
                        columns.insert(Column::new("iteration", &pointer_from_tokens(&[role, "iteration"])));
                        for name in log.residuals().keys() {
                            let path: [&str; 3] = [role, "residuals", name];
                            let pointer: String = pointer_from_tokens(&path);
                            columns.insert(Column::new(name, &pointer));
                        }
                    }
                    RoleRecord::Force(report) => {
                        for (block, group, force_type, zone_, _value) in report.cells() {
                            if zone_ != zone {
                                continue;
                            }
                            let path: [&str; 5] = [role, block, group, force_type, zone_];
                            let title: String = path[..4].join(COLUMN_TITLE_SEP);
                            let pointer: String = pointer_from_tokens(&path);
                            columns.insert(Column { title, pointer });
                        }
                    }
                }
            }
        }
        defx!("{} columns", columns.len());

        ColumnSpec {
            columns: columns.into_iter().collect(),
        }
    }

    /// The cells of one row for the JSON form of a `CaseRecord`, without the
    /// directory cell.
    pub fn row(
        &self,
        record: &JsonValue,
    ) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| match record.pointer(&column.pointer) {
                Some(value) => cell_text(value),
                None => String::new(),
            })
            .collect()
    }
}

/// Text of one JSON leaf as a CSV cell.
///
/// Arrays, e.g. vector values, are space-separated components. Missing and
/// `null` values are empty.
pub fn cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(values) => values
            .iter()
            .map(cell_text)
            .collect::<Vec<String>>()
            .join(" "),
        JsonValue::Object(_) => value.to_string(),
    }
}

/// Quote `cell` if it holds a separator, a quote, or a line break.
pub fn escape_cell(cell: &str) -> Cow<'_, str> {
    if cell.contains([CSV_SEP, '"', '\n', '\r']) {
        return Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")));
    }

    Cow::Borrowed(cell)
}

/// Write one CSV record terminated by CRLF.
fn write_record<W: Write, S: AsRef<str>>(
    writer: &mut W,
    cells: &[S],
) -> std::io::Result<()> {
    let line: Vec<Cow<str>> = cells.iter().map(|cell| escape_cell(cell.as_ref())).collect();
    writer.write_all(line.join(",").as_bytes())?;
    writer.write_all(b"\r\n")?;

    Ok(())
}

/// Write the header row and one row per record of `records`.
pub fn write_csv<W: Write>(
    writer: &mut W,
    spec: &ColumnSpec,
    records: &CaseRecords,
) -> std::io::Result<()> {
    let mut header: Vec<&str> = vec![COLUMN_TITLE_DIRECTORY];
    header.extend(spec.titles());
    write_record(writer, header.as_slice())?;
    for (dir_name, record) in records.iter() {
        let json: JsonValue = record.to_json_value()?;
        let mut row: Vec<String> = vec![dir_name.clone()];
        row.extend(spec.row(&json));
        write_record(writer, row.as_slice())?;
    }

    Ok(())
}

/// Write the CSV table to a new file at `path`, replacing any existing file.
pub fn write_csv_file(
    path: &FPath,
    spec: &ColumnSpec,
    records: &CaseRecords,
) -> std::io::Result<()> {
    defn!("({:?}, {} columns)", path, spec.len());
    let file = FileOpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(fpath_to_path(path))?;
    let mut writer = BufWriter::new(file);
    write_csv(&mut writer, spec, records)?;
    writer.flush()?;
    defx!();

    Ok(())
}

/// Rows of `records` as a CSV string; used for short outputs and tests.
pub fn csv_string(
    spec: &ColumnSpec,
    records: &CaseRecords,
) -> std::io::Result<String> {
    let mut buffer: Vec<u8> = Vec::new();
    write_csv(&mut buffer, spec, records)?;

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
