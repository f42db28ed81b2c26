// src/readers/parseerror.rs

//! Error types raised by the parsers, [`ParseError`] and [`LineContext`].
//!
//! Every error carries the file path. Errors about a specific line also
//! carry a [`LineContext`], the line number, byte offset and text of the
//! offending line.
//!
//! [`ParseError`]: self::ParseError
//! [`LineContext`]: self::LineContext

use crate::common::{FPath, FileOffset, LineNumber};

use std::fmt;

use ::thiserror::Error;

/// The location and text of one line of an input file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LineContext {
    pub path: FPath,
    /// one-based
    pub line_number: LineNumber,
    /// byte offset of the first byte of the line
    pub byte_offset: FileOffset,
    /// line text without line terminator
    pub line: String,
}

impl fmt::Display for LineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} line {} (byte offset {}): {:?}",
            self.path, self.line_number, self.byte_offset, self.line,
        )
    }
}

/// The primary error type of the parsers.
#[derive(Debug, Error)]
pub enum ParseError {
    /// File not found or unreadable.
    #[error("I/O error for {path:?}: {source}")]
    Io {
        path: FPath,
        #[source]
        source: std::io::Error,
    },

    /// The first non-blank line of a log has no `-i <case>.jou`.
    /// `line` is `None` when the file has no non-blank line.
    #[error("no `-i <case>.jou` on the first non-blank line of {path:?}; line {line:?}")]
    MissingCaseName {
        path: FPath,
        line: Option<String>,
    },

    /// No residual table header line (starting with `iter`) in a log.
    #[error("no residual table header line starting with \"iter\" in {path:?}")]
    MissingResidualTable {
        path: FPath,
    },

    /// The residual table header was found but no usable row.
    #[error("malformed residual table in {path:?} under header {header:?}: {detail}")]
    MalformedResidualRow {
        path: FPath,
        header: String,
        detail: String,
    },

    /// A force report group header line declared no groups.
    #[error("no group names at {context}")]
    MissingGroupNames {
        context: LineContext,
    },

    /// Count of force-type names is not a multiple of the count of groups.
    #[error("{names} force-type names cannot be distributed evenly over {groups} groups at {context}")]
    UnevenForceTypeDistribution {
        context: LineContext,
        names: usize,
        groups: usize,
    },

    /// A force report data row does not match the declared columns.
    #[error("malformed data row at {context}: {detail}")]
    MalformedDataRow {
        context: LineContext,
        detail: String,
    },

    /// The file ended in the middle of a force report block.
    #[error("unexpected end of file {path:?} after line {line_number} while expecting {expecting}")]
    UnexpectedEndOfFile {
        path: FPath,
        line_number: LineNumber,
        expecting: &'static str,
    },

    /// A zone name or block title repeats within its table.
    #[error("duplicate {kind} {name:?} at {context}")]
    DuplicateName {
        context: LineContext,
        kind: &'static str,
        name: String,
    },
}

impl ParseError {
    /// Path of the file that failed to parse.
    pub fn path(&self) -> &FPath {
        match self {
            ParseError::Io { path, .. }
            | ParseError::MissingCaseName { path, .. }
            | ParseError::MissingResidualTable { path }
            | ParseError::MalformedResidualRow { path, .. }
            | ParseError::UnexpectedEndOfFile { path, .. } => path,
            ParseError::MissingGroupNames { context }
            | ParseError::UnevenForceTypeDistribution { context, .. }
            | ParseError::MalformedDataRow { context, .. }
            | ParseError::DuplicateName { context, .. } => &context.path,
        }
    }

    /// The offending line, if the error is about one line.
    pub fn line_context(&self) -> Option<&LineContext> {
        match self {
            ParseError::MissingGroupNames { context }
            | ParseError::UnevenForceTypeDistribution { context, .. }
            | ParseError::MalformedDataRow { context, .. }
            | ParseError::DuplicateName { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Short name of the error kind, for summaries.
    pub const fn kind_str(&self) -> &'static str {
        match self {
            ParseError::Io { .. } => "IOError",
            ParseError::MissingCaseName { .. } => "MissingCaseNameError",
            ParseError::MissingResidualTable { .. } => "MissingResidualTableError",
            ParseError::MalformedResidualRow { .. } => "MalformedResidualRowError",
            ParseError::MissingGroupNames { .. } => "MissingGroupNamesError",
            ParseError::UnevenForceTypeDistribution { .. } => "UnevenForceTypeDistributionError",
            ParseError::MalformedDataRow { .. } => "MalformedDataRowError",
            ParseError::UnexpectedEndOfFile { .. } => "UnexpectedEndOfFileError",
            ParseError::DuplicateName { .. } => "DuplicateNameError",
        }
    }
}

/// A convenience `Result` type alias using the crate's `ParseError` type.
pub type ResultParse<T> = std::result::Result<T, ParseError>;
