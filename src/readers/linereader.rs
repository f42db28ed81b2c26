// src/readers/linereader.rs
// …

//! Implements a [`LineReader`], the driver of reading lines of a file from
//! the first line to the last line, and [`Line`].
//!
//! [`LineReader`]: self::LineReader
//! [`Line`]: self::Line

use crate::common::{Count, FPath, FileOffset, LineNumber, NLu8};
use crate::common::{File, FileOpenOptions};
use crate::readers::helpers::{fpath_to_path, trim_line_end};

use std::fmt;
use std::io::{BufRead, BufReader, Result};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// A line of text read by a [`LineReader`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Line {
    /// one-based line number
    pub number: LineNumber,
    /// byte offset of the first byte of the line
    pub offset: FileOffset,
    /// text of the line without line terminator
    pub text: String,
}

/// Reads the lines of a file in order.
///
/// Unlike [`std::io::Lines`], a `LineReader` tracks the line number and the
/// byte offset of each line, and replaces bytes that are not valid UTF-8
/// instead of failing.
///
/// The file handle is closed when the `LineReader` is dropped.
pub struct LineReader {
    path: FPath,
    reader: BufReader<File>,
    /// byte offset of the next line
    offset: FileOffset,
    /// line number of the most recently returned line
    number: LineNumber,
    /// reusable line storage
    buffer: Vec<u8>,
}

impl fmt::Debug for LineReader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LineReader")
            .field("path", &self.path)
            .field("offset", &self.offset)
            .field("number", &self.number)
            .finish()
    }
}

impl LineReader {
    /// Open the file at `path`.
    pub fn new(path: FPath) -> Result<LineReader> {
        defñ!("({:?})", path);
        let file: File = FileOpenOptions::new()
            .read(true)
            .open(fpath_to_path(&path))?;

        Ok(LineReader {
            path,
            reader: BufReader::new(file),
            offset: 0,
            number: 0,
            buffer: Vec::with_capacity(256),
        })
    }

    pub const fn path(&self) -> &FPath {
        &self.path
    }

    /// `Count` of lines returned so far; also the line number of the most
    /// recently returned line.
    pub const fn count_lines_processed(&self) -> Count {
        self.number
    }

    /// Read the next line. `Ok(None)` at end of file.
    pub fn next_line(&mut self) -> Result<Option<Line>> {
        self.buffer.clear();
        let readsz: usize = self.reader.read_until(NLu8, &mut self.buffer)?;
        if readsz == 0 {
            return Ok(None);
        }
        self.number += 1;
        let line = Line {
            number: self.number,
            offset: self.offset,
            text: String::from_utf8_lossy(trim_line_end(&self.buffer)).into_owned(),
        };
        self.offset += readsz as FileOffset;

        Ok(Some(line))
    }

    /// Read lines until a line that is not blank. `Ok(None)` at end of file.
    pub fn next_nonblank_line(&mut self) -> Result<Option<Line>> {
        while let Some(line) = self.next_line()? {
            if !line.text.trim().is_empty() {
                return Ok(Some(line));
            }
        }

        Ok(None)
    }
}

impl Iterator for LineReader {
    type Item = Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
