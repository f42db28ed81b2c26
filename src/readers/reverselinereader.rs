// src/readers/reverselinereader.rs
// … ‥

//! Implements a [`ReverseLineReader`], the driver of reading lines of a file
//! from the last line to the first line.
//!
//! A `ReverseLineReader` reads fixed-size chunks of bytes starting from the
//! end of a file and moving toward the start of the file. Each chunk is split
//! on `'\n'`. At most one chunk plus one carried-over line fragment is held in
//! memory, regardless of the file size.
//!
//! [`ReverseLineReader`]: self::ReverseLineReader

#[doc(hidden)]
use crate::common::{Count, FPath, FileOffset, FileSz, NLu8};
use crate::common::{File, FileOpenOptions};
#[allow(unused_imports)]
use crate::debug::printers::buffer_to_String_noraw;
use crate::readers::helpers::{fpath_to_path, trim_line_end};

use std::collections::VecDeque;
use std::fmt;
use std::io::prelude::Read;
use std::io::{Error, ErrorKind, Result, Seek, SeekFrom};
use std::iter::FusedIterator;

#[allow(unused_imports)]
use ::more_asserts::{debug_assert_ge, debug_assert_le};
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Chunk size in bytes for reading a file backward.
pub type BufSz = u64;

/// Absolute minimum chunk size in bytes (inclusive).
pub const BUFSZ_MIN: BufSz = 1;

/// Absolute maximum chunk size in bytes (inclusive).
pub const BUFSZ_MAX: BufSz = 0xFFFFFF;

/// Default chunk size in bytes.
pub const BUFSZ_DEF: BufSz = 8192;

/// A line of bytes without line terminator.
type LineBytes = Vec<u8>;

/// Reads the lines of a file in reverse order; the last line of the file is
/// returned first.
///
/// Implements [`Iterator`]. Each item is the text of one line without line
/// terminator, or the [`Error`] of a failed read after which the iteration
/// ends. Empty lines are skipped. Bytes that are not valid UTF-8 are
/// replaced with `U+FFFD`.
///
/// The file handle is closed when the `ReverseLineReader` is dropped.
/// Restarting requires a new `ReverseLineReader`.
///
/// [`Error`]: std::io::Error
pub struct ReverseLineReader {
    /// Path to the file.
    path: FPath,
    /// The file handle.
    file: File,
    /// Size of the file in bytes, taken during `new`.
    filesz: FileSz,
    /// Chunk size in bytes.
    bufsz: BufSz,
    /// Count of bytes from the end of the file that have been read.
    /// The next chunk ends at `filesz - offset`.
    offset: FileOffset,
    /// Reusable storage of the current chunk.
    buffer: Vec<u8>,
    /// The first fragment of the most recently read chunk. It is not yet known
    /// to be a complete line.
    segment: Option<LineBytes>,
    /// Complete lines of the most recently read chunk, in order of return.
    pending: VecDeque<LineBytes>,
    /// All chunks read and the final `segment` handled.
    finished: bool,
    /// `Count` of lines returned.
    count_lines: Count,
    /// `Count` of chunks read.
    count_chunks: Count,
}

impl fmt::Debug for ReverseLineReader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ReverseLineReader")
            .field("path", &self.path)
            .field("filesz", &self.filesz)
            .field("bufsz", &self.bufsz)
            .field("offset", &self.offset)
            .field("segment len", &self.segment.as_ref().map(|s| s.len()))
            .field("pending", &self.pending.len())
            .field("finished", &self.finished)
            .field("count_lines", &self.count_lines)
            .field("count_chunks", &self.count_chunks)
            .finish()
    }
}

impl ReverseLineReader {
    /// Create a new `ReverseLineReader`.
    ///
    /// Opens the file at `path`. Returns `Err` if the file cannot be opened,
    /// is a directory, or `bufsz` is out of range
    /// [`BUFSZ_MIN`, `BUFSZ_MAX`].
    ///
    /// [`BUFSZ_MIN`]: BUFSZ_MIN
    /// [`BUFSZ_MAX`]: BUFSZ_MAX
    pub fn new(
        path: FPath,
        bufsz: BufSz,
    ) -> Result<ReverseLineReader> {
        defn!("({:?}, {:?})", path, bufsz);
        if !(BUFSZ_MIN..=BUFSZ_MAX).contains(&bufsz) {
            defx!("bad bufsz {}; return Err(InvalidInput)", bufsz);
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("buffer size {} must be {} ≤ size ≤ {}", bufsz, BUFSZ_MIN, BUFSZ_MAX),
            ));
        }
        let file: File = match FileOpenOptions::new()
            .read(true)
            .open(fpath_to_path(&path))
        {
            Ok(val) => val,
            Err(err) => {
                defx!("open({:?}) return {:?}", path, err);
                return Err(err);
            }
        };
        let metadata = file.metadata()?;
        if metadata.is_dir() {
            defx!("return Err(Unsupported)");
            return Err(Error::new(
                ErrorKind::Unsupported,
                format!("Path is a directory {:?}", path),
            ));
        }
        let filesz: FileSz = metadata.len();
        defx!("filesz {}", filesz);

        Ok(ReverseLineReader {
            path,
            file,
            filesz,
            bufsz,
            offset: 0,
            buffer: Vec::with_capacity(0),
            segment: None,
            pending: VecDeque::new(),
            finished: false,
            count_lines: 0,
            count_chunks: 0,
        })
    }

    pub const fn filesz(&self) -> FileSz {
        self.filesz
    }

    pub const fn bufsz(&self) -> BufSz {
        self.bufsz
    }

    pub const fn path(&self) -> &FPath {
        &self.path
    }

    /// `Count` of lines returned so far.
    pub const fn count_lines_processed(&self) -> Count {
        self.count_lines
    }

    /// `Count` of chunks read so far.
    pub const fn count_chunks_read(&self) -> Count {
        self.count_chunks
    }

    /// Queue `line` for return if it is not empty.
    fn push_pending(
        &mut self,
        line: &[u8],
    ) {
        let line: &[u8] = trim_line_end(line);
        if line.is_empty() {
            return;
        }
        defo!("push_pending({:?})", buffer_to_String_noraw(line));
        self.pending.push_back(line.to_vec());
    }

    /// Read the next chunk, moving toward the start of the file, then split
    /// it into lines.
    ///
    /// The first fragment of the chunk becomes the new `segment`. The previous
    /// `segment` is either a complete line (the chunk ends with `'\n'`) or the
    /// tail of the chunk's last fragment.
    fn read_chunk(&mut self) -> Result<()> {
        debug_assert_le!(self.offset, self.filesz, "offset is past the file size");
        let remaining: FileSz = self.filesz - self.offset;
        let readsz: FileSz = std::cmp::min(remaining, self.bufsz);
        self.offset += readsz;
        let seek_to: FileOffset = self.filesz - self.offset;
        defn!("seek_to {}, readsz {}, remaining {}", seek_to, readsz, remaining);

        self.file.seek(SeekFrom::Start(seek_to))?;
        self.buffer.clear();
        self.buffer.resize(readsz as usize, 0);
        if let Err(err) = self.file.read_exact(self.buffer.as_mut_slice()) {
            defx!("read_exact error {:?}", err);
            return Err(err);
        }
        self.count_chunks += 1;

        // split the chunk into fragments `[beg, end)` at each '\n'
        let chunk: Vec<u8> = std::mem::take(&mut self.buffer);
        let mut fragments: Vec<(usize, usize)> = Vec::with_capacity(8);
        let mut beg: usize = 0;
        for at in ::memchr::memchr_iter(NLu8, &chunk) {
            fragments.push((beg, at));
            beg = at + 1;
        }
        fragments.push((beg, chunk.len()));
        debug_assert_ge!(fragments.len(), 1);

        // the last fragment of this chunk continues into the prior `segment`
        // unless this chunk ends exactly on a line terminator
        let (last_beg, last_end) = fragments[fragments.len() - 1];
        let mut last: LineBytes = chunk[last_beg..last_end].to_vec();
        if let Some(segment) = self.segment.take() {
            if chunk.last() == Some(&NLu8) {
                defo!("chunk ends on terminator; segment is a complete line");
                self.push_pending(&segment);
            } else {
                last.extend_from_slice(&segment);
            }
        }

        if fragments.len() == 1 {
            // no terminator in this chunk; the entire chunk is still a fragment
            self.segment = Some(last);
        } else {
            self.push_pending(&last);
            for (beg, end) in fragments[1..fragments.len() - 1].iter().rev() {
                self.push_pending(&chunk[*beg..*end]);
            }
            let (first_beg, first_end) = fragments[0];
            self.segment = Some(chunk[first_beg..first_end].to_vec());
        }
        self.buffer = chunk;
        defx!("pending {}, segment len {:?}", self.pending.len(), self.segment.as_ref().map(|s| s.len()));

        Ok(())
    }
}

impl Iterator for ReverseLineReader {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                self.count_lines += 1;
                return Some(Ok(String::from_utf8_lossy(&line).into_owned()));
            }
            if self.finished {
                return None;
            }
            if self.offset < self.filesz {
                if let Err(err) = self.read_chunk() {
                    self.finished = true;
                    self.segment = None;
                    return Some(Err(err));
                }
                continue;
            }
            // start of file reached; the last `segment` is the first line
            self.finished = true;
            if let Some(segment) = self.segment.take() {
                let line: &[u8] = trim_line_end(&segment);
                if !line.is_empty() {
                    self.count_lines += 1;
                    defñ!("return first line of file {:?}", buffer_to_String_noraw(line));
                    return Some(Ok(String::from_utf8_lossy(line).into_owned()));
                }
            }
            return None;
        }
    }
}

impl FusedIterator for ReverseLineReader {}
