// src/readers/forcetableparser.rs
// … ‥

//! Implements a [`ForceTableParser`], the driver of deriving a
//! [`ForceReport`] from a force report file.
//!
//! A force report is parsed by a state machine over the non-blank lines of
//! the file. The states are [`ForceTableState`]. The transition function
//! [`transition`] is pure: given a state and a line it returns the next state
//! and, when a block is complete, a [`ForceTableEffect`].
//!
//! ```text
//!             title line          group line           names line
//! ExpectTitle ─────────→ ExpectGroups ──────→ ExpectNames ──────→ ExpectValues ─┐
//!   ↑   │ "quoted line                                              ↑  │ zone    │
//!   └───┘                                                           └──┘ row     │
//!   ↑                                                                            │
//!   └──────────────────── terminator line `-…` (multi-block) ───────────────────┤
//!                                                                                │
//!                          Finished ←──── terminator line `-…` (single-block) ───┘
//! ```
//!
//! A single-block report starts in `ExpectGroups` with the one implicit block
//! title [`BLOCK_NAME_SINGLE`].
//!
//! [`ForceTableParser`]: self::ForceTableParser
//! [`ForceReport`]: crate::data::forcereport::ForceReport
//! [`ForceTableState`]: self::ForceTableState
//! [`transition`]: self::transition
//! [`ForceTableEffect`]: self::ForceTableEffect
//! [`BLOCK_NAME_SINGLE`]: crate::data::forcereport::BLOCK_NAME_SINGLE

use crate::common::{FPath, LineNumber};
use crate::data::forcereport::{
    BlockName,
    ForceBlock,
    ForceGroup,
    ForceReport,
    ForceTypeName,
    GroupName,
    Value,
    ZoneName,
    ZoneTable,
    BLOCK_NAME_SINGLE,
};
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn, str_to_String_noraw};
use crate::readers::helpers::{is_blank, parse_value, split_columns};
use crate::readers::linereader::{Line, LineReader};
use crate::readers::parseerror::{LineContext, ParseError, ResultParse};

use std::fmt;

use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// First char of a comment line where a block title is expected.
pub const COMMENT_CHAR: char = '"';

/// First char of a block terminator line.
pub const TERMINATOR_CHAR: char = '-';

lazy_static! {
    /// One `<name> (<vector>)` segment of a block title line, e.g.
    /// `Forces - Direction Vector (1 0 0)`.
    static ref REGEX_TITLE_SEGMENT: Regex = Regex::new(r"([^()]*?\S)\s*\(([^()]*)\)")
        .unwrap_or_else(|err| panic!("bad REGEX_TITLE_SEGMENT {}", err));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// column layout and row shape
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The columns of one block, declared by the group line and the names line.
///
/// Column `i` belongs to group `i / per_group` and has force-type
/// `force_types[i % per_group]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnLayout {
    groups: Vec<GroupName>,
    /// force-types of one group; every group has the same force-types
    force_types: Vec<ForceTypeName>,
}

impl ColumnLayout {
    /// Count of value columns, i.e. groups × force-types.
    pub fn total(&self) -> usize {
        self.groups.len() * self.force_types.len()
    }

    pub fn groups(&self) -> &[GroupName] {
        &self.groups
    }

    pub fn force_types(&self) -> &[ForceTypeName] {
        &self.force_types
    }

    /// `(group, force-type)` of every column in row-major order.
    pub fn columns(&self) -> impl Iterator<Item = (&GroupName, &ForceTypeName)> {
        self.groups
            .iter()
            .flat_map(move |group| self.force_types.iter().map(move |force_type| (group, force_type)))
    }
}

/// The shape of the values of a zone row. Every row of a block has the same
/// shape as the first row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowShape {
    /// one plain number per column
    Scalars,
    /// one `(x y …)` group of this length per column
    Vectors(usize),
    /// one `(x y …)` group of this length per group; each component is one
    /// column
    Components(usize),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// states, effects, faults
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// States of the force report state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum ForceTableState {
    /// Expect a block title line.
    ExpectTitle,
    /// Expect the group line of the block(s) `titles`.
    ExpectGroups {
        titles: Vec<BlockName>,
    },
    /// Expect the force-type names line.
    ExpectNames {
        titles: Vec<BlockName>,
        groups: Vec<GroupName>,
    },
    /// Expect a zone row or the terminator line.
    ExpectValues {
        titles: Vec<BlockName>,
        layout: ColumnLayout,
        block: ForceBlock,
        shape: Option<RowShape>,
    },
    /// The single block is complete. Remaining lines are ignored.
    Finished,
}

impl ForceTableState {
    /// The initial state.
    pub fn new(single_block: bool) -> ForceTableState {
        match single_block {
            true => ForceTableState::ExpectGroups {
                titles: vec![BlockName::from(BLOCK_NAME_SINGLE)],
            },
            false => ForceTableState::ExpectTitle,
        }
    }

    /// `true` if the end of the file is allowed in this state.
    pub const fn may_end(&self) -> bool {
        matches!(self, ForceTableState::ExpectTitle | ForceTableState::Finished)
    }

    pub const fn is_finished(&self) -> bool {
        matches!(self, ForceTableState::Finished)
    }

    /// What this state expects next, for messages.
    pub const fn expecting(&self) -> &'static str {
        match self {
            ForceTableState::ExpectTitle => "a block title line",
            ForceTableState::ExpectGroups { .. } => "a group names line",
            ForceTableState::ExpectNames { .. } => "a force-type names line",
            ForceTableState::ExpectValues { .. } => "a zone row or a terminator line",
            ForceTableState::Finished => "nothing",
        }
    }
}

impl fmt::Display for ForceTableState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name: &str = match self {
            ForceTableState::ExpectTitle => "ExpectTitle",
            ForceTableState::ExpectGroups { .. } => "ExpectGroups",
            ForceTableState::ExpectNames { .. } => "ExpectNames",
            ForceTableState::ExpectValues { .. } => "ExpectValues",
            ForceTableState::Finished => "Finished",
        };
        write!(f, "{}", name)
    }
}

/// Emitted by [`transition`] when a block is complete.
///
/// [`transition`]: self::transition
#[derive(Clone, Debug, PartialEq)]
pub enum ForceTableEffect {
    /// The terminator line of a block was read. The `block` is stored under
    /// every one of `titles`.
    BlockComplete {
        titles: Vec<BlockName>,
        block: ForceBlock,
    },
}

/// Why a line was rejected by [`transition`]. Becomes a [`ParseError`] once
/// the line's location is known.
///
/// [`transition`]: self::transition
/// [`ParseError`]: crate::readers::parseerror::ParseError
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LineFault {
    MissingGroupNames,
    UnevenForceTypeDistribution {
        names: usize,
        groups: usize,
    },
    MalformedDataRow(String),
    DuplicateName {
        kind: &'static str,
        name: String,
    },
}

impl LineFault {
    /// Attach the location of the rejected line.
    pub fn into_error(
        self,
        context: LineContext,
    ) -> ParseError {
        match self {
            LineFault::MissingGroupNames => ParseError::MissingGroupNames { context },
            LineFault::UnevenForceTypeDistribution { names, groups } => {
                ParseError::UnevenForceTypeDistribution {
                    context,
                    names,
                    groups,
                }
            }
            LineFault::MalformedDataRow(detail) => ParseError::MalformedDataRow { context, detail },
            LineFault::DuplicateName { kind, name } => ParseError::DuplicateName { context, kind, name },
        }
    }
}

/// A typed `Result` for [`transition`].
///
/// [`transition`]: self::transition
pub type ResultTransition = std::result::Result<(ForceTableState, Option<ForceTableEffect>), LineFault>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// line interpreters
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Block names declared by a title line.
///
/// Each `<name> (<vector>)` segment is one block name, e.g.
/// `Moments - Moment Center (0 0 0) Moment Axis (0 0 1)` declares
/// `Moments - Moment Center (0 0 0)` and `Moment Axis (0 0 1)`.
/// A line without segments is one block name.
pub fn block_titles(line: &str) -> Vec<BlockName> {
    let titles: Vec<BlockName> = REGEX_TITLE_SEGMENT
        .captures_iter(line)
        .filter_map(|captures| {
            let name: &str = captures.get(1)?.as_str().trim();
            let vector: Vec<&str> = captures.get(2)?.as_str().split_whitespace().collect();
            Some(format!("{} ({})", name, vector.join(" ")))
        })
        .collect();
    if titles.is_empty() {
        return vec![BlockName::from(line.trim())];
    }

    titles
}

/// Parse the values of a parenthesized zone row, e.g.
/// `(1.0 2.0 3.0) (0.1 0.2 0.3)`.
fn parse_vectors(values: &str) -> std::result::Result<Vec<Vec<f64>>, String> {
    let mut vectors: Vec<Vec<f64>> = Vec::new();
    let mut rest: &str = values;
    loop {
        let open: usize = match rest.find('(') {
            Some(at) => at,
            None => {
                if !rest.trim().is_empty() {
                    return Err(format!("unexpected text {:?} outside of parentheses", rest.trim()));
                }
                break;
            }
        };
        if !rest[..open].trim().is_empty() {
            return Err(format!("unexpected text {:?} outside of parentheses", rest[..open].trim()));
        }
        let close: usize = match rest[open..].find(')') {
            Some(at) => open + at,
            None => return Err(String::from("unclosed parenthesis")),
        };
        let inner: &str = &rest[open + 1..close];
        if inner.contains('(') {
            return Err(String::from("nested parenthesis"));
        }
        let mut vector: Vec<f64> = Vec::new();
        for token in inner.split_whitespace() {
            match parse_value(token) {
                Ok(val) => vector.push(val),
                Err(err) => return Err(format!("value {:?}: {}", token, err)),
            }
        }
        if vector.is_empty() {
            return Err(String::from("empty parentheses"));
        }
        vectors.push(vector);
        rest = &rest[close + 1..];
    }

    Ok(vectors)
}

/// Parse a zone row into the zone name, the row shape, and one `Value` per
/// column of `layout` in row-major order.
pub fn parse_zone_row(
    line: &str,
    layout: &ColumnLayout,
) -> std::result::Result<(ZoneName, RowShape, Vec<Value>), String> {
    let line: &str = line.trim();
    let (zone, values) = match line.split_once(char::is_whitespace) {
        Some((zone, values)) => (zone, values.trim()),
        None => (line, ""),
    };
    let total: usize = layout.total();

    if values.contains('(') {
        let vectors: Vec<Vec<f64>> = parse_vectors(values)?;
        let len: usize = vectors[0].len();
        if let Some(other) = vectors.iter().find(|v| v.len() != len) {
            return Err(format!("vectors of different lengths {} and {}", len, other.len()));
        }
        if vectors.len() == total {
            let values: Vec<Value> = vectors.into_iter().map(Value::Vector).collect();
            return Ok((ZoneName::from(zone), RowShape::Vectors(len), values));
        }
        if vectors.len() * len == total {
            let values: Vec<Value> = vectors.into_iter().flatten().map(Value::Scalar).collect();
            return Ok((ZoneName::from(zone), RowShape::Components(len), values));
        }
        return Err(format!(
            "{} vectors of length {} do not fit {} columns",
            vectors.len(),
            len,
            total
        ));
    }

    let tokens: Vec<&str> = values.split_whitespace().collect();
    if tokens.len() != total {
        return Err(format!("{} values for {} columns", tokens.len(), total));
    }
    let mut values_: Vec<Value> = Vec::with_capacity(total);
    for token in tokens.iter() {
        match parse_value(token) {
            Ok(val) => values_.push(Value::Scalar(val)),
            Err(err) => return Err(format!("value {:?}: {}", token, err)),
        }
    }

    Ok((ZoneName::from(zone), RowShape::Scalars, values_))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// transition function
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The state machine transition function.
///
/// `line` must not be blank. `single_block` chooses the state after a
/// terminator line.
pub fn transition(
    state: ForceTableState,
    line: &str,
    single_block: bool,
) -> ResultTransition {
    defñ!("({}, {:?})", state, str_to_String_noraw(line));
    match state {
        ForceTableState::ExpectTitle => {
            if line.trim_start().starts_with(COMMENT_CHAR) {
                return Ok((ForceTableState::ExpectTitle, None));
            }
            let titles: Vec<BlockName> = block_titles(line);
            for (index, title) in titles.iter().enumerate() {
                if titles[..index].contains(title) {
                    return Err(LineFault::DuplicateName {
                        kind: "block",
                        name: title.clone(),
                    });
                }
            }

            Ok((ForceTableState::ExpectGroups { titles }, None))
        }
        ForceTableState::ExpectGroups { titles } => {
            let groups: Vec<GroupName> = split_columns(line);
            if groups.is_empty() {
                return Err(LineFault::MissingGroupNames);
            }
            for (index, group) in groups.iter().enumerate() {
                if groups[..index].contains(group) {
                    return Err(LineFault::DuplicateName {
                        kind: "group",
                        name: group.clone(),
                    });
                }
            }

            Ok((ForceTableState::ExpectNames { titles, groups }, None))
        }
        ForceTableState::ExpectNames { titles, groups } => {
            // the first token labels the zone column
            let names: Vec<&str> = line.split_whitespace().skip(1).collect();
            if names.is_empty() || names.len() % groups.len() != 0 {
                return Err(LineFault::UnevenForceTypeDistribution {
                    names: names.len(),
                    groups: groups.len(),
                });
            }
            let per_group: usize = names.len() / groups.len();
            let force_types: Vec<ForceTypeName> = names[..per_group]
                .iter()
                .map(|name| ForceTypeName::from(*name))
                .collect();
            for (index, force_type) in force_types.iter().enumerate() {
                if force_types[..index].contains(force_type) {
                    return Err(LineFault::DuplicateName {
                        kind: "force-type",
                        name: force_type.clone(),
                    });
                }
            }
            for (group, chunk) in groups.iter().zip(names.chunks(per_group)) {
                if chunk != force_types.as_slice() {
                    return Err(LineFault::MalformedDataRow(format!(
                        "force-types {:?} of group {:?} differ from force-types {:?} of group {:?}",
                        chunk, group, force_types, groups[0],
                    )));
                }
            }
            let mut block = ForceBlock::new();
            for group in groups.iter() {
                let mut force_group = ForceGroup::new();
                for force_type in force_types.iter() {
                    force_group.insert(force_type.clone(), ZoneTable::new());
                }
                block.insert(group.clone(), force_group);
            }
            let layout = ColumnLayout { groups, force_types };

            Ok((
                ForceTableState::ExpectValues {
                    titles,
                    layout,
                    block,
                    shape: None,
                },
                None,
            ))
        }
        ForceTableState::ExpectValues {
            titles,
            layout,
            mut block,
            shape,
        } => {
            if line.starts_with(TERMINATOR_CHAR) {
                debug_assert!(block.is_rectangular(), "block {:?} is not rectangular", titles);
                let state_next: ForceTableState = match single_block {
                    true => ForceTableState::Finished,
                    false => ForceTableState::ExpectTitle,
                };
                return Ok((state_next, Some(ForceTableEffect::BlockComplete { titles, block })));
            }
            let (zone, shape_row, values) = match parse_zone_row(line, &layout) {
                Ok(val) => val,
                Err(detail) => return Err(LineFault::MalformedDataRow(detail)),
            };
            if let Some(shape_) = shape {
                if shape_ != shape_row {
                    return Err(LineFault::MalformedDataRow(format!(
                        "row shape {:?} differs from shape {:?} of the first row",
                        shape_row, shape_
                    )));
                }
            }
            for ((group, force_type), value) in layout.columns().zip(values) {
                let table: &mut ZoneTable = match block
                    .get_mut(group)
                    .and_then(|force_group| force_group.get_mut(force_type))
                {
                    Some(table) => table,
                    None => {
                        return Err(LineFault::MalformedDataRow(format!(
                            "no table for group {:?} force-type {:?}",
                            group, force_type
                        )))
                    }
                };
                if table.insert(zone.clone(), value).is_some() {
                    return Err(LineFault::DuplicateName { kind: "zone", name: zone });
                }
            }

            Ok((
                ForceTableState::ExpectValues {
                    titles,
                    layout,
                    block,
                    shape: Some(shape_row),
                },
                None,
            ))
        }
        ForceTableState::Finished => Ok((ForceTableState::Finished, None)),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ForceTableParser
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Derives a [`ForceReport`] from one force report file.
///
/// The file is open only during `parse`.
///
/// [`ForceReport`]: crate::data::forcereport::ForceReport
#[derive(Debug)]
pub struct ForceTableParser {
    path: FPath,
    /// the report has one untitled block
    single_block: bool,
}

impl ForceTableParser {
    pub fn new(
        path: FPath,
        single_block: bool,
    ) -> ForceTableParser {
        ForceTableParser { path, single_block }
    }

    pub const fn path(&self) -> &FPath {
        &self.path
    }

    pub const fn single_block(&self) -> bool {
        self.single_block
    }

    fn context(
        &self,
        line: &Line,
    ) -> LineContext {
        LineContext {
            path: self.path.clone(),
            line_number: line.number,
            byte_offset: line.offset,
            line: line.text.clone(),
        }
    }

    /// Parse the report.
    pub fn parse(&self) -> ResultParse<ForceReport> {
        defn!("({:?}, single_block {})", self.path, self.single_block);
        let map_io = |source: std::io::Error| ParseError::Io {
            path: self.path.clone(),
            source,
        };
        let mut reader = LineReader::new(self.path.clone()).map_err(map_io)?;
        let mut state = ForceTableState::new(self.single_block);
        let mut report = ForceReport::new();
        let mut line_number_last: LineNumber = 0;

        while let Some(line) = reader.next_line().map_err(map_io)? {
            line_number_last = line.number;
            if is_blank(&line.text) {
                continue;
            }
            if state.is_finished() {
                defo!("finished; ignore line {}", line.number);
                continue;
            }
            let (state_next, effect) = match transition(state, &line.text, self.single_block) {
                Ok(val) => val,
                Err(fault) => {
                    let err: ParseError = fault.into_error(self.context(&line));
                    defx!("return {}", err);
                    return Err(err);
                }
            };
            state = state_next;
            if let Some(ForceTableEffect::BlockComplete { titles, block }) = effect {
                defo!("line {}: block complete {:?}", line.number, titles);
                for title in titles.into_iter() {
                    if report.contains_key(&title) {
                        let err = ParseError::DuplicateName {
                            context: self.context(&line),
                            kind: "block",
                            name: title,
                        };
                        defx!("return {}", err);
                        return Err(err);
                    }
                    report.insert(title, block.clone());
                }
            }
        }

        if !state.may_end() {
            defx!("end of file in state {}", state);
            return Err(ParseError::UnexpectedEndOfFile {
                path: self.path.clone(),
                line_number: line_number_last,
                expecting: state.expecting(),
            });
        }
        defx!("return {} blocks", report.len());

        Ok(report)
    }
}
