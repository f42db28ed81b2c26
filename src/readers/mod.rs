// src/readers/mod.rs

//! "Readers" for _frplib_.
//!
//! ## Overview of readers
//!
//! * A [`ReportAggregator`] drives a [`ResidualLogParser`] and a
//!   [`ForceTableParser`] per file of a case directory to derive a
//!   [`CaseRecord`].
//! * A `ResidualLogParser` drives a [`LineReader`] and a
//!   [`ReverseLineReader`] to derive a [`LogRecord`].
//! * A `ForceTableParser` drives a `LineReader` to derive a
//!   [`ForceReport`].
//!
//! <br/>
//!
//! * A `ReverseLineReader` only handles `u8` bytes until a whole line is
//!   found; each line is then converted to a `String`.
//! * Case directories are found by [`find_case_dirs`].
//!
//! <br/>
//!
//! Also see [_Definitions of data_].
//!
//! <br/>
//!
//! ---
//!
//! The _frp_ binary program uses a [`ReportAggregator`] instance, one per
//! case directory, to drive processing for a case.
//!
//! <br/>
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [_Definitions of data_]: crate::data
//! [`Read`]: std::io::Read
//! [`CaseRecord`]: crate::data::caserecord::CaseRecord
//! [`LogRecord`]: crate::data::logrecord::LogRecord
//! [`ForceReport`]: crate::data::forcereport::ForceReport
//! [`find_case_dirs`]: crate::readers::filepreprocessor::find_case_dirs
//! [`ForceTableParser`]: crate::readers::forcetableparser::ForceTableParser
//! [`LineReader`]: crate::readers::linereader::LineReader
//! [`ReportAggregator`]: crate::readers::reportaggregator::ReportAggregator
//! [`ResidualLogParser`]: crate::readers::residuallogparser::ResidualLogParser
//! [`ReverseLineReader`]: crate::readers::reverselinereader::ReverseLineReader

pub mod filepreprocessor;
pub mod forcetableparser;
pub mod helpers;
pub mod linereader;
pub mod parseerror;
pub mod reportaggregator;
pub mod residuallogparser;
pub mod reverselinereader;
