// src/data/mod.rs

//! The `data` module is specialized data containers for the values harvested
//! from solver reports: [`LogRecord`]s, [`ForceReport`]s, and the
//! [`CaseRecord`] that merges them.
//!
//! ## Definitions of data
//!
//! ### Log
//!
//! A "log" is the text transcript of a solver run. It has:
//!
//! * a first non-blank line naming the journal file `-i <case>.jou`.
//! * one or more residual tables; each table has a header line starting with
//!   `iter` followed by rows, one row per iteration.
//! * optionally, a pressure far-field boundary-condition record.
//!
//! A log is represented by a [`LogRecord`] and parsed by a
//! [`ResidualLogParser`].
//!
//! ### Force report
//!
//! A "force report" is a text dump of forces, moments or coefficients.
//! It has one or more "blocks". Each block has:
//!
//! * a title line, e.g. `Forces - Direction Vector (1 0 0)`. A
//!   "single-block" report has no title line.
//! * a "group" header line, e.g. `Forces (n)   Coefficients`.
//! * a "force-type" header line, e.g. `Zone  Pressure  Viscous  Total …`,
//!   where the force-types are spread evenly across the groups.
//! * "zone" rows, one per mesh zone.
//! * a terminator line beginning with `-`.
//!
//! A force report is represented by a [`ForceReport`] and parsed by a
//! [`ForceTableParser`].
//!
//! ### Case
//!
//! A "case" is a directory holding one file per "role" (e.g. `Log`, `FX`).
//! A case is represented by a [`CaseRecord`] and loaded by a
//! [`ReportAggregator`].
//!
//! [`LogRecord`]: crate::data::logrecord::LogRecord
//! [`ForceReport`]: crate::data::forcereport::ForceReport
//! [`CaseRecord`]: crate::data::caserecord::CaseRecord
//! [`ResidualLogParser`]: crate::readers::residuallogparser::ResidualLogParser
//! [`ForceTableParser`]: crate::readers::forcetableparser::ForceTableParser
//! [`ReportAggregator`]: crate::readers::reportaggregator::ReportAggregator

pub mod caserecord;
pub mod forcereport;
pub mod logrecord;
