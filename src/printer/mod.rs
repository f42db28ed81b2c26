// src/printer/mod.rs

//! The `printer` module is for writing the harvested data
//! ([`CaseRecord`s]) as JSON and CSV files, and for printing the
//! `--summary`.
//!
//! [`CaseRecord`s]: crate::data::caserecord::CaseRecord

pub mod csvwriter;
pub mod printers;
pub mod summary;
