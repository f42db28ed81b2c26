// src/lib.rs

//! _frplib_ harvests the values of solver case directories.
//!
//! For each case directory, a solver transcript (the "log") and a set of
//! force reports are parsed into one [`CaseRecord`]:
//!
//! * the log yields the case name, the final iteration, the final residuals,
//!   and the pressure far-field conditions. See [`ResidualLogParser`].
//! * each force report yields a nested table of forces, moments or
//!   coefficients. See [`ForceTableParser`].
//!
//! The records are written as JSON and projected into a CSV table by the
//! [`printer`] module. The [`casegen`] module generates the journal files
//! that start the cases.
//!
//! [`CaseRecord`]: crate::data::caserecord::CaseRecord
//! [`ResidualLogParser`]: crate::readers::residuallogparser::ResidualLogParser
//! [`ForceTableParser`]: crate::readers::forcetableparser::ForceTableParser
//! [`printer`]: crate::printer
//! [`casegen`]: crate::casegen

pub mod casegen;
pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
