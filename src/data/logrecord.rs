// src/data/logrecord.rs

//! Implements [`LogRecord`] and [`FarField`], the data harvested from one
//! solver transcript.
//!
//! [`LogRecord`]: self::LogRecord
//! [`FarField`]: self::FarField

use ::indexmap::IndexMap;
use ::serde::Serialize;

/// Name of a residual, e.g. `"continuity"`.
pub type ResidualName = String;

/// Residual name → residual value, in order of the table header.
pub type Residuals = IndexMap<ResidualName, f64>;

/// Iteration count.
pub type Iteration = u64;

/// Freestream boundary conditions of a pressure far-field boundary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarField {
    pub static_pressure: f64,
    pub mach: f64,
    pub temperature: f64,
    /// angle of attack in degrees
    pub alpha: f64,
}

/// The data harvested from one solver transcript.
///
/// Created once by a [`ResidualLogParser`]; read-only afterward.
///
/// [`ResidualLogParser`]: crate::readers::residuallogparser::ResidualLogParser
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    case_name: String,
    iteration: Iteration,
    residuals: Residuals,
    #[serde(skip_serializing_if = "Option::is_none")]
    far_field: Option<FarField>,
}

impl LogRecord {
    pub(crate) fn new(
        case_name: String,
        iteration: Iteration,
        residuals: Residuals,
        far_field: Option<FarField>,
    ) -> LogRecord {
        LogRecord {
            case_name,
            iteration,
            residuals,
            far_field,
        }
    }

    /// Case name taken from the `-i <case>.jou` argument.
    pub fn case_name(&self) -> &str {
        &self.case_name
    }

    /// Iteration of the most recent residual table row.
    pub const fn iteration(&self) -> Iteration {
        self.iteration
    }

    pub const fn residuals(&self) -> &Residuals {
        &self.residuals
    }

    pub fn residual(
        &self,
        name: &str,
    ) -> Option<f64> {
        self.residuals.get(name).copied()
    }

    pub const fn far_field(&self) -> Option<&FarField> {
        self.far_field.as_ref()
    }
}
