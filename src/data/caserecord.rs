// src/data/caserecord.rs

//! Implements [`CaseRecord`], the merged data of one case directory.
//!
//! [`CaseRecord`]: self::CaseRecord

use crate::common::RoleName;
use crate::data::forcereport::ForceReport;
use crate::data::logrecord::LogRecord;

use ::indexmap::IndexMap;
use ::serde::Serialize;

/// The data of one parsed file.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RoleRecord {
    Log(LogRecord),
    Force(ForceReport),
}

/// File role name → parsed data of that file, for one case directory.
///
/// Roles appear in the order of the role table. A file that failed to parse
/// has no entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CaseRecord(IndexMap<RoleName, RoleRecord>);

impl CaseRecord {
    pub fn new() -> CaseRecord {
        CaseRecord(IndexMap::new())
    }

    pub(crate) fn insert(
        &mut self,
        role: RoleName,
        record: RoleRecord,
    ) {
        self.0.insert(role, record);
    }

    pub fn get(
        &self,
        role: &str,
    ) -> Option<&RoleRecord> {
        self.0.get(role)
    }

    /// The first `LogRecord`, if any.
    pub fn log(&self) -> Option<&LogRecord> {
        self.0.values().find_map(|record| match record {
            RoleRecord::Log(log) => Some(log),
            RoleRecord::Force(_) => None,
        })
    }

    /// The `ForceReport` of `role`, if `role` is a parsed force report.
    pub fn force(
        &self,
        role: &str,
    ) -> Option<&ForceReport> {
        match self.0.get(role) {
            Some(RoleRecord::Force(report)) => Some(report),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RoleName, &RoleRecord)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The record as a JSON tree.
    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
