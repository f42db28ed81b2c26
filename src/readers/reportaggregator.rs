// src/readers/reportaggregator.rs

//! Implements a [`ReportAggregator`], the driver of deriving a
//! [`CaseRecord`] from one case directory.
//!
//! The aggregator runs the parser matching each [`FileRole`] of the role
//! table. A file that fails to parse is recorded as an error of its role;
//! the remaining files are still parsed.
//!
//! [`ReportAggregator`]: self::ReportAggregator
//! [`CaseRecord`]: crate::data::caserecord::CaseRecord
//! [`FileRole`]: crate::common::FileRole

use crate::common::{Count, FPath, FileRole, FileRoleKind, FileRoles, RoleName};
use crate::data::caserecord::{CaseRecord, RoleRecord};
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn};
use crate::readers::forcetableparser::ForceTableParser;
use crate::readers::helpers::{basename, fpath_to_path, path_to_fpath};
use crate::readers::parseerror::{ParseError, ResultParse};
use crate::readers::residuallogparser::ResidualLogParser;
use crate::readers::reverselinereader::BufSz;

use std::fmt;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// A parse error of the file of one role.
#[derive(Debug)]
pub struct RoleError {
    pub role: RoleName,
    pub error: ParseError,
}

impl fmt::Display for RoleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "role {:?}: {}", self.role, self.error)
    }
}

pub type RoleErrors = Vec<RoleError>;

/// Derives a [`CaseRecord`] from the role files of one case directory.
///
/// [`CaseRecord`]: crate::data::caserecord::CaseRecord
pub struct ReportAggregator {
    /// the case directory
    dir: FPath,
    roles: FileRoles,
    /// chunk size for reading logs backward
    bufsz: BufSz,
    /// errors of the most recent `load`
    errors: RoleErrors,
    /// warnings of the most recent `load`
    warnings: Vec<String>,
    /// count of files parsed without error by the most recent `load`
    count_files_parsed: Count,
}

impl fmt::Debug for ReportAggregator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ReportAggregator")
            .field("dir", &self.dir)
            .field("roles", &self.roles.len())
            .field("bufsz", &self.bufsz)
            .field("errors", &self.errors.len())
            .field("warnings", &self.warnings.len())
            .finish()
    }
}

impl ReportAggregator {
    pub fn new(
        dir: FPath,
        roles: FileRoles,
        bufsz: BufSz,
    ) -> ReportAggregator {
        ReportAggregator {
            dir,
            roles,
            bufsz,
            errors: RoleErrors::new(),
            warnings: Vec::new(),
            count_files_parsed: 0,
        }
    }

    pub const fn dir(&self) -> &FPath {
        &self.dir
    }

    /// Last path component of the case directory; the key of the case in the
    /// combined output.
    pub fn dir_name(&self) -> FPath {
        basename(&self.dir)
    }

    pub fn roles(&self) -> &FileRoles {
        &self.roles
    }

    /// Per-file errors of the most recent `load`.
    pub fn errors(&self) -> &RoleErrors {
        &self.errors
    }

    /// Take the per-file errors of the most recent `load`.
    pub fn take_errors(&mut self) -> RoleErrors {
        std::mem::take(&mut self.errors)
    }

    /// Warnings of the most recent `load`, each prefixed with the role name.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub const fn count_files_parsed(&self) -> Count {
        self.count_files_parsed
    }

    /// Path of the file of `role` within the case directory.
    pub fn role_path(
        &self,
        role: &FileRole,
    ) -> FPath {
        path_to_fpath(&fpath_to_path(&self.dir).join(&role.filename))
    }

    /// Parse the file of one role.
    fn load_role(
        &mut self,
        role: &FileRole,
    ) -> ResultParse<RoleRecord> {
        let path: FPath = self.role_path(role);
        defn!("({:?}, {:?})", role.name, path);
        let record: RoleRecord = match role.kind {
            FileRoleKind::Log => {
                let mut parser = ResidualLogParser::new(path, self.bufsz);
                let result = parser.parse();
                for warning in parser.warnings() {
                    self.warnings.push(format!("role {:?}: {}", role.name, warning));
                }
                RoleRecord::Log(result?)
            }
            FileRoleKind::Force { single_block } => {
                let parser = ForceTableParser::new(path, single_block);
                RoleRecord::Force(parser.parse()?)
            }
        };
        defx!("({:?}) Ok", role.name);

        Ok(record)
    }

    /// Parse every role file of the case directory.
    ///
    /// Returns the `CaseRecord` of the files that parsed. Errors of the
    /// remaining files are available from [`errors`].
    ///
    /// [`errors`]: ReportAggregator::errors
    pub fn load(&mut self) -> CaseRecord {
        defn!("({:?})", self.dir);
        self.errors.clear();
        self.warnings.clear();
        self.count_files_parsed = 0;

        let mut record = CaseRecord::new();
        let roles: FileRoles = self.roles.clone();
        for role in roles.iter() {
            match self.load_role(role) {
                Ok(role_record) => {
                    self.count_files_parsed += 1;
                    record.insert(role.name.clone(), role_record);
                }
                Err(error) => {
                    de_err!("{}", error);
                    self.errors.push(RoleError {
                        role: role.name.clone(),
                        error,
                    });
                }
            }
        }
        defx!("({:?}) {} roles, {} errors", self.dir, record.len(), self.errors.len());

        record
    }
}
