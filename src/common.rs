// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

//! Common imports, type aliases, and other globals for _frplib_.

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub use std::fs::File;
pub use std::path::Path;

// TODO: use `std::path::PathBuf` for `FPath`
/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;
pub type FPaths = Vec<FPath>;
pub type FileMetadata = std::fs::Metadata;
pub type FileOpenOptions = std::fs::OpenOptions;

/// Byte offset into a file. Zero based.
pub type FileOffset = u64;

/// Size of a file in bytes.
pub type FileSz = u64;

/// A general-purpose counting type.
pub type Count = u64;

/// One-based line number within a file.
pub type LineNumber = u64;

/// Newline byte.
#[allow(non_upper_case_globals)]
pub const NLu8: u8 = b'\n';

/// Carriage-return byte, stripped from the end of lines of CRLF files.
#[allow(non_upper_case_globals)]
pub const CRu8: u8 = b'\r';

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file roles
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The name of a file role within one case directory, e.g. `"Log"`, `"FX"`.
/// Becomes the top-level key of a [`CaseRecord`].
///
/// [`CaseRecord`]: crate::data::caserecord::CaseRecord
pub type RoleName = String;

/// Which parser handles a file.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FileRoleKind {
    /// Solver transcript; handled by a [`ResidualLogParser`].
    ///
    /// [`ResidualLogParser`]: crate::readers::residuallogparser::ResidualLogParser
    Log,
    /// Force report; handled by a [`ForceTableParser`].
    ///
    /// `single_block` is `true` for reports without block titles,
    /// e.g. a center-of-pressure report.
    ///
    /// [`ForceTableParser`]: crate::readers::forcetableparser::ForceTableParser
    Force { single_block: bool },
}

/// A file expected in every case directory.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FileRole {
    /// key of the parsed data within a [`CaseRecord`]
    ///
    /// [`CaseRecord`]: crate::data::caserecord::CaseRecord
    pub name: RoleName,
    /// file name within the case directory
    pub filename: FPath,
    pub kind: FileRoleKind,
}

impl FileRole {
    pub fn new(name: &str, filename: &str, kind: FileRoleKind) -> FileRole {
        FileRole {
            name: RoleName::from(name),
            filename: FPath::from(filename),
            kind,
        }
    }
}

pub type FileRoles = Vec<FileRole>;

/// Role name of the solver transcript in the default role table.
pub const ROLE_LOG: &str = "Log";

/// File name of the solver transcript in the default role table.
pub const FILENAME_LOG: &str = "fluent_log.log";

lazy_static::lazy_static! {
    /// The default role table.
    ///
    /// One solver transcript, six multi-block force/moment reports named by
    /// their axis, and one single-block center-of-pressure report.
    pub static ref FILE_ROLES_DEFAULT: FileRoles = {
        let mut roles: FileRoles = vec![FileRole::new(ROLE_LOG, FILENAME_LOG, FileRoleKind::Log)];
        for axis in ["FX", "FY", "FZ", "MX", "MY", "MZ"] {
            roles.push(FileRole::new(axis, axis, FileRoleKind::Force { single_block: false }));
        }
        roles.push(FileRole::new("CoP", "CoP", FileRoleKind::Force { single_block: true }));
        roles
    };
}
