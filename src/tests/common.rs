// src/tests/common.rs

//! Common data and helpers for tests: report file contents and temporary
//! case directories.

#![allow(non_upper_case_globals)]

use crate::common::{FPath, FileRole, FileRoleKind, FileRoles};
use crate::debug::helpers::{create_file_in_tmpdir, TempDir};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// solver transcripts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A solver transcript with two residual tables. The most recent row is
/// iteration 50.
pub const LOG_A: &str = "

fluent 2ddp -g -i wing aoa 4.jou
Loading \"wing.cas\"
Done.

> define/boundary-conditions/pressure-far-field
farfield no 101325 no 0.3 no 288.15 no 0.9961947 no 0.0871557 no no yes
> solve/iterate 50

  iter  continuity  x-velocity  y-velocity     time/iter
     1  1.0000e+00  2.0000e-01  1.0000e-01  0:00:09   49
     2  8.0000e-01  1.5000e-01  9.0000e-02  0:00:08   48

  iter  continuity  x-velocity  y-velocity     time/iter
    49  1.1000e-03  2.1000e-04  1.1000e-04  0:00:01    1
    50  1.0000e-03  2.0000e-04  1.0000e-04  0:00:00    0
Writing \"wing.dat\"...
Done.
";

/// Final iteration of [`LOG_A`].
pub const LOG_A_ITERATION: u64 = 50;

/// Final residuals of [`LOG_A`].
pub const LOG_A_RESIDUALS: [(&str, f64); 3] = [
    ("continuity", 0.001),
    ("x-velocity", 0.0002),
    ("y-velocity", 0.0001),
];

/// A solver transcript without a far-field record.
pub const LOG_NO_FAR_FIELD: &str = "fluent 3ddp -i cases/sweep_2.jou
  iter  continuity  x-velocity     time/iter
     7  5.0000e-02  4.0000e-03  0:00:01    3
";

/// A solver transcript without a journal argument.
pub const LOG_NO_CASE_NAME: &str = "
fluent 3ddp -g
  iter  continuity     time/iter
     1  1.0  0:00:01  0
";

/// A solver transcript without a residual table.
pub const LOG_NO_TABLE: &str = "fluent 3ddp -i case1.jou
Done.
";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// force reports
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Title of the first block of [`FORCE_MULTI`].
pub const FORCE_MULTI_TITLE_0: &str = "Forces - Direction Vector (1 0 0)";

/// Title of the second block of [`FORCE_MULTI`].
pub const FORCE_MULTI_TITLE_1: &str = "Forces - Direction Vector (0 1 0)";

/// A multi-block force report with two blocks, two groups, three
/// force-types and three zones.
pub const FORCE_MULTI: &str = "\"Force Report\"

                           Forces - Direction Vector (1 0 0)
                           Forces (n)                               Coefficients
Zone                       Pressure      Viscous       Total        Pressure      Viscous       Total
wall                       12.5          0.5           13           0.125         0.005         0.13
flap                       2.5           0.25          2.75         0.025         0.0025        0.0275
Net                        15            0.75          15.75        0.15          0.0075        0.1575
-------------------------  ------------  ------------  -----------  ------------  ------------  -----------

                           Forces - Direction Vector (0 1 0)
                           Forces (n)                               Coefficients
Zone                       Pressure      Viscous       Total        Pressure      Viscous       Total
wall                       100           1             101          1             0.01          1.01
flap                       20            0.5           20.5         0.2           0.005         0.205
Net                        120           1.5           121.5        1.2           0.015         1.215
-------------------------  ------------  ------------  -----------  ------------  ------------  -----------
";

/// A single-block report of vectors, three groups of three force-types.
pub const FORCE_SINGLE_VECTORS: &str = "Pressure        Viscous        Total
Zone  Fx Fy Fz  Fx Fy Fz  Fx Fy Fz
wall  (1.0 2.0 3.0)  (0.1 0.2 0.3)  (1.1 2.2 3.3)
--------------------
";

/// A single-block center-of-pressure style report; one vector per column.
pub const FORCE_SINGLE_COP: &str = "Center of Pressure (m)
Zone             X        Y
wall             (0.25 0 0)   (0.5 0.1 0)
Net              (0.3 0 0)    (0.6 0.1 0)
---------------------------------------
";

/// Write a case directory `name` under `tmpdir` with one file per role of
/// [`test_roles`]. `log` is the transcript; `None` omits the file.
pub fn create_case_dir(
    tmpdir: &TempDir,
    name: &str,
    log: Option<&str>,
) -> FPath {
    if let Some(log) = log {
        create_file_in_tmpdir(tmpdir, &format!("{}/fluent_log.log", name), log);
    }
    create_file_in_tmpdir(tmpdir, &format!("{}/FX", name), FORCE_MULTI);
    let path: FPath = create_file_in_tmpdir(tmpdir, &format!("{}/CoP", name), FORCE_SINGLE_COP);

    match std::path::Path::new(&path).parent() {
        Some(parent) => crate::readers::helpers::path_to_fpath(parent),
        None => panic!("no parent of {:?}", path),
    }
}

/// A small role table: a log, one multi-block and one single-block report.
pub fn test_roles() -> FileRoles {
    vec![
        FileRole::new("Log", "fluent_log.log", FileRoleKind::Log),
        FileRole::new("FX", "FX", FileRoleKind::Force { single_block: false }),
        FileRole::new("CoP", "CoP", FileRoleKind::Force { single_block: true }),
    ]
}
