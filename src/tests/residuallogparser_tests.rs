// src/tests/residuallogparser_tests.rs

//! tests for `residuallogparser.rs`

#![allow(non_snake_case)]

use crate::common::FPath;
use crate::data::logrecord::{FarField, LogRecord};
use crate::debug::helpers::{create_temp_file, ntf_fpath};
use crate::readers::parseerror::ParseError;
use crate::readers::residuallogparser::{
    case_name_from_line,
    far_field_from_line,
    is_residual_header,
    parse_case_name,
    parse_far_field,
    parse_residual_table,
    residuals_from_table,
    ResidualLogParser,
};
use crate::readers::reverselinereader::{BufSz, BUFSZ_DEF};
use crate::tests::common::{
    LOG_A,
    LOG_A_ITERATION,
    LOG_A_RESIDUALS,
    LOG_NO_CASE_NAME,
    LOG_NO_FAR_FIELD,
    LOG_NO_TABLE,
};

use ::more_asserts::assert_lt;
use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const ALPHA_TOLERANCE: f64 = 1e-4;

#[test_case("fluent 2ddp -g -i wing aoa 4.jou", Some("wing aoa 4"))]
#[test_case("fluent 3ddp -i case1.jou", Some("case1"))]
#[test_case("fluent 3ddp -icase1.jou", Some("case1"); "no space")]
#[test_case("fluent 3ddp -i cases/sweep_2.jou -t8", Some("cases/sweep_2"); "path then option")]
#[test_case("fluent 3ddp -i C:\\runs\\m0.8.jou", Some("C:\\runs\\m0.8"); "windows path")]
#[test_case("fluent 3ddp -g", None)]
#[test_case("fluent 3ddp -i case1.journal", None; "wrong extension")]
#[test_case("", None)]
fn test_case_name_from_line(
    line: &str,
    expect: Option<&str>,
) {
    assert_eq!(case_name_from_line(line).as_deref(), expect);
}

#[test_case("  iter  continuity  x-velocity     time/iter", true)]
#[test_case("iter continuity", true)]
#[test_case("iter", true)]
#[test_case("iterate 50", false)]
#[test_case("> solve/iterate 50", false)]
#[test_case("     1  1.0000e+00", false)]
fn test_is_residual_header(
    line: &str,
    expect: bool,
) {
    assert_eq!(is_residual_header(line), expect);
}

#[test]
fn test_residuals_from_table_last_row_used() {
    let path = FPath::from("log");
    let header = "iter  continuity  x-velocity  time/iter";
    let rows = [
        "1  1.0  0.5  0:00:02  1",
        "2  0.5  0.25  0:00:01  0",
        "! solution is converged",
        "3  0.1  0.1  0:00:00  0",
    ];
    let (iteration, residuals) = residuals_from_table(&path, header, &rows).unwrap();
    assert_eq!(iteration, 2);
    assert_eq!(residuals.len(), 2);
    assert_eq!(residuals.get_index(0), Some((&String::from("continuity"), &0.5)));
    assert_eq!(residuals.get_index(1), Some((&String::from("x-velocity"), &0.25)));
}

#[test_case("iter", &["1  0:00:01"]; "header too narrow")]
#[test_case("iter  continuity  time/iter", &[] as &[&str]; "no rows")]
#[test_case("iter  continuity  time/iter", &["Done."]; "no row of the width")]
#[test_case("iter  continuity  time/iter", &["x  1.0  0:00:01  0"]; "iteration not a number")]
#[test_case("iter  continuity  time/iter", &["1  bad  0:00:01  0"]; "residual not a number")]
#[test_case("iter  continuity  time/iter", &["1  NaN  0:00:01  0"]; "residual NaN")]
#[test_case("iter  continuity  time/iter", &["1  inf  0:00:01  0"]; "residual inf")]
fn test_residuals_from_table_malformed(
    header: &str,
    rows: &[&str],
) {
    let path = FPath::from("log");
    match residuals_from_table(&path, header, rows) {
        Err(ParseError::MalformedResidualRow { path: path_, header: header_, .. }) => {
            assert_eq!(path_, path);
            assert_eq!(header_, header);
        }
        result => panic!("expected MalformedResidualRow, got {:?}", result),
    }
}

/// A table whose rows are as wide as the header, with no trailing timing
/// columns, has no row of the expected width.
#[test]
fn test_residuals_from_table_rows_as_wide_as_header() {
    let path = FPath::from("log");
    let header = "iter time continuity x-velocity y-velocity z-velocity";
    let rows = [
        "1 0.01 1.0 0.5 0.4 0.3",
        "50 0.01 0.001 0.0002 0.0001 0.0003",
    ];
    match residuals_from_table(&path, header, &rows) {
        Err(ParseError::MalformedResidualRow { detail, .. }) => {
            assert_eq!(detail, "no row with 7 columns follows the header");
        }
        result => panic!("expected MalformedResidualRow, got {:?}", result),
    }
}

#[test_case(1)]
#[test_case(2)]
#[test_case(16)]
#[test_case(64)]
#[test_case(BUFSZ_DEF)]
fn test_parse_residual_table_bufsz(bufsz: BufSz) {
    let ntf = create_temp_file(LOG_A);
    let (iteration, residuals) = parse_residual_table(&ntf_fpath(&ntf), bufsz).unwrap();
    assert_eq!(iteration, LOG_A_ITERATION);
    assert_eq!(residuals.len(), LOG_A_RESIDUALS.len());
    for (name, value) in LOG_A_RESIDUALS.iter() {
        assert_eq!(residuals.get(*name), Some(value), "residual {:?}", name);
    }
}

#[test]
fn test_parse_residual_table_missing() {
    let ntf = create_temp_file(LOG_NO_TABLE);
    let path = ntf_fpath(&ntf);
    match parse_residual_table(&path, BUFSZ_DEF) {
        Err(ParseError::MissingResidualTable { path: path_ }) => assert_eq!(path_, path),
        result => panic!("expected MissingResidualTable, got {:?}", result),
    }
}

#[test]
fn test_parse_case_name_missing() {
    let ntf = create_temp_file(LOG_NO_CASE_NAME);
    match parse_case_name(&ntf_fpath(&ntf)) {
        Err(ParseError::MissingCaseName { line, .. }) => {
            assert_eq!(line.as_deref(), Some("fluent 3ddp -g"));
        }
        result => panic!("expected MissingCaseName, got {:?}", result),
    }
}

#[test]
fn test_parse_case_name_empty_file() {
    let ntf = create_temp_file("\n\n");
    match parse_case_name(&ntf_fpath(&ntf)) {
        Err(ParseError::MissingCaseName { line: None, .. }) => {}
        result => panic!("expected MissingCaseName without line, got {:?}", result),
    }
}

#[test]
fn test_far_field_from_line() {
    let far_field: FarField =
        far_field_from_line("farfield no 101325 no 0.3 no 288.15 no 0.9961947 no 0.0871557 no no yes").unwrap();
    assert_eq!(far_field.static_pressure, 101325.0);
    assert_eq!(far_field.mach, 0.3);
    assert_eq!(far_field.temperature, 288.15);
    assert_lt!((far_field.alpha - 5.0).abs(), ALPHA_TOLERANCE);
}

#[test_case("no 101325 no 0.3"; "too few values")]
#[test_case(""; "empty")]
#[test_case("yes no yes"; "only answers")]
#[test_case("101325 0.5 inf 1 0"; "non-finite value dropped")]
fn test_far_field_from_line_none(line: &str) {
    assert!(far_field_from_line(line).is_none());
}

#[test]
fn test_far_field_negative_alpha() {
    let far_field: FarField = far_field_from_line("101325 0.5 300 1 -1").unwrap();
    assert_lt!((far_field.alpha + 45.0).abs(), ALPHA_TOLERANCE);
}

#[test]
fn test_parse_far_field_marker_on_last_line() {
    let ntf = create_temp_file("fluent -i a.jou\n> define/boundary-conditions/pressure-far-field\n");
    let err: String = parse_far_field(&ntf_fpath(&ntf)).unwrap_err();
    assert!(err.contains("no record follows"), "{}", err);
}

#[test_case(1)]
#[test_case(7)]
#[test_case(BUFSZ_DEF)]
fn test_ResidualLogParser_parse_LOG_A(bufsz: BufSz) {
    let ntf = create_temp_file(LOG_A);
    let mut parser = ResidualLogParser::new(ntf_fpath(&ntf), bufsz);
    let record: LogRecord = parser.parse().unwrap();
    assert!(parser.warnings().is_empty(), "{:?}", parser.warnings());
    assert_eq!(record.case_name(), "wing aoa 4");
    assert_eq!(record.iteration(), LOG_A_ITERATION);
    assert_eq!(record.residual("continuity"), Some(0.001));
    assert_eq!(record.residual("time/iter"), None);
    let far_field: &FarField = record.far_field().unwrap();
    assert_eq!(far_field.static_pressure, 101325.0);
    assert_lt!((far_field.alpha - 5.0).abs(), ALPHA_TOLERANCE);
}

#[test]
fn test_ResidualLogParser_parse_no_far_field_warns() {
    let ntf = create_temp_file(LOG_NO_FAR_FIELD);
    let mut parser = ResidualLogParser::new(ntf_fpath(&ntf), BUFSZ_DEF);
    let record: LogRecord = parser.parse().unwrap();
    assert_eq!(record.case_name(), "cases/sweep_2");
    assert_eq!(record.iteration(), 7);
    assert_eq!(record.residual("continuity"), Some(0.05));
    assert_eq!(record.residual("x-velocity"), Some(0.004));
    assert!(record.far_field().is_none());
    assert_eq!(parser.warnings().len(), 1);
    assert!(parser.warnings()[0].contains("pressure-far-field"), "{:?}", parser.warnings());
}

#[test]
fn test_ResidualLogParser_parse_clears_warnings() {
    let ntf = create_temp_file(LOG_NO_FAR_FIELD);
    let mut parser = ResidualLogParser::new(ntf_fpath(&ntf), BUFSZ_DEF);
    parser.parse().unwrap();
    parser.parse().unwrap();
    assert_eq!(parser.warnings().len(), 1);
}

#[test]
fn test_ResidualLogParser_parse_not_exist() {
    let mut parser = ResidualLogParser::new(FPath::from("/this/path/does/not/exist/log"), BUFSZ_DEF);
    match parser.parse() {
        Err(err @ ParseError::Io { .. }) => assert_eq!(err.kind_str(), "IOError"),
        result => panic!("expected Io, got {:?}", result),
    }
}

#[test]
fn test_LogRecord_serialize() {
    let ntf = create_temp_file(LOG_NO_FAR_FIELD);
    let mut parser = ResidualLogParser::new(ntf_fpath(&ntf), BUFSZ_DEF);
    let record: LogRecord = parser.parse().unwrap();
    let json: String = serde_json::to_string(&record).unwrap();
    assert_eq!(
        json,
        r#"{"caseName":"cases/sweep_2","iteration":7,"residuals":{"continuity":0.05,"x-velocity":0.004}}"#
    );
}
