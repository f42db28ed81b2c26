// src/tests/reportaggregator_tests.rs

//! tests for `reportaggregator.rs`

#![allow(non_snake_case)]

use crate::common::FPath;
use crate::data::caserecord::{CaseRecord, RoleRecord};
use crate::data::forcereport::{Value, BLOCK_NAME_SINGLE};
use crate::debug::helpers::{create_file_in_tmpdir, create_temp_dir};
use crate::readers::parseerror::ParseError;
use crate::readers::reportaggregator::ReportAggregator;
use crate::readers::reverselinereader::BUFSZ_DEF;
use crate::tests::common::{
    create_case_dir,
    test_roles,
    FORCE_MULTI_TITLE_0,
    LOG_A,
    LOG_A_ITERATION,
    LOG_NO_FAR_FIELD,
    LOG_NO_TABLE,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_ReportAggregator_load_all() {
    let tmpdir = create_temp_dir();
    let dir: FPath = create_case_dir(&tmpdir, "case1", Some(LOG_A));
    let mut aggregator = ReportAggregator::new(dir.clone(), test_roles(), BUFSZ_DEF);
    assert_eq!(aggregator.dir_name(), "case1");

    let record: CaseRecord = aggregator.load();
    assert!(aggregator.errors().is_empty(), "{:?}", aggregator.errors());
    assert!(aggregator.warnings().is_empty(), "{:?}", aggregator.warnings());
    assert_eq!(aggregator.count_files_parsed(), 3);

    let roles: Vec<&String> = record.iter().map(|(role, _)| role).collect();
    assert_eq!(roles, vec!["Log", "FX", "CoP"]);
    assert_eq!(record.log().unwrap().iteration(), LOG_A_ITERATION);
    assert!(matches!(record.get("Log"), Some(RoleRecord::Log(_))));
    assert_eq!(
        record
            .force("FX")
            .unwrap()
            .value(FORCE_MULTI_TITLE_0, "Forces (n)", "Total", "Net"),
        Some(&Value::Scalar(15.75))
    );
    assert!(record
        .force("CoP")
        .unwrap()
        .value(BLOCK_NAME_SINGLE, "Center of Pressure (m)", "X", "Net")
        .unwrap()
        .is_vector());
    assert!(record.force("Log").is_none());
}

#[test]
fn test_ReportAggregator_broken_file_isolated() {
    let tmpdir = create_temp_dir();
    let dir: FPath = create_case_dir(&tmpdir, "case1", Some(LOG_A));
    // overwrite the FX report with an uneven names line
    create_file_in_tmpdir(&tmpdir, "case1/FX", "T (1 0 0)\nA  B\nZone x y z\n");

    let mut aggregator = ReportAggregator::new(dir, test_roles(), BUFSZ_DEF);
    let record: CaseRecord = aggregator.load();
    assert_eq!(record.len(), 2);
    assert!(record.get("FX").is_none());
    assert!(record.get("Log").is_some());
    assert!(record.get("CoP").is_some());
    assert_eq!(aggregator.count_files_parsed(), 2);

    assert_eq!(aggregator.errors().len(), 1);
    let role_error = &aggregator.errors()[0];
    assert_eq!(role_error.role, "FX");
    assert!(matches!(role_error.error, ParseError::UnevenForceTypeDistribution { .. }));
    assert!(role_error.to_string().starts_with("role \"FX\": "), "{}", role_error);

    let errors = aggregator.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(aggregator.errors().is_empty());
}

#[test]
fn test_ReportAggregator_log_error_and_missing_file() {
    let tmpdir = create_temp_dir();
    let dir: FPath = create_case_dir(&tmpdir, "case1", Some(LOG_NO_TABLE));
    std::fs::remove_file(std::path::Path::new(&dir).join("CoP")).unwrap();

    let mut aggregator = ReportAggregator::new(dir, test_roles(), BUFSZ_DEF);
    let record: CaseRecord = aggregator.load();
    assert_eq!(record.len(), 1);
    assert!(record.force("FX").is_some());
    let kinds: Vec<(&str, &str)> = aggregator
        .errors()
        .iter()
        .map(|role_error| (role_error.role.as_str(), role_error.error.kind_str()))
        .collect();
    assert_eq!(
        kinds,
        vec![("Log", "MissingResidualTableError"), ("CoP", "IOError")]
    );
}

#[test]
fn test_ReportAggregator_warnings_prefixed() {
    let tmpdir = create_temp_dir();
    let dir: FPath = create_case_dir(&tmpdir, "case1", Some(LOG_NO_FAR_FIELD));
    let mut aggregator = ReportAggregator::new(dir, test_roles(), BUFSZ_DEF);
    let record: CaseRecord = aggregator.load();
    assert!(record.log().unwrap().far_field().is_none());
    assert_eq!(aggregator.warnings().len(), 1);
    assert!(aggregator.warnings()[0].starts_with("role \"Log\": "), "{:?}", aggregator.warnings());

    // warnings and errors are reset by each load
    aggregator.load();
    assert_eq!(aggregator.warnings().len(), 1);
    assert!(aggregator.errors().is_empty());
}

#[test]
fn test_ReportAggregator_role_path() {
    let aggregator = ReportAggregator::new(FPath::from("/runs/case1"), test_roles(), BUFSZ_DEF);
    let role = &aggregator.roles()[1];
    assert_eq!(aggregator.role_path(role), "/runs/case1/FX");
    assert_eq!(aggregator.dir(), "/runs/case1");
}
