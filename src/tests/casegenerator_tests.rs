// src/tests/casegenerator_tests.rs

//! tests for `casegenerator.rs`

#![allow(non_snake_case)]

use crate::common::FPath;
use crate::casegen::casegenerator::{
    generate,
    journal_path,
    load_cases_str,
    render,
    template_vars,
    write_journals,
    CaseTable,
    ParamValue,
    TemplateError,
};
use crate::debug::helpers::{create_file_in_tmpdir, create_temp_dir};
use crate::readers::helpers::path_to_fpath;

use ::serde_json::json;
use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const TEMPLATE: &str = "; journal of case TEMPLATE_NAME
/file/read-case base.cas
/define/boundary-conditions/pressure-far-field farfield no 101325 no TEMPLATE_MACH no 288.15 no 1 no 0 no no yes
/solve/iterate 500
/report/forces/wall-forces yes TEMPLATE_AOA
exit yes
";

const CASES: &str = r#"{
    "aoa_0": {"NAME": "aoa_0", "MACH": 0.3, "AOA": 0},
    "aoa_4": {"NAME": "aoa_4", "MACH": 0.3, "AOA": "0:2:4"}
}"#;

fn load_cases(data: &str) -> CaseTable {
    match load_cases_str(data) {
        Ok(val) => val,
        Err(err) => panic!("load_cases_str failed {}", err),
    }
}

// -------------------------------------------------------------------------------------------------
// ParamValue

#[test_case(json!(0.3), ParamValue::Scalar(String::from("0.3")); "number")]
#[test_case(json!(12), ParamValue::Scalar(String::from("12")); "integer")]
#[test_case(json!(true), ParamValue::Scalar(String::from("true")); "boolean")]
#[test_case(json!("wall"), ParamValue::Scalar(String::from("wall")); "text")]
#[test_case(json!("1:2"), ParamValue::Scalar(String::from("1:2")); "two parts is text")]
#[test_case(json!("a:b:c"), ParamValue::Scalar(String::from("a:b:c")); "not numbers is text")]
#[test_case(json!([1, "x", false]), ParamValue::List(vec![String::from("1"), String::from("x"), String::from("false")]); "list")]
#[test_case(json!("0:0.5:2"), ParamValue::LinearRange { start: 0.0, step: 0.5, end: 2.0 }; "range")]
fn test_ParamValue_from_json(
    value: serde_json::Value,
    expect: ParamValue,
) {
    assert_eq!(ParamValue::from_json(&value).unwrap(), expect);
}

#[test_case(json!(null); "null")]
#[test_case(json!({"a": 1}); "object")]
#[test_case(json!([[1, 2]]); "nested list")]
#[test_case(json!("0:0:4"); "step zero")]
#[test_case(json!("0:-1:4"); "wrong direction")]
#[test_case(json!("0:1:1e9"); "too many values")]
fn test_ParamValue_from_json_err(value: serde_json::Value) {
    assert!(ParamValue::from_json(&value).is_err());
}

#[test_case("0:2:10", "0 2 4 6 8 10"; "integers")]
#[test_case("0:0.1:0.3", "0 0.1 0.2 0.3"; "float noise")]
#[test_case("10:-2.5:0", "10 7.5 5 2.5 0"; "descending")]
#[test_case("1:1:1", "1"; "single value")]
#[test_case("0:3:10", "0 3 6 9"; "end not reached exactly")]
#[test_case(" -1 : 0.5 : 0 ", "-1 -0.5 0"; "blanks and negative")]
fn test_ParamValue_range_render(
    range: &str,
    expect: &str,
) {
    let value: ParamValue = ParamValue::parse_range(range).unwrap().unwrap();
    assert_eq!(value.render(), expect);
    assert_eq!(value.to_string(), expect);
}

#[test]
fn test_ParamValue_list_render() {
    let value = ParamValue::List(vec![String::from("0.3"), String::from("0.5")]);
    assert_eq!(value.values().len(), 2);
    assert_eq!(value.render(), "0.3 0.5");
}

// -------------------------------------------------------------------------------------------------
// case table

#[test]
fn test_load_cases_str_order() {
    let cases: CaseTable = load_cases(CASES);
    let names: Vec<&String> = cases.keys().collect();
    assert_eq!(names, vec!["aoa_0", "aoa_4"]);
    let vars: Vec<&String> = cases["aoa_4"].keys().collect();
    assert_eq!(vars, vec!["NAME", "MACH", "AOA"]);
}

#[test_case("[1, 2]"; "not an object")]
#[test_case("{\"a\": 1}"; "case not an object")]
#[test_case("{\"\": {}}"; "empty case name")]
#[test_case("{\"a/b\": {}}"; "case name with separator")]
#[test_case("{\"..\": {}}"; "parent directory")]
#[test_case("{\"a\": {\"X\": null}}"; "invalid parameter")]
#[test_case("{"; "not json")]
fn test_load_cases_str_err(data: &str) {
    assert!(load_cases_str(data).is_err());
}

#[test]
fn test_load_cases_str_invalid_param_names_case_and_var() {
    match load_cases_str("{\"a\": {\"X\": \"0:0:1\"}}") {
        Err(TemplateError::InvalidParam { case, var, .. }) => {
            assert_eq!(case, "a");
            assert_eq!(var, "X");
        }
        result => panic!("expected InvalidParam, got {:?}", result),
    }
}

// -------------------------------------------------------------------------------------------------
// rendering

#[test_case("no tokens", &[])]
#[test_case("a TEMPLATE_X b TEMPLATE_Y_2 c", &["X", "Y_2"])]
#[test_case("NOTTEMPLATE_X", &[]; "not at word start")]
#[test_case("TEMPLATE_X,TEMPLATE_X", &["X", "X"])]
fn test_template_vars(
    line: &str,
    expect: &[&str],
) {
    assert_eq!(template_vars(line), expect);
}

#[test]
fn test_render_per_case() {
    let cases: CaseTable = load_cases(CASES);
    let journals = render(TEMPLATE, &cases).unwrap();
    assert_eq!(journals.len(), 2);

    let journal_0: &String = &journals["aoa_0"];
    assert!(journal_0.starts_with("; journal of case aoa_0\n"), "{}", journal_0);
    assert!(journal_0.contains("no 0.3 no 288.15"), "{}", journal_0);
    assert!(journal_0.contains("/report/forces/wall-forces yes 0\n"), "{}", journal_0);
    assert!(!journal_0.contains("TEMPLATE_"), "{}", journal_0);

    let journal_4: &String = &journals["aoa_4"];
    assert!(journal_4.contains("/report/forces/wall-forces yes 0 2 4\n"), "{}", journal_4);
    // lines without tokens are copied unchanged
    assert!(journal_4.contains("/solve/iterate 500\n"), "{}", journal_4);
    assert!(journal_4.ends_with("exit yes\n"), "{}", journal_4);
    assert_eq!(journal_4.lines().count(), TEMPLATE.lines().count());
}

#[test]
fn test_render_keeps_crlf() {
    let cases: CaseTable = load_cases(r#"{"c": {"A": 1}}"#);
    let journals = render("x TEMPLATE_A\r\ny\r\n", &cases).unwrap();
    assert_eq!(journals["c"], "x 1\r\ny\r\n");
}

#[test]
fn test_render_missing_variable() {
    let cases: CaseTable = load_cases(r#"{"ok": {"NAME": "n", "MACH": 1, "AOA": 2}, "short": {"NAME": "s"}}"#);
    match render(TEMPLATE, &cases) {
        Err(TemplateError::MissingVariable { case, var, line_number }) => {
            assert_eq!(case, "short");
            assert_eq!(var, "MACH");
            assert_eq!(line_number, 3);
        }
        result => panic!("expected MissingVariable, got {:?}", result),
    }
}

#[test]
fn test_render_no_cases() {
    let cases = CaseTable::new();
    assert!(render(TEMPLATE, &cases).unwrap().is_empty());
}

// -------------------------------------------------------------------------------------------------
// files

#[test]
fn test_journal_path() {
    assert_eq!(journal_path(&FPath::from("/runs"), "aoa_4"), "/runs/aoa_4/aoa_4.jou");
}

#[test]
fn test_write_journals() {
    let tmpdir = create_temp_dir();
    let out_dir: FPath = path_to_fpath(tmpdir.path());
    let cases: CaseTable = load_cases(CASES);
    let paths = write_journals(TEMPLATE, &cases, &out_dir).unwrap();
    assert_eq!(paths, vec![journal_path(&out_dir, "aoa_0"), journal_path(&out_dir, "aoa_4")]);
    let journal: String = std::fs::read_to_string(&paths[1]).unwrap();
    assert!(journal.starts_with("; journal of case aoa_4\n"), "{}", journal);
}

#[test]
fn test_generate() {
    let tmpdir = create_temp_dir();
    let cases_path: FPath = create_file_in_tmpdir(&tmpdir, "cases.json", CASES);
    let template_path: FPath = create_file_in_tmpdir(&tmpdir, "template.jou", TEMPLATE);
    let out_dir: FPath = path_to_fpath(&tmpdir.path().join("out"));
    let paths = generate(&cases_path, &template_path, &out_dir).unwrap();
    assert_eq!(paths.len(), 2);
    assert!(std::path::Path::new(&paths[0]).is_file());
}

#[test]
fn test_generate_template_not_exist() {
    let tmpdir = create_temp_dir();
    let cases_path: FPath = create_file_in_tmpdir(&tmpdir, "cases.json", CASES);
    let template_path = FPath::from("/this/path/does/not/exist/template.jou");
    let out_dir: FPath = path_to_fpath(tmpdir.path());
    match generate(&cases_path, &template_path, &out_dir) {
        Err(TemplateError::Io { path, .. }) => assert_eq!(path, template_path),
        result => panic!("expected Io, got {:?}", result),
    }
}
