mod common;

use common::TestWorkspace;
use csv_ingest::io_utils;
use csv_ingest::profile::{FileProfile, profile_file};
use encoding_rs::UTF_8;

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}

#[test]
fn numeric_flag_falls_permanently() {
    let mut profile = FileProfile::new(&headers(&["points"]));
    for value in ["12", "34", "abc", "56"] {
        profile.observe_row(&row(&[value]));
    }
    let column = &profile.columns()[0];
    assert!(!column.is_numeric);
}

#[test]
fn decimal_flag_set_by_fractional_value() {
    let mut profile = FileProfile::new(&headers(&["points"]));
    profile.observe_row(&row(&["12"]));
    profile.observe_row(&row(&["34.5"]));
    let column = &profile.columns()[0];
    assert!(column.is_numeric);
    assert!(column.has_decimal);
}

#[test]
fn integers_only_leave_decimal_unset() {
    let mut profile = FileProfile::new(&headers(&["points"]));
    profile.observe_row(&row(&["12"]));
    profile.observe_row(&row(&["34"]));
    let column = &profile.columns()[0];
    assert!(column.is_numeric);
    assert!(!column.has_decimal);
}

#[test]
fn empty_cells_do_not_touch_numeric_flags() {
    let mut profile = FileProfile::new(&headers(&["points"]));
    profile.observe_row(&row(&["12"]));
    profile.observe_row(&row(&[""]));
    profile.observe_row(&row(&["34.5"]));
    let column = &profile.columns()[0];
    assert!(column.is_numeric);
    assert!(column.has_decimal);
    assert_eq!(column.max_length, 4);
}

#[test]
fn max_length_counts_characters() {
    let mut profile = FileProfile::new(&headers(&["name"]));
    profile.observe_row(&row(&["abc"]));
    profile.observe_row(&row(&["ééé"]));
    assert_eq!(profile.columns()[0].max_length, 3);
}

#[test]
fn all_empty_column_keeps_initial_state() {
    let mut profile = FileProfile::new(&headers(&["ghost"]));
    for _ in 0..5 {
        profile.observe_row(&row(&[""]));
    }
    let column = &profile.columns()[0];
    assert!(column.is_numeric);
    assert!(!column.has_decimal);
    assert_eq!(column.max_length, 0);
    assert!(column.samples().is_empty());
}

#[test]
fn sample_buffer_caps_at_one_hundred_non_empty_values() {
    let mut profile = FileProfile::new(&headers(&["id"]));
    for n in 0..150 {
        profile.observe_row(&[n.to_string()]);
        profile.observe_row(&[String::new()]);
    }
    let column = &profile.columns()[0];
    assert_eq!(column.samples().len(), 100);
    assert_eq!(column.samples()[0], "0");
}

#[test]
fn profiles_a_csv_file_end_to_end() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "tickets.csv",
        "Issue Key,Summary,Story Points\nABC-1,Fix bug,3\nABC-2,Add feature,5.5\n",
    );
    let profile = profile_file(&path, b',', UTF_8).expect("profile csv");
    assert_eq!(profile.rows_scanned(), 2);
    let names: Vec<&str> = profile.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["issue_key", "summary", "story_points"]);
    assert!(profile.columns()[2].is_numeric);
    assert!(profile.columns()[2].has_decimal);
    assert!(!profile.columns()[1].is_numeric);
}

#[test]
fn tsv_extension_resolves_to_tab_delimiter() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("tickets.tsv", "Issue Key\tSummary\nABC-1\tFix bug\n");
    let delimiter = io_utils::resolve_input_delimiter(&path, None);
    assert_eq!(delimiter, b'\t');
    let profile = profile_file(&path, delimiter, UTF_8).expect("profile tsv");
    assert_eq!(profile.rows_scanned(), 1);
    assert_eq!(profile.columns()[0].name, "issue_key");
}

#[test]
fn ragged_row_is_a_read_error() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("bad.csv", "a,b\n1,2\n3\n");
    let err = profile_file(&path, b',', UTF_8).unwrap_err();
    assert!(err.to_string().contains("reading delimited input"));
}
