use std::fs;

use chrono::NaiveDate;
use tempfile::tempdir;
use timesheet_dq::domain::error::GateError;
use timesheet_dq::domain::finding::FailureCause;
use timesheet_dq::domain::record::Field;
use timesheet_dq::engine::load::{load_dataset, locate_input};

#[test]
fn locates_the_csv_among_other_files() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("manifest.json"), "{}").expect("write manifest");
    fs::create_dir(dir.path().join("nested.csv")).expect("create dir");
    fs::write(dir.path().join("Export.CSV"), "Employee\n").expect("write csv");

    let found = locate_input(dir.path()).expect("locate");
    assert_eq!(found, dir.path().join("Export.CSV"));
}

#[test]
fn missing_directory_is_an_environment_failure() {
    let dir = tempdir().expect("tempdir");
    let err = locate_input(&dir.path().join("absent")).expect_err("missing dir");

    assert!(matches!(err, GateError::ListInput { .. }));
    assert_eq!(err.cause(), FailureCause::Environment);
}

#[test]
fn loads_mixed_date_formats_and_na_markers() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("timesheet.csv");
    fs::write(
        &path,
        "Employee,Employee Nr.,Cost Center,Activity Code,Date,Hours,Description\n\
         Ada,1001,CC-1,DEV,2026-03-02,7.5,Review\n\
         Grace,1002.0,CC-2,TEST,02.03.2026,8,\n\
         Linus,#N/A,CC-3,SUPPORT,2026/03/03,n/a,On call\n",
    )
    .expect("write csv");

    let dataset = load_dataset(&path).expect("load");
    assert_eq!(dataset.len(), 3);
    assert!(dataset.has_field(Field::Description));

    let records = dataset.records();
    assert_eq!(records[0].hours, Some(7.5));
    assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2026, 3, 2));
    assert_eq!(records[1].description, None);
    assert_eq!(records[2].employee_nr, None);
    assert_eq!(records[2].hours, None);
    assert_eq!(records[2].date, NaiveDate::from_ymd_opt(2026, 3, 3));
    assert_eq!(dataset.unique_employee_count(), 2);
}

#[test]
fn rows_wider_than_header_are_parse_failures() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("timesheet.csv");
    fs::write(&path, "Employee,Hours\nAda,8\nGrace,8,extra\n").expect("write csv");

    let err = load_dataset(&path).expect_err("ragged");
    assert!(matches!(err, GateError::ParseInput { .. }));
    assert_eq!(err.cause(), FailureCause::Parse);
}

#[test]
fn header_only_file_loads_empty_dataset() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("timesheet.csv");
    fs::write(
        &path,
        "Employee,Employee Nr.,Cost Center,Activity Code,Date,Hours\n",
    )
    .expect("write csv");

    let dataset = load_dataset(&path).expect("load");
    assert!(dataset.is_empty());
    assert_eq!(dataset.fields().len(), 6);
}
