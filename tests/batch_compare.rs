use std::fs;

use lifecycle_cost_estimator::batch::{
    compare_csv, compare_csv_file, write_comparison_csv, BatchError, RowIssue, TOTAL_COLUMN,
};

const HEADER: &str = "Equipment,Initial Cost,Maintenance Cost,Maintenance Interval,Replacement Cost,Replacement Interval,Reuse Rate,Operating Life,Downtime Cost,Discount Rate";

#[test]
fn rows_keep_input_order_and_regression_total() {
    let csv = format!(
        "{HEADER}\n\
         Pump,50000,1000,12,10000,7,10,7,3000,8\n\
         Diesel Generator,100000,2000,6,20000,5,20,10,0,6\n"
    );
    let report = compare_csv(csv.as_bytes(), true).expect("compare");
    assert!(!report.has_failures());
    let names: Vec<&str> = report
        .comparison
        .entries()
        .iter()
        .map(|e| e.equipment.as_str())
        .collect();
    assert_eq!(names, ["Pump", "Diesel Generator"]);
    let total = report.comparison.total_for("Diesel Generator").expect("row");
    assert!(((total - 135_988.579_915_819_54) / total).abs() < 1e-6);
    assert_eq!(report.comparison.ranked()[0].equipment, "Diesel Generator");
}

#[test]
fn bad_rows_are_reported_and_others_survive() {
    let csv = format!(
        "{HEADER}\n\
         Good,1000,10,6,100,5,0,10,0,5\n\
         BadNumber,abc,10,6,100,5,0,10,0,5\n\
         ZeroLife,1000,10,6,100,5,0,0,0,5\n"
    );
    let report = compare_csv(csv.as_bytes(), true).expect("compare");
    assert_eq!(report.comparison.len(), 1);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].row, 2);
    assert!(matches!(report.failures[0].issue, RowIssue::NotANumber { .. }));
    assert!(matches!(report.failures[1].issue, RowIssue::Invalid(_)));
    assert_eq!(report.failures[1].equipment.as_deref(), Some("ZeroLife"));
}

#[test]
fn missing_column_fails_every_row() {
    let csv = "Equipment,Initial Cost\nPump,100\n";
    let report = compare_csv(csv.as_bytes(), true).expect("compare");
    assert!(report.comparison.is_empty());
    assert!(matches!(report.failures[0].issue, RowIssue::MissingColumn(_)));
}

#[test]
fn header_only_file_is_empty_error() {
    let csv = format!("{HEADER}\n");
    assert!(matches!(compare_csv(csv.as_bytes(), true), Err(BatchError::Empty)));
}

#[test]
fn file_round_trip_through_comparison_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("equipment.csv");
    fs::write(
        &input,
        format!("{HEADER}\nA,1000,10,6,100,5,0,10,0,5\nB,2000,10,6,100,5,0,10,,5\n"),
    )
    .expect("write input");
    let report = compare_csv_file(&input, true).expect("compare file");
    assert_eq!(report.comparison.len(), 2);

    let mut out = Vec::new();
    write_comparison_csv(&mut out, &report.comparison).expect("write");
    let text = String::from_utf8(out).expect("utf8");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(format!("Equipment,{TOTAL_COLUMN}").as_str()));
    assert!(lines.next().is_some_and(|l| l.starts_with("A,")));
    assert!(lines.next().is_some_and(|l| l.starts_with("B,")));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = compare_csv_file(dir.path().join("nope.csv"), true).unwrap_err();
    assert!(matches!(err, BatchError::Io(_)));
}

#[test]
fn validated_items_compare_in_given_order() {
    use lifecycle_cost_estimator::{batch::compare_equipment, config::FormDefaults};

    let base = FormDefaults::default().to_parameters();
    let mut cheap = base.clone();
    cheap.name = "Cheap".into();
    cheap.initial_cost = 1_000.0;
    let mut dear = base;
    dear.name = "Dear".into();
    dear.initial_cost = 9_000.0;

    let result = compare_equipment(&[dear, cheap]);
    assert_eq!(result.entries()[0].equipment, "Dear");
    assert_eq!(result.ranked()[0].equipment, "Dear");
    assert_eq!(result.ranked()[1].equipment, "Cheap");
    assert!(result.total_for("Cheap") < result.total_for("Dear"));
}

#[test]
fn undecodable_row_fails_alone() {
    let mut csv = format!("{HEADER}\nGood,1000,10,6,100,5,0,10,0,5\n").into_bytes();
    csv.extend_from_slice(b"Bad\xff,1000,10,6,100,5,0,10,0,5\n");
    csv.extend_from_slice(b"AlsoGood,2000,10,6,100,5,0,10,0,5\n");

    let report = compare_csv(csv.as_slice(), true).expect("compare");
    let names: Vec<&str> = report
        .comparison
        .entries()
        .iter()
        .map(|e| e.equipment.as_str())
        .collect();
    assert_eq!(names, ["Good", "AlsoGood"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row, 2);
    assert!(matches!(
        report.failures[0].issue,
        RowIssue::Encoding { ref column } if column == "Equipment"
    ));
    assert!(report.failures[0]
        .equipment
        .as_deref()
        .is_some_and(|n| n.starts_with("Bad")));
}
