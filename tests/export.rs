use std::fs;

use lifecycle_cost_estimator::{
    compute_lifecycle_cost,
    export::{
        breakdown_csv::read_breakdown_csv, export_all, export_file_name, format_currency,
        report::LifecycleReport, ExportKind,
    },
    lifecycle::EquipmentParameters,
};

fn generator() -> EquipmentParameters {
    EquipmentParameters {
        name: "Diesel Generator".into(),
        initial_cost: 100_000.0,
        maintenance_cost_per_cycle: 2_000.0,
        maintenance_interval_months: 6.0,
        replacement_cost: 20_000.0,
        replacement_interval_years: 5.0,
        reuse_rate_percent: 20.0,
        operating_life_years: 10.0,
        downtime_cost_per_year: 0.0,
        discount_rate_percent: 6.0,
    }
}

#[test]
fn export_all_writes_named_csv_and_pdf() {
    let dir = tempfile::tempdir().expect("tempdir");
    let params = generator();
    let breakdown = compute_lifecycle_cost(&params);
    let written = export_all(dir.path(), &params, &breakdown, "Rs.").expect("export");

    assert_eq!(
        written,
        vec![
            dir.path().join("diesel_generator_lifecycle_cost.csv"),
            dir.path().join("diesel_generator_lifecycle_cost.pdf"),
        ]
    );

    let rows = read_breakdown_csv(fs::File::open(&written[0]).expect("open csv")).expect("read");
    assert_eq!(rows.len(), breakdown.lines().len());
    for ((label, amount), line) in rows.iter().zip(breakdown.lines()) {
        assert_eq!(label, line.label());
        assert_eq!(*amount, line.amount);
    }

    let pdf = fs::read(&written[1]).expect("read pdf");
    assert!(pdf.starts_with(b"%PDF-1.4"));
    assert!(pdf.ends_with(b"%%EOF\n"));
}

#[test]
fn pdf_report_carries_formatted_summary() {
    let params = generator();
    let report = LifecycleReport::new(&params, &compute_lifecycle_cost(&params), "Rs.");
    assert!(report.summary.iter().any(|s| s == "NPV Total Cost: Rs. 135,988.58"));
    assert_eq!(report.pages().len(), 1);
    let text = String::from_utf8_lossy(&report.to_pdf()).into_owned();
    assert!(text.contains("(Lifecycle Cost Report)"));
    assert!(text.contains("/Count 1"));
}

#[test]
fn file_names_follow_equipment_name() {
    assert_eq!(
        export_file_name("Main Pump", ExportKind::Pdf),
        "main_pump_lifecycle_cost.pdf"
    );
    assert_eq!(format_currency("$", 1234.5), "$ 1,234.50");
    assert_eq!(format_currency("", -20000.0), "-20,000.00");
}

#[test]
fn names_with_path_characters_stay_in_export_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in ["Pump A/B", "../escape"] {
        let mut params = generator();
        params.name = name.into();
        let breakdown = compute_lifecycle_cost(&params);
        let written = export_all(dir.path(), &params, &breakdown, "Rs.").expect("export");
        for path in &written {
            assert_eq!(path.parent(), Some(dir.path()), "{}", path.display());
            assert!(path.exists());
        }
    }
    assert!(dir.path().join("pump_a_b_lifecycle_cost.csv").exists());
    assert!(dir.path().join("_escape_lifecycle_cost.pdf").exists());
}
