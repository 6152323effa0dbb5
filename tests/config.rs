use std::fs;

use lifecycle_cost_estimator::config::{load_from, Config};

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let cfg = load_from(&path).expect("load");
    assert_eq!(cfg, Config::default());
    assert!(path.exists());
    assert_eq!(load_from(&path).expect("reload"), cfg);
}

#[test]
fn saved_settings_survive_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let mut cfg = Config::default();
    cfg.language = "ko-kr".into();
    cfg.currency_symbol = "$".into();
    cfg.strict_columns = false;
    cfg.defaults.discount_rate_percent = 8.5;
    cfg.save_to(&path).expect("save");
    assert_eq!(load_from(&path).expect("load"), cfg);
}

#[test]
fn partial_file_falls_back_per_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "currency_symbol = \"EUR\"\n[defaults]\noperating_life_years = 15.0\n")
        .expect("write");
    let cfg = load_from(&path).expect("load");
    assert_eq!(cfg.currency_symbol, "EUR");
    assert_eq!(cfg.language, "auto");
    assert_eq!(cfg.defaults.operating_life_years, 15.0);
    assert_eq!(cfg.defaults.maintenance_interval_months, 6.0);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "language = [").expect("write");
    assert!(load_from(&path).is_err());
}
