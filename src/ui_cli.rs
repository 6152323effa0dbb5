use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::app::{self, AppError, Evaluation};
use crate::batch::{self, BatchReport, ComparisonResult};
use crate::config::Config;
use crate::export::{self, format_currency};
use crate::i18n::{keys, Translator};
use crate::lifecycle::{occurrence_counts, EquipmentParameters};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ManualCalculation,
    Compare,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_MANUAL));
    println!("{}", tr.t(keys::MAIN_MENU_COMPARE));
    println!("{}", tr.t(keys::MAIN_MENU_SETTINGS));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    read_menu_choice(tr, &mut io::stdin().lock())
}

/// 유효한 선택이 나올 때까지 읽는다. 입력이 끝나면(EOF) 종료로 본다.
fn read_menu_choice<R: BufRead>(tr: &Translator, input: &mut R) -> Result<MenuChoice, AppError> {
    loop {
        let Some(sel) = read_line_from(input, &tr.t(keys::PROMPT_MENU_SELECT))? else {
            return Ok(MenuChoice::Exit);
        };
        match sel.trim() {
            "1" => return Ok(MenuChoice::ManualCalculation),
            "2" => return Ok(MenuChoice::Compare),
            "3" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 수동 입력 메뉴를 처리한다.
pub fn handle_manual(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::MANUAL_HEADING));
    println!("{}", tr.t(keys::MANUAL_DEFAULT_HINT));
    let d = &cfg.defaults;
    let params = EquipmentParameters {
        name: read_text_or(tr, keys::PROMPT_NAME, &d.equipment_name)?,
        initial_cost: read_f64_or(tr, keys::PROMPT_INITIAL_COST, d.initial_cost)?,
        maintenance_cost_per_cycle: read_f64_or(
            tr,
            keys::PROMPT_MAINTENANCE_COST,
            d.maintenance_cost_per_cycle,
        )?,
        maintenance_interval_months: read_f64_or(
            tr,
            keys::PROMPT_MAINTENANCE_INTERVAL,
            d.maintenance_interval_months,
        )?,
        replacement_cost: read_f64_or(tr, keys::PROMPT_REPLACEMENT_COST, d.replacement_cost)?,
        replacement_interval_years: read_f64_or(
            tr,
            keys::PROMPT_REPLACEMENT_INTERVAL,
            d.replacement_interval_years,
        )?,
        reuse_rate_percent: read_f64_or(tr, keys::PROMPT_REUSE_RATE, d.reuse_rate_percent)?,
        operating_life_years: read_f64_or(
            tr,
            keys::PROMPT_OPERATING_LIFE,
            d.operating_life_years,
        )?,
        downtime_cost_per_year: read_f64_or(
            tr,
            keys::PROMPT_DOWNTIME_COST,
            d.downtime_cost_per_year,
        )?,
        discount_rate_percent: read_f64_or(
            tr,
            keys::PROMPT_DISCOUNT_RATE,
            d.discount_rate_percent,
        )?,
    };

    let eval = match app::evaluate(params) {
        Ok(eval) => eval,
        Err(AppError::Validation(e)) => {
            println!("{} {e}", tr.t(keys::VALIDATION_FAILED));
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    print_evaluation(tr, &eval, &cfg.currency_symbol);

    let answer = read_line(&tr.t(keys::PROMPT_EXPORT))?;
    if matches!(answer.trim(), "y" | "Y" | "yes") {
        let written = export::export_all(
            Path::new(&cfg.export_dir),
            &eval.params,
            &eval.breakdown,
            &cfg.currency_symbol,
        )?;
        for path in written {
            println!("{} {}", tr.t(keys::EXPORT_SAVED), path.display());
        }
    }
    Ok(())
}

/// 계산 결과(합계, 발생 횟수, 내역 표)를 출력한다.
pub fn print_evaluation(tr: &Translator, eval: &Evaluation, currency: &str) {
    let counts = occurrence_counts(&eval.params);
    println!();
    println!("{} {}", tr.t(keys::RESULT_HEADING), eval.params.name);
    println!(
        "{} {}",
        tr.t(keys::RESULT_TOTAL),
        format_currency(currency, eval.breakdown.total())
    );
    println!(
        "{} {} / {} / {}",
        tr.t(keys::RESULT_OCCURRENCES),
        counts.maintenance,
        counts.replacement,
        counts.downtime_years
    );
    println!("\n{}", tr.t(keys::RESULT_BREAKDOWN));
    for line in breakdown_table(eval, currency) {
        println!("{line}");
    }
}

/// 내역을 고정폭 2열 텍스트 표로 만든다.
pub fn breakdown_table(eval: &Evaluation, currency: &str) -> Vec<String> {
    let mut out = vec![format!("{:<20} {:>20}", "Cost Component", "Amount")];
    for line in eval.breakdown.lines() {
        out.push(format!(
            "{:<20} {:>20}",
            line.label(),
            format_currency(currency, line.amount)
        ));
    }
    out.push(format!(
        "{:<20} {:>20}",
        "Total",
        format_currency(currency, eval.breakdown.total())
    ));
    out
}

/// CSV 비교 메뉴를 처리한다.
pub fn handle_compare(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::COMPARE_HEADING));
    let path = read_line(&tr.t(keys::PROMPT_CSV_PATH))?;
    let report = app::compare_file(Path::new(path.trim()), cfg)?;
    print_comparison(tr, &report, &cfg.currency_symbol);

    let out = read_line(&tr.t(keys::PROMPT_SAVE_COMPARISON))?;
    let out = out.trim();
    if !out.is_empty() {
        let out = PathBuf::from(out);
        save_comparison(&out, &report.comparison)?;
        println!("{} {}", tr.t(keys::EXPORT_SAVED), out.display());
    }
    Ok(())
}

/// 비교 결과를 CSV 파일로 저장한다.
pub fn save_comparison(path: &Path, comparison: &ComparisonResult) -> Result<(), AppError> {
    let file = std::fs::File::create(path)?;
    batch::write_comparison_csv(file, comparison)?;
    Ok(())
}

/// 비교 표(입력 순서), 순위 막대, 실패 행을 출력한다.
pub fn print_comparison(tr: &Translator, report: &BatchReport, currency: &str) {
    println!("\n{}", tr.t(keys::COMPARE_TABLE_HEADING));
    println!("{:<24} {:>22}", batch::columns::EQUIPMENT, batch::TOTAL_COLUMN);
    for entry in report.comparison.entries() {
        println!(
            "{:<24} {:>22}",
            entry.equipment,
            format_currency(currency, entry.total_cost)
        );
    }
    if !report.comparison.is_empty() {
        println!("\n{}", tr.t(keys::COMPARE_CHART_HEADING));
        for line in render_bar_chart(&report.comparison, 40) {
            println!("{line}");
        }
    }
    if report.has_failures() {
        println!("\n{}", tr.t(keys::COMPARE_FAILURES));
        for failure in &report.failures {
            println!("  - {failure}");
        }
    }
}

/// 합계 내림차순 텍스트 막대 그래프. 음수 합계는 막대 없이 표시한다.
pub fn render_bar_chart(comparison: &ComparisonResult, width: usize) -> Vec<String> {
    let max = comparison.max_total().unwrap_or(0.0);
    let name_width = comparison
        .entries()
        .iter()
        .map(|e| e.equipment.chars().count())
        .max()
        .unwrap_or(0);
    comparison
        .ranked()
        .into_iter()
        .map(|e| {
            let len = if max > 0.0 && e.total_cost > 0.0 {
                ((e.total_cost / max) * width as f64).round() as usize
            } else {
                0
            };
            format!(
                "{:<name_width$} | {}",
                e.equipment,
                "#".repeat(len.max(usize::from(e.total_cost > 0.0)))
            )
        })
        .collect()
}

/// 설정 메뉴를 처리한다. 언어가 바뀌면 true.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<bool, AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!("{} {}", tr.t(keys::SETTINGS_CURRENT_LANGUAGE), cfg.language);
    println!(
        "{} {}",
        tr.t(keys::SETTINGS_CURRENT_CURRENCY),
        cfg.currency_symbol
    );
    let mut changed = false;
    let lang = read_line(&tr.t(keys::SETTINGS_PROMPT_LANGUAGE))?;
    match lang.trim() {
        "" => {}
        code @ ("auto" | "ko" | "ko-kr" | "en" | "en-us") => {
            cfg.language = code.to_string();
            changed = true;
        }
        _ => println!("{}", tr.t(keys::SETTINGS_INVALID)),
    }
    let currency = read_line(&tr.t(keys::SETTINGS_PROMPT_CURRENCY))?;
    if !currency.trim().is_empty() {
        cfg.currency_symbol = currency.trim().to_string();
    }
    Ok(changed)
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    Ok(read_line_from(&mut io::stdin().lock(), prompt)?.unwrap_or_default())
}

/// 한 줄을 읽는다. EOF 면 None.
fn read_line_from<R: BufRead>(input: &mut R, prompt: &str) -> Result<Option<String>, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf))
}

fn read_text_or(tr: &Translator, key: &str, default: &str) -> Result<String, AppError> {
    let s = read_line(&format!("{} [{default}]: ", tr.t(key)))?;
    let s = s.trim();
    Ok(if s.is_empty() {
        default.to_string()
    } else {
        s.to_string()
    })
}

fn read_f64_or(tr: &Translator, key: &str, default: f64) -> Result<f64, AppError> {
    loop {
        let s = read_line(&format!("{} [{default}]: ", tr.t(key)))?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(default);
        }
        match batch::parse_grouped_number(s) {
            Some(v) => return Ok(v),
            None => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_input_exits_menu() {
        let tr = Translator::new("en-us");
        let mut input = io::Cursor::new(Vec::new());
        assert_eq!(read_menu_choice(&tr, &mut input).unwrap(), MenuChoice::Exit);
    }

    #[test]
    fn menu_retries_until_valid_choice() {
        let tr = Translator::new("en-us");
        let mut input = io::Cursor::new(b"x\n\n2\n".to_vec());
        assert_eq!(read_menu_choice(&tr, &mut input).unwrap(), MenuChoice::Compare);
        let mut input = io::Cursor::new(b"9\n".to_vec());
        assert_eq!(read_menu_choice(&tr, &mut input).unwrap(), MenuChoice::Exit);
    }

    #[test]
    fn chart_is_ranked_and_scaled() {
        let mut c = ComparisonResult::new();
        c.push("Pump", 50.0);
        c.push("Boiler", 100.0);
        let lines = render_bar_chart(&c, 10);
        assert_eq!(lines[0], format!("Boiler | {}", "#".repeat(10)));
        assert_eq!(lines[1], format!("Pump   | {}", "#".repeat(5)));
    }

    #[test]
    fn table_has_header_lines_and_total() {
        let eval = app::evaluate(Config::default().defaults.to_parameters()).unwrap();
        let rows = breakdown_table(&eval, "Rs.");
        assert_eq!(rows.len(), eval.breakdown.lines().len() + 2);
        assert!(rows.last().unwrap().starts_with("Total"));
    }
}
