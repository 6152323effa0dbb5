//! 계산 결과 내보내기 (CSV / PDF 보고서).

pub mod breakdown_csv;
pub mod pdf;
pub mod report;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::lifecycle::{CostBreakdown, EquipmentParameters};

pub use breakdown_csv::{read_breakdown_csv, write_breakdown_csv};
pub use report::{LifecycleReport, ReportRow};

/// 내보내기 파일명 접미사.
pub const FILE_SUFFIX: &str = "_lifecycle_cost";

/// 내보내기 오류.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV 오류: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV 형식 오류 ({line}행): {message}")]
    Format { line: usize, message: String },
}

/// 내보내기 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Csv,
    Pdf,
}

impl ExportKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Csv => "csv",
            ExportKind::Pdf => "pdf",
        }
    }
}

/// 설비 이름으로 파일명을 만든다: 소문자, 공백은 `_`, 고정 접미사.
///
/// `"Diesel Generator"` → `diesel_generator_lifecycle_cost.pdf`
///
/// 경로 구분자와 파일 시스템 예약 문자도 `_` 로 바꾸고 앞쪽 `.` 은 떼어내,
/// 결과가 항상 내보내기 디렉터리 안의 파일 이름 하나가 되게 한다.
pub fn export_file_name(equipment: &str, kind: ExportKind) -> String {
    let mapped: String = equipment
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = mapped.trim_start_matches('.');
    format!("{stem}{FILE_SUFFIX}.{}", kind.extension())
}

/// 두 자리 소수 + 천 단위 쉼표. 예: `-20000.0` → `-20,000.00`
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(char::from(*d));
    }
    // -0.00 은 부호 없이 표기
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// 통화 기호를 붙인 금액. 예: `Rs. 135,988.58`
pub fn format_currency(symbol: &str, amount: f64) -> String {
    if symbol.is_empty() {
        format_amount(amount)
    } else {
        format!("{symbol} {}", format_amount(amount))
    }
}

/// 내역을 CSV 파일로 저장한다.
pub fn save_breakdown_csv(path: &Path, breakdown: &CostBreakdown) -> Result<(), ExportError> {
    let mut buf = Vec::new();
    write_breakdown_csv(&mut buf, breakdown)?;
    fs::write(path, buf)?;
    info!(path = %path.display(), "breakdown CSV written");
    Ok(())
}

/// PDF 보고서를 저장한다.
pub fn save_report_pdf(
    path: &Path,
    params: &EquipmentParameters,
    breakdown: &CostBreakdown,
    currency_symbol: &str,
) -> Result<(), ExportError> {
    let report = LifecycleReport::new(params, breakdown, currency_symbol);
    fs::write(path, report.to_pdf())?;
    info!(path = %path.display(), pages = report.pages().len(), "PDF report written");
    Ok(())
}

/// 내보내기 디렉터리에 두 형식을 모두 저장하고 경로를 돌려준다.
pub fn export_all(
    dir: &Path,
    params: &EquipmentParameters,
    breakdown: &CostBreakdown,
    currency_symbol: &str,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;
    let csv_path = dir.join(export_file_name(&params.name, ExportKind::Csv));
    let pdf_path = dir.join(export_file_name(&params.name, ExportKind::Pdf));
    save_breakdown_csv(&csv_path, breakdown)?;
    save_report_pdf(&pdf_path, params, breakdown, currency_symbol)?;
    Ok(vec![csv_path, pdf_path])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_lowercase_with_underscores() {
        assert_eq!(
            export_file_name("Diesel Generator", ExportKind::Csv),
            "diesel_generator_lifecycle_cost.csv"
        );
        assert_eq!(
            export_file_name("Air Compressor 2", ExportKind::Pdf),
            "air_compressor_2_lifecycle_cost.pdf"
        );
    }

    #[test]
    fn file_name_never_leaves_export_dir() {
        assert_eq!(
            export_file_name("Pump A/B", ExportKind::Csv),
            "pump_a_b_lifecycle_cost.csv"
        );
        assert_eq!(
            export_file_name("../escape", ExportKind::Csv),
            "_escape_lifecycle_cost.csv"
        );
        assert_eq!(
            export_file_name(r"C:\temp\fan", ExportKind::Pdf),
            "c__temp_fan_lifecycle_cost.pdf"
        );
    }

    #[test]
    fn amount_grouping() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(135988.57991581954), "135,988.58");
        assert_eq!(format_amount(-20000.0), "-20,000.00");
        assert_eq!(format_amount(1234567.0), "1,234,567.00");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn currency_prefix() {
        assert_eq!(format_currency("Rs.", 2000.0), "Rs. 2,000.00");
        assert_eq!(format_currency("", 2000.0), "2,000.00");
    }
}
