use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::batch::{self, BatchError, BatchReport};
use crate::config::{Config, ConfigError};
use crate::export::{self, ExportError};
use crate::i18n::{self, Translator};
use crate::lifecycle::{compute_lifecycle_cost, CostBreakdown, EquipmentParameters, ValidationError};
use crate::ui_cli;
use crate::ui_cli::MenuChoice;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("입력값 오류: {0}")]
    Validation(#[from] ValidationError),
    #[error("비교 표 오류: {0}")]
    Batch(#[from] BatchError),
    #[error("내보내기 오류: {0}")]
    Export(#[from] ExportError),
}

/// 수동 입력 한 건의 평가 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub params: EquipmentParameters,
    pub breakdown: CostBreakdown,
}

/// 입력을 검증한 뒤 LCC 를 계산한다.
pub fn evaluate(params: EquipmentParameters) -> Result<Evaluation, AppError> {
    params.validate()?;
    let breakdown = compute_lifecycle_cost(&params);
    info!(equipment = %params.name, total = breakdown.total(), "equipment evaluated");
    Ok(Evaluation { params, breakdown })
}

/// 평가 결과를 지정 경로들로 내보낸다. 지정하지 않은 형식은 건너뛴다.
pub fn export_evaluation(
    eval: &Evaluation,
    csv_path: Option<&Path>,
    pdf_path: Option<&Path>,
    currency_symbol: &str,
) -> Result<Vec<PathBuf>, AppError> {
    let mut written = Vec::new();
    if let Some(path) = csv_path {
        export::save_breakdown_csv(path, &eval.breakdown)?;
        written.push(path.to_path_buf());
    }
    if let Some(path) = pdf_path {
        export::save_report_pdf(path, &eval.params, &eval.breakdown, currency_symbol)?;
        written.push(path.to_path_buf());
    }
    Ok(written)
}

/// 비교 CSV 파일을 평가한다.
pub fn compare_file(path: &Path, config: &Config) -> Result<BatchReport, AppError> {
    Ok(batch::compare_csv_file(path, config.strict_columns)?)
}

/// 현재 설정으로 번역기를 만든다.
pub fn translator_for(config: &Config, cli_lang: Option<&str>) -> Translator {
    let resolved = i18n::resolve_language(cli_lang.unwrap_or("auto"), Some(&config.language));
    Translator::new_with_pack(&resolved, config.language_pack_dir.as_deref())
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(config: &mut Config, tr: &mut Translator) -> Result<(), AppError> {
    loop {
        match ui_cli::main_menu(tr)? {
            MenuChoice::ManualCalculation => ui_cli::handle_manual(tr, config)?,
            MenuChoice::Compare => ui_cli::handle_compare(tr, config)?,
            MenuChoice::Settings => {
                if ui_cli::handle_settings(tr, config)? {
                    *tr = translator_for(config, None);
                }
                config.save()?;
                println!("{}", tr.t(i18n::keys::SETTINGS_SAVED));
            }
            MenuChoice::Exit => {
                config.save()?;
                println!("{}", tr.t(i18n::keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_rejects_invalid_before_computing() {
        let mut params = Config::default().defaults.to_parameters();
        params.replacement_interval_years = 0.0;
        assert!(matches!(evaluate(params), Err(AppError::Validation(_))));
    }

    #[test]
    fn export_writes_only_requested_formats() {
        let dir = tempfile::tempdir().unwrap();
        let eval = evaluate(Config::default().defaults.to_parameters()).unwrap();
        let csv = dir.path().join("out.csv");
        let written = export_evaluation(&eval, Some(&csv), None, "Rs.").unwrap();
        assert_eq!(written, vec![csv.clone()]);
        assert!(csv.exists());
        assert!(!dir.path().join("out.pdf").exists());
    }
}
