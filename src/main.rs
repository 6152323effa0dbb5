use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use lifecycle_cost_estimator::app::{self, AppError};
use lifecycle_cost_estimator::config::{self, Config};
use lifecycle_cost_estimator::export::{export_file_name, ExportKind};
use lifecycle_cost_estimator::i18n::keys;
use lifecycle_cost_estimator::lifecycle::EquipmentParameters;
use lifecycle_cost_estimator::{logging, ui_cli};

/// 설비 수명주기 비용(NPV) 계산기 CLI.
#[derive(Debug, Parser)]
#[command(name = "lifecycle_cost_cli", version, about)]
struct Cli {
    /// 언어 (auto / ko-kr / en-us)
    #[arg(long, short = 'L', global = true)]
    lang: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 설비 한 대의 LCC 를 계산하고 선택적으로 CSV/PDF 로 내보낸다.
    Calc(CalcArgs),
    /// CSV 표의 설비들을 비교한다.
    Compare {
        /// 입력 CSV 경로
        file: PathBuf,
        /// 비교 결과를 저장할 CSV 경로
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// 대화형 메뉴 (기본값)
    Interactive,
}

#[derive(Debug, Args)]
struct CalcArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    initial_cost: Option<f64>,
    #[arg(long)]
    maintenance_cost: Option<f64>,
    /// 유지보수 주기 [개월]
    #[arg(long)]
    maintenance_interval: Option<f64>,
    #[arg(long)]
    replacement_cost: Option<f64>,
    /// 교체 주기 [년]
    #[arg(long)]
    replacement_interval: Option<f64>,
    /// 재사용률 [%]
    #[arg(long)]
    reuse_rate: Option<f64>,
    /// 운전 수명 [년]
    #[arg(long)]
    operating_life: Option<f64>,
    #[arg(long)]
    downtime_cost: Option<f64>,
    /// 할인율 [%/년]
    #[arg(long)]
    discount_rate: Option<f64>,
    /// 내역 CSV 저장 경로
    #[arg(long)]
    csv: Option<PathBuf>,
    /// PDF 보고서 저장 경로
    #[arg(long)]
    pdf: Option<PathBuf>,
    /// 이 디렉터리에 기본 파일명으로 CSV/PDF 를 모두 저장 (--csv/--pdf 와 함께 쓸 수 없음)
    #[arg(long, conflicts_with_all = ["csv", "pdf"])]
    export_dir: Option<PathBuf>,
}

impl CalcArgs {
    /// 지정하지 않은 값은 설정 파일의 폼 기본값을 쓴다.
    fn to_parameters(&self, cfg: &Config) -> EquipmentParameters {
        let d = &cfg.defaults;
        EquipmentParameters {
            name: self.name.clone().unwrap_or_else(|| d.equipment_name.clone()),
            initial_cost: self.initial_cost.unwrap_or(d.initial_cost),
            maintenance_cost_per_cycle: self.maintenance_cost.unwrap_or(d.maintenance_cost_per_cycle),
            maintenance_interval_months: self
                .maintenance_interval
                .unwrap_or(d.maintenance_interval_months),
            replacement_cost: self.replacement_cost.unwrap_or(d.replacement_cost),
            replacement_interval_years: self
                .replacement_interval
                .unwrap_or(d.replacement_interval_years),
            reuse_rate_percent: self.reuse_rate.unwrap_or(d.reuse_rate_percent),
            operating_life_years: self.operating_life.unwrap_or(d.operating_life_years),
            downtime_cost_per_year: self.downtime_cost.unwrap_or(d.downtime_cost_per_year),
            discount_rate_percent: self.discount_rate.unwrap_or(d.discount_rate_percent),
        }
    }
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();
    let mut cfg = match config::load_or_default() {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::warn!("config unavailable, using defaults: {err}");
            Config::default()
        }
    };
    let mut tr = app::translator_for(&cfg, cli.lang.as_deref());
    match try_run(cli, &mut cfg, &mut tr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
            ExitCode::FAILURE
        }
    }
}

fn try_run(
    cli: Cli,
    cfg: &mut Config,
    tr: &mut lifecycle_cost_estimator::i18n::Translator,
) -> Result<(), AppError> {
    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => app::run(cfg, tr),
        Command::Calc(args) => {
            let eval = app::evaluate(args.to_parameters(cfg))?;
            ui_cli::print_evaluation(tr, &eval, &cfg.currency_symbol);
            let (csv, pdf) = match &args.export_dir {
                Some(dir) => {
                    std::fs::create_dir_all(dir)?;
                    (
                        Some(dir.join(export_file_name(&eval.params.name, ExportKind::Csv))),
                        Some(dir.join(export_file_name(&eval.params.name, ExportKind::Pdf))),
                    )
                }
                None => (args.csv.clone(), args.pdf.clone()),
            };
            let written =
                app::export_evaluation(&eval, csv.as_deref(), pdf.as_deref(), &cfg.currency_symbol)?;
            for path in written {
                println!("{} {}", tr.t(keys::EXPORT_SAVED), path.display());
            }
            Ok(())
        }
        Command::Compare { file, output } => {
            let report = app::compare_file(&file, cfg)?;
            ui_cli::print_comparison(tr, &report, &cfg.currency_symbol);
            if let Some(out) = output {
                ui_cli::save_comparison(&out, &report.comparison)?;
                println!("{} {}", tr.t(keys::EXPORT_SAVED), out.display());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_dir_conflicts_with_explicit_paths() {
        for flag in ["--csv", "--pdf"] {
            let err = Cli::try_parse_from([
                "lifecycle_cost_cli",
                "calc",
                "--export-dir",
                "out",
                flag,
                "report.file",
            ])
            .unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        }
    }

    #[test]
    fn export_dir_alone_is_accepted() {
        let cli = Cli::try_parse_from(["lifecycle_cost_cli", "calc", "--export-dir", "out"]).unwrap();
        let Some(Command::Calc(args)) = cli.command else {
            panic!("expected calc subcommand");
        };
        assert_eq!(args.export_dir, Some(PathBuf::from("out")));
        assert!(args.csv.is_none() && args.pdf.is_none());
    }
}
