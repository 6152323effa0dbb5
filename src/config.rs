use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::lifecycle::EquipmentParameters;

/// 기본 설정 파일 경로.
pub const CONFIG_FILE: &str = "config.toml";

/// 수동 입력 폼의 기본값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub equipment_name: String,
    pub initial_cost: f64,
    pub maintenance_cost_per_cycle: f64,
    pub maintenance_interval_months: f64,
    pub replacement_cost: f64,
    pub replacement_interval_years: f64,
    pub reuse_rate_percent: f64,
    pub operating_life_years: f64,
    pub downtime_cost_per_year: f64,
    pub discount_rate_percent: f64,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            equipment_name: "Diesel Generator".to_string(),
            initial_cost: 0.0,
            maintenance_cost_per_cycle: 0.0,
            maintenance_interval_months: 6.0,
            replacement_cost: 0.0,
            replacement_interval_years: 5.0,
            reuse_rate_percent: 20.0,
            operating_life_years: 10.0,
            downtime_cost_per_year: 0.0,
            discount_rate_percent: 6.0,
        }
    }
}

impl FormDefaults {
    /// 폼 기본값으로 입력 구조체를 만든다.
    pub fn to_parameters(&self) -> EquipmentParameters {
        EquipmentParameters {
            name: self.equipment_name.clone(),
            initial_cost: self.initial_cost,
            maintenance_cost_per_cycle: self.maintenance_cost_per_cycle,
            maintenance_interval_months: self.maintenance_interval_months,
            replacement_cost: self.replacement_cost,
            replacement_interval_years: self.replacement_interval_years,
            reuse_rate_percent: self.reuse_rate_percent,
            operating_life_years: self.operating_life_years,
            downtime_cost_per_year: self.downtime_cost_per_year,
            discount_rate_percent: self.discount_rate_percent,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드 (auto / en-us / ko-kr)
    pub language: String,
    /// 외부 언어팩 디렉터리
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_pack_dir: Option<String>,
    /// 금액 앞에 붙는 통화 표기
    pub currency_symbol: String,
    /// 내보내기 기본 디렉터리
    pub export_dir: String,
    /// GUI 창 투명도 (0.3~1.0)
    pub window_alpha: f32,
    /// true 이면 비교 표의 정의되지 않은 열을 행 오류로 처리
    pub strict_columns: bool,
    pub defaults: FormDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            language_pack_dir: None,
            currency_symbol: "Rs.".to_string(),
            export_dir: ".".to_string(),
            window_alpha: 1.0,
            strict_columns: true,
            defaults: FormDefaults::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_from(Path::new(CONFIG_FILE))
}

/// 지정 경로의 설정을 읽는다. 파일이 없으면 기본값을 저장하고 돌려준다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        tracing::info!(path = %path.display(), "default config created");
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Path::new(CONFIG_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
