//! 설비 수명주기 비용(LCC) 집계.
//!
//! 유지보수/교체/정지손실을 각각 현재가치로 할인하고 재사용(잔존) 가치를 차감한다.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::npv::{occurrences_within, present_value_of_recurring_cost};

/// 설비 한 대에 대한 LCC 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentParameters {
    /// 설비 이름
    pub name: String,
    /// 초기 투자비
    pub initial_cost: f64,
    /// 1회당 유지보수비
    pub maintenance_cost_per_cycle: f64,
    /// 유지보수 주기 [개월]
    pub maintenance_interval_months: f64,
    /// 1회당 교체비
    pub replacement_cost: f64,
    /// 교체 주기 [년]
    pub replacement_interval_years: f64,
    /// 재사용률(%) - 수명 종료 시 초기 투자비 대비 회수 비율
    pub reuse_rate_percent: f64,
    /// 운전 수명 [년]
    pub operating_life_years: f64,
    /// 연간 정지손실 비용 (선택, 기본 0)
    #[serde(default)]
    pub downtime_cost_per_year: f64,
    /// 연 할인율(%)
    pub discount_rate_percent: f64,
}

/// 입력 검증 실패 사유.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("설비 이름이 비어 있습니다")]
    EmptyName,
    #[error("{field}: 숫자가 아닙니다 ({value})")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field}: 값 {value} 이(가) 최소값 {min} 보다 작습니다")]
    BelowMinimum {
        field: &'static str,
        value: f64,
        min: f64,
    },
    #[error("{field}: 값 {value} 이(가) 범위 [{min}, {max}] 를 벗어났습니다")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// 주기/수명 입력의 최소값. 0 나눗셈을 입력 단계에서 막는다.
pub const MIN_INTERVAL: f64 = 1.0;

impl EquipmentParameters {
    /// 입력값 범위를 검사한다. 계산 함수는 검증된 입력을 가정한다.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        non_negative("initial_cost", self.initial_cost)?;
        non_negative("maintenance_cost_per_cycle", self.maintenance_cost_per_cycle)?;
        at_least(
            "maintenance_interval_months",
            self.maintenance_interval_months,
            MIN_INTERVAL,
        )?;
        non_negative("replacement_cost", self.replacement_cost)?;
        at_least(
            "replacement_interval_years",
            self.replacement_interval_years,
            MIN_INTERVAL,
        )?;
        within("reuse_rate_percent", self.reuse_rate_percent, 0.0, 100.0)?;
        at_least("operating_life_years", self.operating_life_years, MIN_INTERVAL)?;
        non_negative("downtime_cost_per_year", self.downtime_cost_per_year)?;
        within("discount_rate_percent", self.discount_rate_percent, 0.0, 100.0)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite { field, value })
    }
}

fn at_least(field: &'static str, value: f64, min: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value < min {
        return Err(ValidationError::BelowMinimum { field, value, min });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    at_least(field, value, 0.0)
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// 비용 항목.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostComponent {
    InitialCost,
    Maintenance,
    Replacement,
    Downtime,
    ReuseSavings,
}

impl CostComponent {
    /// 보고서/CSV 에 찍히는 항목 이름.
    pub fn label(&self) -> &'static str {
        match self {
            CostComponent::InitialCost => "Initial Cost",
            CostComponent::Maintenance => "Maintenance (NPV)",
            CostComponent::Replacement => "Replacement (NPV)",
            CostComponent::Downtime => "Downtime (NPV)",
            CostComponent::ReuseSavings => "Reuse Savings",
        }
    }

    pub const ALL: [CostComponent; 5] = [
        CostComponent::InitialCost,
        CostComponent::Maintenance,
        CostComponent::Replacement,
        CostComponent::Downtime,
        CostComponent::ReuseSavings,
    ];
}

/// 비용 내역 한 줄.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostLine {
    pub component: CostComponent,
    pub amount: f64,
}

impl CostLine {
    pub fn label(&self) -> &'static str {
        self.component.label()
    }
}

/// LCC 계산 결과. 항목 순서는 [`CostComponent::ALL`] 과 같다.
#[derive(Debug, Clone, PartialEq)]
pub struct CostBreakdown {
    lines: Vec<CostLine>,
    total: f64,
}

impl CostBreakdown {
    pub fn lines(&self) -> &[CostLine] {
        &self.lines
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn amount_of(&self, component: CostComponent) -> f64 {
        self.lines
            .iter()
            .find(|l| l.component == component)
            .map(|l| l.amount)
            .unwrap_or(0.0)
    }
}

/// 수명 동안의 발생 횟수.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceCounts {
    pub maintenance: u32,
    pub replacement: u32,
    /// 정지손실은 1년 간격, 운전 수명(내림) 만큼 발생한다.
    pub downtime_years: u32,
}

/// 유지보수/교체/정지손실 발생 횟수를 내림 나눗셈으로 구한다.
pub fn occurrence_counts(params: &EquipmentParameters) -> OccurrenceCounts {
    OccurrenceCounts {
        maintenance: occurrences_within(
            params.operating_life_years * 12.0,
            params.maintenance_interval_months,
        ),
        replacement: occurrences_within(
            params.operating_life_years,
            params.replacement_interval_years,
        ),
        downtime_years: occurrences_within(params.operating_life_years, 1.0),
    }
}

/// 재사용(잔존) 가치: 재사용률 × 초기 투자비.
pub fn reuse_credit(params: &EquipmentParameters) -> f64 {
    params.reuse_rate_percent / 100.0 * params.initial_cost
}

/// NPV 기준 수명주기 비용을 계산한다.
pub fn compute_lifecycle_cost(params: &EquipmentParameters) -> CostBreakdown {
    let counts = occurrence_counts(params);
    let rate = params.discount_rate_percent;
    let credit = reuse_credit(params);

    let maintenance_npv = present_value_of_recurring_cost(
        params.maintenance_cost_per_cycle,
        counts.maintenance,
        params.maintenance_interval_months / 12.0,
        rate,
    );
    let replacement_npv = present_value_of_recurring_cost(
        params.replacement_cost,
        counts.replacement,
        params.replacement_interval_years,
        rate,
    );
    let downtime_npv = if params.downtime_cost_per_year > 0.0 {
        present_value_of_recurring_cost(
            params.downtime_cost_per_year,
            counts.downtime_years,
            1.0,
            rate,
        )
    } else {
        0.0
    };

    let total = params.initial_cost + maintenance_npv + replacement_npv + downtime_npv - credit;
    debug!(
        equipment = %params.name,
        maintenance = counts.maintenance,
        replacement = counts.replacement,
        downtime_years = counts.downtime_years,
        total,
        "lifecycle cost computed"
    );

    CostBreakdown {
        lines: vec![
            CostLine {
                component: CostComponent::InitialCost,
                amount: params.initial_cost,
            },
            CostLine {
                component: CostComponent::Maintenance,
                amount: maintenance_npv,
            },
            CostLine {
                component: CostComponent::Replacement,
                amount: replacement_npv,
            },
            CostLine {
                component: CostComponent::Downtime,
                amount: downtime_npv,
            },
            CostLine {
                component: CostComponent::ReuseSavings,
                amount: -credit,
            },
        ],
        total,
    }
}
