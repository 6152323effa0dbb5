//! 핵심 계산 로직을 라이브러리로 분리하여 CLI 와 GUI 가 함께 사용한다.

pub mod app;
pub mod batch;
pub mod config;
pub mod export;
pub mod i18n;
pub mod lifecycle;
pub mod logging;
pub mod npv;
pub mod ui_cli;

pub use lifecycle::{compute_lifecycle_cost, CostBreakdown, EquipmentParameters};
pub use npv::present_value_of_recurring_cost;
