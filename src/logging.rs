//! tracing 기반 로그 초기화.

use tracing_subscriber::{fmt, EnvFilter};

/// 로그 시스템을 초기화한다.
///
/// `RUST_LOG` 로 수준을 바꿀 수 있다 (기본 `info`, 예: `RUST_LOG=lifecycle_cost_estimator=debug`).
/// 로그는 stderr 로 보내 CLI 출력과 섞이지 않게 한다.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 테스트용: debug 수준, 테스트 출력 캡처 사용.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
