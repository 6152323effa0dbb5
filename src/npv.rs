//! 반복 비용의 현재가치(NPV) 할인 계산.

/// 연 할인율(%)을 소수 비율로 바꾼다.
pub fn rate_from_percent(rate_percent: f64) -> f64 {
    rate_percent / 100.0
}

/// `interval_years` 간격으로 `occurrence_count`회 발생하는 비용의 현재가치를 계산한다.
///
/// `Σ_{i=1..n} cost / (1 + r)^(interval_years * i)`
///
/// - 발생 횟수가 0이면 0을 반환한다.
/// - 할인율이 0이면 `cost * n`과 같다.
/// - 발생 횟수는 호출 측에서 내림(floor)으로 정수화해 넘긴다.
///
/// 합산은 i=1부터 왼쪽에서 오른쪽으로 누적한다. 할인율이 -100% 이하인 값은
/// 호출 측 입력 검증에서 막아야 한다.
pub fn present_value_of_recurring_cost(
    cost_per_occurrence: f64,
    occurrence_count: u32,
    interval_years: f64,
    annual_rate_percent: f64,
) -> f64 {
    let growth = 1.0 + rate_from_percent(annual_rate_percent);
    let mut pv = 0.0;
    for i in 1..=occurrence_count {
        let df = growth.powf(interval_years * f64::from(i));
        pv += cost_per_occurrence / df;
    }
    pv
}

/// 기간 / 간격을 내림해서 발생 횟수를 구한다. 음수나 NaN은 0회로 본다.
pub fn occurrences_within(span: f64, interval: f64) -> u32 {
    let n = (span / interval).floor();
    if n.is_finite() && n > 0.0 {
        n.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
