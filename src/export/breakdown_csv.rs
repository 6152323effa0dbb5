//! 비용 내역 CSV: `Cost Component,Amount` 두 열, 금액은 전체 정밀도로 기록.

use std::io::{Read, Write};

use csv::{ReaderBuilder, WriterBuilder};

use super::ExportError;
use crate::lifecycle::CostBreakdown;

pub const HEADER_COMPONENT: &str = "Cost Component";
pub const HEADER_AMOUNT: &str = "Amount";

/// 내역을 CSV 로 쓴다. f64 의 `Display` 는 왕복 가능한 최단 표현을 사용한다.
pub fn write_breakdown_csv<W: Write>(
    writer: W,
    breakdown: &CostBreakdown,
) -> Result<(), ExportError> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record([HEADER_COMPONENT, HEADER_AMOUNT])?;
    for line in breakdown.lines() {
        wtr.write_record([line.label().to_string(), line.amount.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// 내보낸 CSV 를 다시 (항목명, 금액) 쌍으로 읽는다.
pub fn read_breakdown_csv<R: Read>(reader: R) -> Result<Vec<(String, f64)>, ExportError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    if headers.get(0) != Some(HEADER_COMPONENT) || headers.get(1) != Some(HEADER_AMOUNT) {
        return Err(ExportError::Format {
            line: 1,
            message: format!("unexpected header: {headers:?}"),
        });
    }
    let mut pairs = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        let line = idx + 2;
        let label = record.get(0).unwrap_or_default().to_string();
        let raw = record.get(1).unwrap_or_default();
        let amount = raw.trim().parse::<f64>().map_err(|e| ExportError::Format {
            line,
            message: format!("amount '{raw}': {e}"),
        })?;
        pairs.push((label, amount));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{compute_lifecycle_cost, EquipmentParameters};

    #[test]
    fn header_row_comes_first() {
        let params = EquipmentParameters {
            name: "Chiller".into(),
            initial_cost: 50_000.0,
            maintenance_cost_per_cycle: 500.0,
            maintenance_interval_months: 3.0,
            replacement_cost: 0.0,
            replacement_interval_years: 20.0,
            reuse_rate_percent: 0.0,
            operating_life_years: 15.0,
            downtime_cost_per_year: 1_000.0,
            discount_rate_percent: 8.0,
        };
        let mut buf = Vec::new();
        write_breakdown_csv(&mut buf, &compute_lifecycle_cost(&params)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Cost Component,Amount"));
        assert!(lines.next().unwrap().starts_with("Initial Cost,50000"));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn rejects_foreign_header() {
        let err = read_breakdown_csv("a,b\nx,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ExportError::Format { line: 1, .. }));
    }

    #[test]
    fn reports_bad_amount_line() {
        let src = "Cost Component,Amount\nInitial Cost,100\nMaintenance (NPV),abc\n";
        let err = read_breakdown_csv(src.as_bytes()).unwrap_err();
        assert!(matches!(err, ExportError::Format { line: 3, .. }));
    }
}
