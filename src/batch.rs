//! 여러 설비를 표(CSV)로 받아 LCC를 일괄 비교한다.
//!
//! 행 단위로 실패를 모으며, 한 행의 오류가 배치 전체를 중단시키지 않는다.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::lifecycle::{compute_lifecycle_cost, EquipmentParameters, ValidationError};

/// 입력 표의 열 이름.
pub mod columns {
    pub const EQUIPMENT: &str = "Equipment";
    pub const INITIAL_COST: &str = "Initial Cost";
    pub const MAINTENANCE_COST: &str = "Maintenance Cost";
    pub const MAINTENANCE_INTERVAL: &str = "Maintenance Interval";
    pub const REPLACEMENT_COST: &str = "Replacement Cost";
    pub const REPLACEMENT_INTERVAL: &str = "Replacement Interval";
    pub const REUSE_RATE: &str = "Reuse Rate";
    pub const OPERATING_LIFE: &str = "Operating Life";
    pub const DOWNTIME_COST: &str = "Downtime Cost";
    pub const DISCOUNT_RATE: &str = "Discount Rate";

    pub const REQUIRED: [&str; 10] = [
        EQUIPMENT,
        INITIAL_COST,
        MAINTENANCE_COST,
        MAINTENANCE_INTERVAL,
        REPLACEMENT_COST,
        REPLACEMENT_INTERVAL,
        REUSE_RATE,
        OPERATING_LIFE,
        DOWNTIME_COST,
        DISCOUNT_RATE,
    ];
}

/// 비교 결과 CSV 의 금액 열 이름.
pub const TOTAL_COLUMN: &str = "NPV Lifecycle Cost";

/// 표 전체를 읽지 못한 경우의 오류.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV 파싱 오류: {0}")]
    Csv(#[from] csv::Error),
    #[error("표에 데이터 행이 없습니다")]
    Empty,
}

/// 행 하나가 실패한 원인.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowIssue {
    #[error("필수 열 누락: {0}")]
    MissingColumn(String),
    #[error("정의되지 않은 열: {0}")]
    UnexpectedColumn(String),
    #[error("중복된 열: {0}")]
    DuplicateColumn(String),
    #[error("'{column}' 값이 UTF-8 이 아닙니다")]
    Encoding { column: String },
    #[error("CSV 행을 읽을 수 없습니다: {0}")]
    Malformed(String),
    #[error("열 개수 불일치: 기대 {expected}, 실제 {actual}")]
    FieldCount { expected: usize, actual: usize },
    #[error("'{column}' 값 '{value}' 을(를) 숫자로 읽을 수 없습니다")]
    NotANumber { column: String, value: String },
    #[error("'{0}' 값이 비어 있습니다")]
    EmptyValue(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// 위치/이름으로 추적 가능한 행 오류.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{row}행 ({name}): {issue}", name = .equipment.as_deref().unwrap_or("?"))]
pub struct RowError {
    /// 1부터 시작하는 데이터 행 번호 (헤더 제외)
    pub row: usize,
    pub equipment: Option<String>,
    pub issue: RowIssue,
}

/// 헤더를 기준으로 읽은 원시 행.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 1부터 시작하는 데이터 행 번호
    pub row: usize,
    pub fields: HashMap<String, String>,
    pub field_count: usize,
    /// 읽기 단계에서 이미 실패한 행
    pub issue: Option<RowIssue>,
}

/// 원시 표: 헤더와 행 목록.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// CSV 스트림을 헤더 기반 원시 표로 읽는다. 완전히 빈 행은 건너뛴다.
///
/// 인코딩이 깨졌거나 파싱할 수 없는 레코드는 `issue` 가 채워진 행으로 남긴다.
/// 입출력 오류만 표 전체를 실패시킨다.
pub fn read_raw_table<R: Read>(reader: R) -> Result<RawTable, BatchError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.byte_records() {
        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                rows.push(RawRow {
                    row: rows.len() + 1,
                    issue: Some(RowIssue::Malformed(err.to_string())),
                    ..RawRow::default()
                });
                continue;
            }
        };
        if record.iter().all(|v| v.is_empty()) {
            continue;
        }
        let mut fields = HashMap::new();
        let mut issue = None;
        for (idx, bytes) in record.iter().enumerate() {
            let Some(h) = headers.get(idx) else {
                continue;
            };
            let value = match String::from_utf8(bytes.to_vec()) {
                Ok(v) => v,
                Err(_) => {
                    issue.get_or_insert(RowIssue::Encoding { column: h.clone() });
                    // 오류 메시지에서 설비를 알아볼 수 있게 손실 변환 값을 남긴다
                    String::from_utf8_lossy(bytes).into_owned()
                }
            };
            fields.insert(h.clone(), value);
        }
        rows.push(RawRow {
            row: rows.len() + 1,
            fields,
            field_count: record.len(),
            issue,
        });
    }
    Ok(RawTable { headers, rows })
}

/// 원시 행 하나를 [`EquipmentParameters`] 로 바꾸고 범위를 검증한다.
///
/// `strict_columns` 가 켜져 있으면 정의되지 않은 열도 행 오류로 본다.
pub fn parse_row(
    headers: &[String],
    raw: &RawRow,
    strict_columns: bool,
) -> Result<EquipmentParameters, RowError> {
    let equipment = raw
        .fields
        .get(columns::EQUIPMENT)
        .filter(|s| !s.is_empty())
        .cloned();
    let fail = |issue: RowIssue| RowError {
        row: raw.row,
        equipment: equipment.clone(),
        issue,
    };

    if let Some(issue) = &raw.issue {
        return Err(fail(issue.clone()));
    }
    for required in columns::REQUIRED {
        if !headers.iter().any(|h| h == required) {
            return Err(fail(RowIssue::MissingColumn(required.to_string())));
        }
    }
    if let Some(dup) = headers
        .iter()
        .enumerate()
        .find(|(i, h)| headers[..*i].contains(*h))
        .map(|(_, h)| h)
    {
        return Err(fail(RowIssue::DuplicateColumn(dup.clone())));
    }
    if strict_columns {
        if let Some(extra) = headers
            .iter()
            .find(|h| !columns::REQUIRED.contains(&h.as_str()))
        {
            return Err(fail(RowIssue::UnexpectedColumn(extra.clone())));
        }
    }
    if raw.field_count != headers.len() {
        return Err(fail(RowIssue::FieldCount {
            expected: headers.len(),
            actual: raw.field_count,
        }));
    }

    let name = equipment
        .clone()
        .ok_or_else(|| fail(RowIssue::EmptyValue(columns::EQUIPMENT.to_string())))?;
    let number = |column: &str| -> Result<f64, RowError> {
        let value = raw.fields.get(column).map(String::as_str).unwrap_or("");
        parse_number(column, value).map_err(&fail)
    };
    // Downtime Cost 는 선택 항목: 빈 칸이면 0
    let downtime = match raw.fields.get(columns::DOWNTIME_COST) {
        Some(v) if v.is_empty() => 0.0,
        _ => number(columns::DOWNTIME_COST)?,
    };

    let params = EquipmentParameters {
        name,
        initial_cost: number(columns::INITIAL_COST)?,
        maintenance_cost_per_cycle: number(columns::MAINTENANCE_COST)?,
        maintenance_interval_months: number(columns::MAINTENANCE_INTERVAL)?,
        replacement_cost: number(columns::REPLACEMENT_COST)?,
        replacement_interval_years: number(columns::REPLACEMENT_INTERVAL)?,
        reuse_rate_percent: number(columns::REUSE_RATE)?,
        operating_life_years: number(columns::OPERATING_LIFE)?,
        downtime_cost_per_year: downtime,
        discount_rate_percent: number(columns::DISCOUNT_RATE)?,
    };
    params.validate().map_err(|e| fail(RowIssue::Invalid(e)))?;
    Ok(params)
}

/// 숫자 파서. 쉼표는 올바른 천 단위 구분(`1,200,000.5`)일 때만 허용한다.
///
/// `2,5` 같은 소수 쉼표는 다른 값으로 바뀌지 않도록 거부한다.
fn parse_number(column: &str, value: &str) -> Result<f64, RowIssue> {
    if value.is_empty() {
        return Err(RowIssue::EmptyValue(column.to_string()));
    }
    parse_grouped_number(value).ok_or_else(|| RowIssue::NotANumber {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// 천 단위 쉼표를 허용하는 숫자 읽기. 대화형 입력도 같은 규칙을 쓴다.
pub(crate) fn parse_grouped_number(value: &str) -> Option<f64> {
    if value.contains(',') {
        if !is_grouped_thousands(value) {
            return None;
        }
        value.replace(',', "").parse().ok()
    } else {
        value.parse().ok()
    }
}

fn is_grouped_thousands(value: &str) -> bool {
    let unsigned = value.strip_prefix(['-', '+']).unwrap_or(value);
    let (int_part, frac) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if frac.is_some_and(|f| !all_digits(f)) {
        return false;
    }
    let mut groups = int_part.split(',');
    let first_ok = groups
        .next()
        .is_some_and(|g| all_digits(g) && g.len() <= 3);
    first_ok && groups.all(|g| all_digits(g) && g.len() == 3)
}

/// 비교 결과 한 줄.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonEntry {
    pub equipment: String,
    pub total_cost: f64,
}

/// 설비별 LCC 합계. 입력 순서를 그대로 유지한다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonResult {
    entries: Vec<ComparisonEntry>,
}

impl ComparisonResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, equipment: impl Into<String>, total_cost: f64) {
        self.entries.push(ComparisonEntry {
            equipment: equipment.into(),
            total_cost,
        });
    }

    /// 입력 순서대로의 항목.
    pub fn entries(&self) -> &[ComparisonEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 이름으로 합계를 찾는다. 같은 이름이 여러 번이면 첫 항목.
    pub fn total_for(&self, equipment: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.equipment == equipment)
            .map(|e| e.total_cost)
    }

    /// 차트용: 합계 내림차순. 같은 값은 입력 순서를 유지한다.
    pub fn ranked(&self) -> Vec<&ComparisonEntry> {
        let mut out: Vec<&ComparisonEntry> = self.entries.iter().collect();
        out.sort_by(|a, b| b.total_cost.total_cmp(&a.total_cost));
        out
    }

    /// 가장 큰 합계 (차트 축 스케일용).
    pub fn max_total(&self) -> Option<f64> {
        self.entries.iter().map(|e| e.total_cost).reduce(f64::max)
    }
}

/// 일괄 비교 결과와 실패한 행 목록.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub comparison: ComparisonResult,
    pub failures: Vec<RowError>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// 이미 검증된 입력 목록에 LCC 를 적용한다.
pub fn compare_equipment(items: &[EquipmentParameters]) -> ComparisonResult {
    let mut result = ComparisonResult::new();
    for item in items {
        let breakdown = compute_lifecycle_cost(item);
        result.push(item.name.clone(), breakdown.total());
    }
    result
}

/// 원시 표의 모든 행을 평가한다. 실패한 행은 `failures` 로 모은다.
pub fn evaluate_table(table: &RawTable, strict_columns: bool) -> BatchReport {
    let mut report = BatchReport::default();
    for raw in &table.rows {
        match parse_row(&table.headers, raw, strict_columns) {
            Ok(params) => {
                let total = compute_lifecycle_cost(&params).total();
                debug!(row = raw.row, equipment = %params.name, total, "row evaluated");
                report.comparison.push(params.name, total);
            }
            Err(err) => {
                warn!(row = err.row, "row rejected: {err}");
                report.failures.push(err);
            }
        }
    }
    info!(
        evaluated = report.comparison.len(),
        failed = report.failures.len(),
        "batch comparison finished"
    );
    report
}

/// CSV 스트림을 읽어 일괄 비교한다.
pub fn compare_csv<R: Read>(reader: R, strict_columns: bool) -> Result<BatchReport, BatchError> {
    let table = read_raw_table(reader)?;
    if table.rows.is_empty() {
        return Err(BatchError::Empty);
    }
    Ok(evaluate_table(&table, strict_columns))
}

/// CSV 파일을 읽어 일괄 비교한다.
pub fn compare_csv_file<P: AsRef<Path>>(
    path: P,
    strict_columns: bool,
) -> Result<BatchReport, BatchError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading equipment table");
    let file = File::open(path)?;
    compare_csv(file, strict_columns)
}

/// 비교 결과를 (Equipment, NPV Lifecycle Cost) 두 열 CSV 로 쓴다.
pub fn write_comparison_csv<W: Write>(
    writer: W,
    comparison: &ComparisonResult,
) -> Result<(), BatchError> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record([columns::EQUIPMENT, TOTAL_COLUMN])?;
    for entry in comparison.entries() {
        wtr.write_record([entry.equipment.clone(), entry.total_cost.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Equipment,Initial Cost,Maintenance Cost,Maintenance Interval,Replacement Cost,Replacement Interval,Reuse Rate,Operating Life,Downtime Cost,Discount Rate";

    #[test]
    fn empty_downtime_cell_defaults_to_zero() {
        crate::logging::init_test();
        let src = format!("{HEADER}\nPump,5000,100,12,1000,4,10,8,,5\n");
        let report = compare_csv(src.as_bytes(), true).unwrap();
        assert!(!report.has_failures());
        assert_eq!(report.comparison.len(), 1);
    }

    #[test]
    fn thousands_separator_is_accepted() {
        assert_eq!(parse_number("Initial Cost", "1,200,000").unwrap(), 1_200_000.0);
        assert_eq!(parse_number("Initial Cost", "12,345.5").unwrap(), 12_345.5);
        for bad in ["2,5", "1,20,000", ",100", "1,000,", "1_000"] {
            assert!(
                matches!(
                    parse_number("Reuse Rate", bad),
                    Err(RowIssue::NotANumber { .. })
                ),
                "{bad}"
            );
        }
        assert!(matches!(
            parse_number("Initial Cost", "abc"),
            Err(RowIssue::NotANumber { .. })
        ));
    }

    #[test]
    fn short_row_reports_field_count() {
        let src = format!("{HEADER}\nPump,5000,100\n");
        let report = compare_csv(src.as_bytes(), true).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, 1);
        assert_eq!(report.failures[0].equipment.as_deref(), Some("Pump"));
        assert!(matches!(
            report.failures[0].issue,
            RowIssue::FieldCount {
                expected: 10,
                actual: 3
            }
        ));
    }

    #[test]
    fn extra_column_allowed_when_lenient() {
        let src = format!("{HEADER},Notes\nPump,5000,100,12,1000,4,10,8,0,5,spare\n");
        let strict = compare_csv(src.as_bytes(), true).unwrap();
        assert!(matches!(
            strict.failures[0].issue,
            RowIssue::UnexpectedColumn(ref c) if c == "Notes"
        ));
        let lenient = compare_csv(src.as_bytes(), false).unwrap();
        assert!(!lenient.has_failures());
    }

    #[test]
    fn decimal_comma_row_is_rejected() {
        let src = format!("{HEADER}\nPump,1000,10,6,100,5,\"2,5\",10,0,5\n");
        let report = compare_csv(src.as_bytes(), true).unwrap();
        assert!(report.comparison.is_empty());
        assert!(matches!(
            report.failures[0].issue,
            RowIssue::NotANumber { ref column, .. } if column == columns::REUSE_RATE
        ));
    }

    #[test]
    fn duplicate_header_fails_rows() {
        let src = format!("{HEADER},Equipment\nPump,5000,100,12,1000,4,10,8,0,5,Other\n");
        for strict in [true, false] {
            let report = compare_csv(src.as_bytes(), strict).unwrap();
            assert!(report.comparison.is_empty());
            assert!(matches!(
                report.failures[0].issue,
                RowIssue::DuplicateColumn(ref c) if c == columns::EQUIPMENT
            ));
        }
    }

    #[test]
    fn ranked_sorts_descending_with_stable_ties() {
        let mut c = ComparisonResult::new();
        c.push("a", 10.0);
        c.push("b", 30.0);
        c.push("c", 10.0);
        let names: Vec<_> = c.ranked().iter().map(|e| e.equipment.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(c.max_total(), Some(30.0));
    }

    #[test]
    fn row_error_message_names_row_and_equipment() {
        let err = RowError {
            row: 3,
            equipment: Some("Boiler".into()),
            issue: RowIssue::EmptyValue("Reuse Rate".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("3") && msg.contains("Boiler") && msg.contains("Reuse Rate"));
    }
}
