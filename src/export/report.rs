//! LCC 보고서 레이아웃: 제목, 요약, 2열 내역 표. 페이지를 넘기면 표 머리글을 반복한다.

use std::ops::Range;

use super::format_currency;
use super::pdf::{approx_text_width, mm, Font, PageCanvas, PdfDocument, PAGE_HEIGHT, PAGE_WIDTH};
use crate::lifecycle::{CostBreakdown, EquipmentParameters};

const MARGIN: f64 = 10.0; // mm
const LINE_HEIGHT: f64 = 10.0; // mm
const COMPONENT_WIDTH: f64 = 100.0; // mm
const AMOUNT_WIDTH: f64 = 60.0; // mm
const SUMMARY_GAP: f64 = 5.0; // mm
const FONT_SIZE: f64 = 12.0;

pub const REPORT_TITLE: &str = "Lifecycle Cost Report";

/// 표 한 줄 (이미 서식이 적용된 문자열).
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub component: String,
    pub amount: String,
}

/// 한 페이지에 들어가는 내용.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPage {
    /// 첫 페이지만 제목/요약을 가진다.
    pub with_summary: bool,
    /// `rows` 에서의 범위
    pub rows: Range<usize>,
}

/// 설비 한 대의 보고서.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleReport {
    pub title: String,
    pub summary: Vec<String>,
    pub column_headers: [String; 2],
    pub rows: Vec<ReportRow>,
}

impl LifecycleReport {
    pub fn new(params: &EquipmentParameters, breakdown: &CostBreakdown, currency: &str) -> Self {
        let amount_header = if currency.is_empty() {
            "Amount".to_string()
        } else {
            format!("Amount ({currency})")
        };
        Self {
            title: REPORT_TITLE.to_string(),
            summary: vec![
                format!("Equipment: {}", params.name),
                format!("Discount Rate: {}%", params.discount_rate_percent),
                format!(
                    "NPV Total Cost: {}",
                    format_currency(currency, breakdown.total())
                ),
            ],
            column_headers: ["Component".to_string(), amount_header],
            rows: breakdown
                .lines()
                .iter()
                .map(|l| ReportRow {
                    component: l.label().to_string(),
                    amount: format_currency(currency, l.amount),
                })
                .collect(),
        }
    }

    fn usable_height() -> f64 {
        PAGE_HEIGHT - 2.0 * mm(MARGIN)
    }

    fn summary_height(&self) -> f64 {
        // 제목 + 요약 줄 + 간격
        (1 + self.summary.len()) as f64 * mm(LINE_HEIGHT) + mm(SUMMARY_GAP)
    }

    /// 표 머리글 한 줄을 뺀 나머지에 들어가는 행 수. 최소 1행.
    fn rows_fitting(height: f64) -> usize {
        let n = ((height - mm(LINE_HEIGHT)) / mm(LINE_HEIGHT)).floor();
        if n >= 1.0 {
            n as usize
        } else {
            1
        }
    }

    /// 행을 페이지로 나눈다. 행이 없어도 첫 페이지는 만든다.
    pub fn pages(&self) -> Vec<ReportPage> {
        let first_cap = Self::rows_fitting(Self::usable_height() - self.summary_height());
        let next_cap = Self::rows_fitting(Self::usable_height());
        let mut pages = Vec::new();
        let first_end = first_cap.min(self.rows.len());
        pages.push(ReportPage {
            with_summary: true,
            rows: 0..first_end,
        });
        let mut start = first_end;
        while start < self.rows.len() {
            let end = (start + next_cap).min(self.rows.len());
            pages.push(ReportPage {
                with_summary: false,
                rows: start..end,
            });
            start = end;
        }
        pages
    }

    /// 모든 페이지에 그려지는 표 본문 행 수의 합.
    pub fn table_row_count(&self) -> usize {
        self.pages().iter().map(|p| p.rows.len()).sum()
    }

    fn draw_page(&self, page: &ReportPage) -> PageCanvas {
        let mut canvas = PageCanvas::new();
        let left = mm(MARGIN);
        let line = mm(LINE_HEIGHT);
        let mut top = PAGE_HEIGHT - mm(MARGIN);
        let baseline = |top: f64| top - line * 0.5 - FONT_SIZE * 0.35;

        if page.with_summary {
            let width = approx_text_width(&self.title, FONT_SIZE);
            let x = ((PAGE_WIDTH - width) / 2.0).max(left);
            canvas.text(Font::Helvetica, FONT_SIZE, x, baseline(top), &self.title);
            top -= line;
            for s in &self.summary {
                canvas.text(Font::Helvetica, FONT_SIZE, left, baseline(top), s);
                top -= line;
            }
            top -= mm(SUMMARY_GAP);
        }

        let amount_x = left + mm(COMPONENT_WIDTH);
        let row = |canvas: &mut PageCanvas, top: f64, font: Font, a: &str, b: &str| {
            canvas.stroke_rect(left, top - line, mm(COMPONENT_WIDTH), line);
            canvas.stroke_rect(amount_x, top - line, mm(AMOUNT_WIDTH), line);
            canvas.text(font, FONT_SIZE, left + 2.0, baseline(top), a);
            canvas.text(font, FONT_SIZE, amount_x + 2.0, baseline(top), b);
        };
        row(
            &mut canvas,
            top,
            Font::HelveticaBold,
            &self.column_headers[0],
            &self.column_headers[1],
        );
        top -= line;
        for r in &self.rows[page.rows.clone()] {
            row(&mut canvas, top, Font::Helvetica, &r.component, &r.amount);
            top -= line;
        }
        canvas
    }

    /// 페이지 단위로 그린 PDF 문서.
    pub fn to_document(&self) -> PdfDocument {
        let mut doc = PdfDocument::new();
        for page in self.pages() {
            doc.add_page(self.draw_page(&page));
        }
        doc
    }

    pub fn to_pdf(&self) -> Vec<u8> {
        self.to_document().to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::compute_lifecycle_cost;

    fn params() -> EquipmentParameters {
        EquipmentParameters {
            name: "Diesel Generator".into(),
            initial_cost: 100_000.0,
            maintenance_cost_per_cycle: 2_000.0,
            maintenance_interval_months: 6.0,
            replacement_cost: 20_000.0,
            replacement_interval_years: 5.0,
            reuse_rate_percent: 20.0,
            operating_life_years: 10.0,
            downtime_cost_per_year: 0.0,
            discount_rate_percent: 6.0,
        }
    }

    #[test]
    fn summary_lines_and_headers() {
        let p = params();
        let report = LifecycleReport::new(&p, &compute_lifecycle_cost(&p), "Rs.");
        assert_eq!(report.summary[0], "Equipment: Diesel Generator");
        assert_eq!(report.summary[1], "Discount Rate: 6%");
        assert_eq!(report.summary[2], "NPV Total Cost: Rs. 135,988.58");
        assert_eq!(report.column_headers[1], "Amount (Rs.)");
        assert_eq!(report.rows[4].amount, "Rs. -20,000.00");
    }

    #[test]
    fn single_page_holds_whole_breakdown() {
        let p = params();
        let breakdown = compute_lifecycle_cost(&p);
        let report = LifecycleReport::new(&p, &breakdown, "Rs.");
        let pages = report.pages();
        assert_eq!(pages.len(), 1);
        assert_eq!(report.table_row_count(), breakdown.lines().len());
    }

    #[test]
    fn long_tables_continue_on_new_pages() {
        let p = params();
        let mut report = LifecycleReport::new(&p, &compute_lifecycle_cost(&p), "Rs.");
        report.rows = (0..100)
            .map(|i| ReportRow {
                component: format!("Item {i}"),
                amount: "1.00".into(),
            })
            .collect();
        let pages = report.pages();
        assert!(pages.len() > 1);
        assert!(pages[0].with_summary);
        assert!(pages.iter().skip(1).all(|p| !p.with_summary));
        assert_eq!(report.table_row_count(), 100);
        // 연속된 범위
        for w in pages.windows(2) {
            assert_eq!(w[0].rows.end, w[1].rows.start);
        }
        assert_eq!(report.to_document().page_count(), pages.len());
    }

    #[test]
    fn pdf_contains_escaped_labels() {
        let p = params();
        let bytes = LifecycleReport::new(&p, &compute_lifecycle_cost(&p), "Rs.").to_pdf();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Maintenance \\(NPV\\)) Tj"));
        assert!(text.contains("(Lifecycle Cost Report) Tj"));
    }
}
