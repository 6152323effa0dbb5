//! 표준 Type1 글꼴(Helvetica)만 쓰는 최소 PDF 1.4 작성기.
//!
//! 보고서는 텍스트와 테두리 사각형뿐이라 페이지마다 콘텐츠 스트림 하나로 충분하다.

use std::fmt::Write as _;

/// A4 (pt)
pub const PAGE_WIDTH: f64 = 595.28;
pub const PAGE_HEIGHT: f64 = 841.89;

/// 1 mm = 2.8346 pt
pub fn mm(v: f64) -> f64 {
    v * 72.0 / 25.4
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    fn resource_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }
}

/// 한 페이지의 그리기 명령을 모은다. 좌표계는 PDF 기본(좌하단 원점)이다.
#[derive(Debug, Clone, Default)]
pub struct PageCanvas {
    ops: String,
}

impl PageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// (x, y) 기준선 위치에 한 줄 텍스트를 쓴다.
    pub fn text(&mut self, font: Font, size: f64, x: f64, y: f64, text: &str) {
        let _ = writeln!(
            self.ops,
            "BT /{} {size:.2} Tf {x:.2} {y:.2} Td ({}) Tj ET",
            font.resource_name(),
            escape_text(text)
        );
    }

    /// 테두리만 있는 사각형. (x, y)는 좌하단.
    pub fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let _ = writeln!(self.ops, "0.5 w {x:.2} {y:.2} {w:.2} {h:.2} re S");
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    fn into_stream(self) -> String {
        self.ops
    }
}

/// Helvetica 글자 폭 근사치 (가운데 정렬용).
pub fn approx_text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.5
}

/// 괄호/역슬래시를 이스케이프하고 Latin-1 밖의 문자는 `?`로 바꾼다.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            _ => out.push('?'),
        }
    }
    out
}

/// 페이지 목록을 PDF 바이트로 직렬화한다.
#[derive(Debug, Clone, Default)]
pub struct PdfDocument {
    pages: Vec<PageCanvas>,
}

impl PdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self, page: PageCanvas) {
        self.pages.push(page);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 객체 번호: 1=Catalog, 2=Pages, 3/4=글꼴, 이후 페이지마다 (Page, Contents).
    pub fn to_bytes(&self) -> Vec<u8> {
        let page_ids: Vec<usize> = (0..self.pages.len()).map(|k| 5 + 2 * k).collect();
        let kids = page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");

        let mut objects: Vec<String> = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{kids}] /Count {} >>",
                self.pages.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];
        for (k, page) in self.pages.iter().enumerate() {
            let content_id = 6 + 2 * k;
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.2} {PAGE_HEIGHT:.2}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {content_id} 0 R >>"
            ));
            let stream = page.clone().into_stream();
            objects.push(format!(
                "<< /Length {} >>\nstream\n{stream}endstream",
                stream.len()
            ));
        }

        let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (idx, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", idx + 1).as_bytes());
        }
        let xref_at = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for off in offsets {
            let _ = writeln!(xref, "{off:010} 00000 n ");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}
