//! PDF writer. Measures, wraps and paginates a `ResumeLayout` into PDF bytes.
//!
//! Uses the base-14 Helvetica faces so nothing is embedded. The writer adds no
//! info dictionary, document ID or timestamps: the same layout always produces
//! the same bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;

use crate::layout::{wrap_spans, PageGeometry, Span, Typeface, WrappedLine};
use crate::render::blocks::{Align, Line, ResumeLayout, TextStyle};

/// Space after the header block and after every section.
const HEADER_GAP_PT: f32 = 24.0;
const SECTION_GAP_PT: f32 = 12.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode page content: {0}")]
    Content(String),

    #[error("failed to write PDF: {0}")]
    Write(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination
// ────────────────────────────────────────────────────────────────────────────

/// Accumulates content-stream operations page by page, tracking the vertical cursor.
struct Paginator<'a> {
    geometry: &'a PageGeometry,
    finished: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    cursor: f32,
}

impl<'a> Paginator<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            finished: Vec::new(),
            current: Vec::new(),
            cursor: geometry.top(),
        }
    }

    fn at_page_top(&self) -> bool {
        (self.cursor - self.geometry.top()).abs() < f32::EPSILON
    }

    fn new_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.cursor = self.geometry.top();
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.finished.push(self.current);
        self.finished
    }

    /// Vertical space; swallowed at the top of a page.
    fn skip(&mut self, amount: f32) {
        if !self.at_page_top() {
            self.cursor -= amount;
        }
    }

    fn ensure_room(&mut self, leading: f32) {
        if self.cursor - leading < self.geometry.margin_bottom_pt && !self.at_page_top() {
            self.new_page();
        }
    }

    fn paragraph(&mut self, style: TextStyle, line: &Line) {
        let size = style.font_size_pt();
        let leading = style.leading_pt();
        let wrapped = wrap_spans(&line.spans, size, self.geometry.text_width());
        if wrapped.is_empty() {
            return;
        }

        self.skip(style.space_before_pt());
        for printed in &wrapped {
            self.ensure_room(leading);
            let x = match style.align() {
                Align::Left => self.geometry.margin_left_pt,
                Align::Center => {
                    self.geometry.margin_left_pt
                        + (self.geometry.text_width() - printed.width_pt).max(0.0) / 2.0
                }
            };
            let baseline = self.cursor - size;
            self.emit_line(printed, size, x, baseline);
            self.cursor -= leading;
        }
    }

    fn emit_line(&mut self, printed: &WrappedLine, size: f32, x: f32, baseline: f32) {
        let ops = &mut self.current;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Td",
            vec![Object::Integer(x.round() as i64), Object::Integer(baseline.round() as i64)],
        ));
        for run in &printed.runs {
            ops.push(set_font(run, size));
            ops.push(Operation::new(
                "Tj",
                vec![Object::string_literal(encode_win_ansi(&run.text))],
            ));
        }
        ops.push(Operation::new("ET", vec![]));
    }
}

fn set_font(run: &Span, size: f32) -> Operation {
    let face = Typeface::for_weight(run.bold);
    Operation::new(
        "Tf",
        vec![
            Object::Name(face.resource_name().as_bytes().to_vec()),
            Object::Integer(size.round() as i64),
        ],
    )
}

/// Maps text to WinAnsiEncoding bytes. Characters outside the encoding become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

/// Lays out every paragraph and returns one operation list per page.
fn paginate(layout: &ResumeLayout, geometry: &PageGeometry) -> Vec<Vec<Operation>> {
    let mut paginator = Paginator::new(geometry);

    for paragraph in &layout.header {
        paginator.paragraph(paragraph.style, &paragraph.line);
    }
    if !layout.header.is_empty() {
        paginator.skip(HEADER_GAP_PT);
    }

    for section in &layout.sections {
        paginator.paragraph(TextStyle::Heading, &Line::plain(section.heading.clone()));
        for line in &section.lines {
            paginator.paragraph(TextStyle::Body, line);
        }
        paginator.skip(SECTION_GAP_PT);
    }

    paginator.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Document assembly
// ────────────────────────────────────────────────────────────────────────────

/// Writes the layout as a complete PDF file.
pub fn write_pdf(layout: &ResumeLayout, geometry: &PageGeometry) -> Result<Vec<u8>, RenderError> {
    let pages = paginate(layout, geometry);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(Typeface::Helvetica));
    let bold_id = doc.add_object(font_dictionary(Typeface::HelveticaBold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Typeface::Helvetica.resource_name() => regular_id,
            Typeface::HelveticaBold.resource_name() => bold_id,
        },
    });

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Content(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let page_count = page_ids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(geometry.width_pt.round() as i64),
            Object::Integer(geometry.height_pt.round() as i64),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RenderError::Write(e.to_string()))?;
    Ok(buffer)
}

fn font_dictionary(face: Typeface) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::letter_geometry;
    use crate::render::blocks::{Paragraph, Section};

    fn small_layout() -> ResumeLayout {
        ResumeLayout {
            header: vec![Paragraph {
                style: TextStyle::Title,
                line: Line::new(vec![Span::bold("Ada Lovelace")]),
            }],
            sections: vec![Section {
                heading: "Work Experience".to_string(),
                lines: vec![Line::new(vec![
                    Span::bold("Acme"),
                    Span::plain(", Engineer"),
                ])],
            }],
        }
    }

    #[test]
    fn test_write_pdf_produces_pdf_header() {
        let bytes = write_pdf(&small_layout(), &letter_geometry()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn test_write_pdf_is_deterministic() {
        let a = write_pdf(&small_layout(), &letter_geometry()).unwrap();
        let b = write_pdf(&small_layout(), &letter_geometry()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_written_pdf_loads_back_with_one_page() {
        let bytes = write_pdf(&small_layout(), &letter_geometry()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_long_content_paginates() {
        let lines = (0..200)
            .map(|i| Line::plain(format!("Line number {i} of a very long summary")))
            .collect();
        let layout = ResumeLayout {
            header: vec![],
            sections: vec![Section {
                heading: "Professional Summary".to_string(),
                lines,
            }],
        };
        let pages = paginate(&layout, &letter_geometry());
        assert!(pages.len() > 1, "200 body paragraphs should not fit one page");
        assert!(pages.iter().all(|ops| !ops.is_empty()));
    }

    #[test]
    fn test_empty_lines_emit_no_text() {
        let layout = ResumeLayout {
            header: vec![],
            sections: vec![Section {
                heading: "Key Skills".to_string(),
                lines: vec![Line::plain("")],
            }],
        };
        let pages = paginate(&layout, &letter_geometry());
        let text_ops = pages[0].iter().filter(|op| op.operator == "Tj").count();
        assert_eq!(text_ops, 1, "only the heading is drawn");
    }

    #[test]
    fn test_bold_runs_switch_font() {
        let pages = paginate(&small_layout(), &letter_geometry());
        let fonts: Vec<Vec<u8>> = pages[0]
            .iter()
            .filter(|op| op.operator == "Tf")
            .filter_map(|op| op.operands.first().and_then(|o| o.as_name().ok()).map(|n| n.to_vec()))
            .collect();
        assert!(fonts.contains(&b"F1".to_vec()));
        assert!(fonts.contains(&b"F2".to_vec()));
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Café – 100%"), b"Caf\xe9 \x96 100%".to_vec());
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }
}
