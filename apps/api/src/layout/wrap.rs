//! Greedy word wrap over styled text.
//!
//! A "word" is a maximal run of non-whitespace characters and may straddle a
//! style change ("**Acme**," keeps the comma glued to the bold company name).
//! Words wider than the column are broken between characters.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{get_metrics, Typeface};

/// A run of text in one weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }

    fn width_pt(&self, size_pt: f32) -> f32 {
        get_metrics(Typeface::for_weight(self.bold)).measure_pt(&self.text, size_pt)
    }
}

/// One printed line: adjacent same-weight text merged into a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedLine {
    pub runs: Vec<Span>,
    pub width_pt: f32,
}

type Word = Vec<Span>;

fn word_width(word: &Word, size_pt: f32) -> f32 {
    word.iter().map(|s| s.width_pt(size_pt)).sum()
}

/// Splits styled spans into words, dropping the whitespace between them.
fn split_words(spans: &[Span]) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut current: Word = Vec::new();

    for span in spans {
        let mut buf = String::new();
        for ch in span.text.chars() {
            if ch.is_whitespace() {
                if !buf.is_empty() {
                    current.push(Span {
                        text: std::mem::take(&mut buf),
                        bold: span.bold,
                    });
                }
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            } else {
                buf.push(ch);
            }
        }
        if !buf.is_empty() {
            current.push(Span {
                text: buf,
                bold: span.bold,
            });
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Breaks a word wider than `max_width` into pieces that each fit.
/// A single character wider than the column still gets its own piece.
fn break_word(word: Word, size_pt: f32, max_width: f32) -> Vec<Word> {
    let mut pieces: Vec<Word> = Vec::new();
    let mut piece: Word = Vec::new();
    let mut piece_width = 0.0_f32;

    for span in word {
        let metrics = get_metrics(Typeface::for_weight(span.bold));
        let mut buf = String::new();
        for ch in span.text.chars() {
            let mut tmp = [0u8; 4];
            let ch_w = metrics.measure_pt(ch.encode_utf8(&mut tmp), size_pt);
            if piece_width + ch_w > max_width && (piece_width > 0.0 || !buf.is_empty()) {
                if !buf.is_empty() {
                    piece.push(Span {
                        text: std::mem::take(&mut buf),
                        bold: span.bold,
                    });
                }
                pieces.push(std::mem::take(&mut piece));
                piece_width = 0.0;
            }
            buf.push(ch);
            piece_width += ch_w;
        }
        if !buf.is_empty() {
            piece.push(Span {
                text: buf,
                bold: span.bold,
            });
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

fn push_word(line: &mut Vec<Span>, word: Word, with_space: bool) {
    if with_space {
        if let Some(last) = line.last_mut() {
            last.text.push(' ');
        }
    }
    for span in word {
        match line.last_mut() {
            Some(last) if last.bold == span.bold => last.text.push_str(&span.text),
            _ => line.push(span),
        }
    }
}

/// Greedy word wrap. Returns one `WrappedLine` per printed line; empty input
/// (or whitespace only) returns no lines.
pub fn wrap_spans(spans: &[Span], size_pt: f32, max_width: f32) -> Vec<WrappedLine> {
    let space_w = get_metrics(Typeface::Helvetica).measure_pt(" ", size_pt);

    let words: Vec<Word> = split_words(spans)
        .into_iter()
        .flat_map(|w| {
            if word_width(&w, size_pt) > max_width {
                break_word(w, size_pt, max_width)
            } else {
                vec![w]
            }
        })
        .collect();

    let mut lines: Vec<WrappedLine> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut current_width = 0.0_f32;

    for word in words {
        let w = word_width(&word, size_pt);
        if current.is_empty() {
            current_width = w;
            push_word(&mut current, word, false);
        } else if current_width + space_w + w > max_width {
            // Line is full, start the next one.
            lines.push(WrappedLine {
                runs: std::mem::take(&mut current),
                width_pt: current_width,
            });
            current_width = w;
            push_word(&mut current, word, false);
        } else {
            current_width += space_w + w;
            push_word(&mut current, word, true);
        }
    }
    if !current.is_empty() {
        lines.push(WrappedLine {
            runs: current,
            width_pt: current_width,
        });
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &WrappedLine) -> String {
        line.runs.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_wrap_empty_returns_no_lines() {
        assert!(wrap_spans(&[], 10.0, 468.0).is_empty());
        assert!(wrap_spans(&[Span::plain("   ")], 10.0, 468.0).is_empty());
    }

    #[test]
    fn test_short_text_single_line() {
        let lines = wrap_spans(&[Span::plain("Rust | Go | SQL")], 10.0, 468.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(text_of(&lines[0]), "Rust | Go | SQL");
        assert!(lines[0].width_pt < 468.0);
    }

    #[test]
    fn test_style_change_inside_word_keeps_glue() {
        let spans = [Span::bold("Acme"), Span::plain(", Engineer")];
        let lines = wrap_spans(&spans, 10.0, 468.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].runs,
            vec![Span::bold("Acme"), Span::plain(", Engineer")]
        );
    }

    #[test]
    fn test_long_text_wraps_within_width() {
        let long = "word ".repeat(120);
        let lines = wrap_spans(&[Span::plain(long)], 10.0, 468.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width_pt <= 468.0 + 1e-3, "line too wide: {}", line.width_pt);
        }
        let total_words: usize = lines
            .iter()
            .map(|l| text_of(l).split_whitespace().count())
            .sum();
        assert_eq!(total_words, 120);
    }

    #[test]
    fn test_overlong_word_is_broken() {
        let url = "x".repeat(400);
        let lines = wrap_spans(&[Span::plain(url)], 10.0, 100.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width_pt <= 100.0 + 1e-3);
        }
        let rejoined: String = lines.iter().map(text_of).collect();
        assert_eq!(rejoined.len(), 400);
    }

    #[test]
    fn test_adjacent_same_weight_runs_merge() {
        let spans = [Span::plain("- "), Span::plain("AWS Solutions Architect")];
        let lines = wrap_spans(&spans, 10.0, 468.0);
        assert_eq!(lines[0].runs, vec![Span::plain("- AWS Solutions Architect")]);
    }
}
