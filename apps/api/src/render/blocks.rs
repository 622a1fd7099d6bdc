//! Resume block model. Turns a `ResumeDocument` into an ordered, styled layout.
//!
//! Section order is fixed. Each free-text line is parsed on its own, so a line
//! that does not match its section's pattern is printed verbatim instead of
//! failing the render. Blank lines are skipped; an empty field leaves its
//! section heading with an empty body.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::layout::Span;
use crate::models::resume::ResumeDocument;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
}

/// Paragraph styles, sized after the classic letter-size resume layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextStyle {
    /// Candidate name.
    Title,
    /// Email / phone line under the name.
    Contact,
    Heading,
    Body,
}

impl TextStyle {
    pub fn font_size_pt(&self) -> f32 {
        match self {
            TextStyle::Title => 24.0,
            TextStyle::Contact => 12.0,
            TextStyle::Heading => 14.0,
            TextStyle::Body => 10.0,
        }
    }

    pub fn leading_pt(&self) -> f32 {
        match self {
            TextStyle::Title => 30.0,
            TextStyle::Contact => 15.0,
            TextStyle::Heading => 18.0,
            TextStyle::Body => 12.0,
        }
    }

    pub fn space_before_pt(&self) -> f32 {
        match self {
            TextStyle::Heading => 12.0,
            TextStyle::Body => 6.0,
            TextStyle::Title | TextStyle::Contact => 0.0,
        }
    }

    pub fn align(&self) -> Align {
        match self {
            TextStyle::Title | TextStyle::Contact => Align::Center,
            TextStyle::Heading | TextStyle::Body => Align::Left,
        }
    }
}

/// One paragraph worth of styled text. May wrap to several printed lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![Span::plain(text)])
    }

    /// Text with emphasis written as `**bold**`. Used for previews and tests.
    pub fn to_markup(&self) -> String {
        self.spans
            .iter()
            .map(|s| {
                if s.bold {
                    format!("**{}**", s.text)
                } else {
                    s.text.clone()
                }
            })
            .collect()
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub style: TextStyle,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub lines: Vec<Line>,
}

/// The full resume, ready to be measured and paginated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeLayout {
    pub header: Vec<Paragraph>,
    pub sections: Vec<Section>,
}

impl ResumeLayout {
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

pub const SECTION_SUMMARY: &str = "Professional Summary";
pub const SECTION_EXPERIENCE: &str = "Work Experience";
pub const SECTION_EDUCATION: &str = "Education";
pub const SECTION_SKILLS: &str = "Key Skills";
pub const SECTION_PROJECTS: &str = "Projects";
pub const SECTION_CERTIFICATIONS: &str = "Certifications";
pub const SECTION_LANGUAGES: &str = "Languages Known";

// ────────────────────────────────────────────────────────────────────────────
// Line patterns
// ────────────────────────────────────────────────────────────────────────────

fn experience_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*?) at (.*)$").expect("static regex"))
}

fn project_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*?): (.*)$").expect("static regex"))
}

fn certification_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*?) by (.*)$").expect("static regex"))
}

/// "Engineer at Acme" → **Acme**, Engineer
pub fn experience_line(raw: &str) -> Line {
    match experience_pattern().captures(raw) {
        Some(caps) => Line::new(vec![
            Span::bold(&caps[2]),
            Span::plain(format!(", {}", &caps[1])),
        ]),
        None => Line::plain(raw),
    }
}

/// "SmartCV: resume builder" → **SmartCV**: resume builder
pub fn project_line(raw: &str) -> Line {
    match project_pattern().captures(raw) {
        Some(caps) => Line::new(vec![
            Span::bold(&caps[1]),
            Span::plain(format!(": {}", &caps[2])),
        ]),
        None => Line::plain(raw),
    }
}

/// "Solutions Architect by AWS" → - **AWS**: Solutions Architect
pub fn certification_line(raw: &str) -> Line {
    match certification_pattern().captures(raw) {
        Some(caps) => Line::new(vec![
            Span::plain("- "),
            Span::bold(&caps[2]),
            Span::plain(format!(": {}", &caps[1])),
        ]),
        None => Line::plain(format!("- {raw}")),
    }
}

/// Comma-split, trimmed, empties dropped, joined with " | ".
pub fn skills_line(raw: &str) -> Line {
    let joined = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    Line::plain(joined)
}

fn non_blank_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.split('\n')
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
}

fn free_text(raw: &str) -> Vec<Line> {
    non_blank_lines(raw).map(Line::plain).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

fn contact_text(doc: &ResumeDocument) -> String {
    let mut parts = Vec::new();
    if !doc.contact_email.trim().is_empty() {
        parts.push(format!("Email: {}", doc.contact_email.trim()));
    }
    if !doc.contact_phone.trim().is_empty() {
        parts.push(format!("Phone: {}", doc.contact_phone.trim()));
    }
    parts.join(" | ")
}

fn education_lines(doc: &ResumeDocument) -> Vec<Line> {
    [
        ("10th Grade", &doc.education_10th),
        ("12th Grade", &doc.education_12th),
        ("Undergraduate", &doc.education_ug),
        ("Postgraduate", &doc.education_pg),
    ]
    .into_iter()
    .filter(|(_, details)| !details.trim().is_empty())
    .map(|(level, details)| {
        Line::new(vec![
            Span::bold(level),
            Span::plain(format!(": {}", details.trim())),
        ])
    })
    .collect()
}

/// Builds the fixed-order block model for a resume. Pure and deterministic.
pub fn build_blocks(doc: &ResumeDocument) -> ResumeLayout {
    let mut header = Vec::new();
    if !doc.full_name.trim().is_empty() {
        header.push(Paragraph {
            style: TextStyle::Title,
            line: Line::new(vec![Span::bold(doc.full_name.trim())]),
        });
    }
    let contact = contact_text(doc);
    if !contact.is_empty() {
        header.push(Paragraph {
            style: TextStyle::Contact,
            line: Line::plain(contact),
        });
    }
    if !doc.professional_title.trim().is_empty() {
        header.push(Paragraph {
            style: TextStyle::Body,
            line: Line::plain(doc.professional_title.trim()),
        });
    }

    let sections = vec![
        Section {
            heading: SECTION_SUMMARY.to_string(),
            lines: free_text(&doc.professional_summary),
        },
        Section {
            heading: SECTION_EXPERIENCE.to_string(),
            lines: non_blank_lines(&doc.work_experience)
                .map(experience_line)
                .collect(),
        },
        Section {
            heading: SECTION_EDUCATION.to_string(),
            lines: education_lines(doc),
        },
        Section {
            heading: SECTION_SKILLS.to_string(),
            lines: vec![skills_line(&doc.key_skills)],
        },
        Section {
            heading: SECTION_PROJECTS.to_string(),
            lines: non_blank_lines(&doc.projects).map(project_line).collect(),
        },
        Section {
            heading: SECTION_CERTIFICATIONS.to_string(),
            lines: non_blank_lines(&doc.certifications)
                .map(certification_line)
                .collect(),
        },
        Section {
            heading: SECTION_LANGUAGES.to_string(),
            lines: free_text(&doc.languages_known),
        },
    ];

    ResumeLayout { header, sections }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
