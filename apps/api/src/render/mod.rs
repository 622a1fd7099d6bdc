//! Resume rendering: `ResumeDocument` → block model → paginated PDF bytes.
//!
//! PDF writing is CPU-bound; async callers run `render` inside
//! `tokio::task::spawn_blocking`.

pub mod blocks;
pub mod pdf;

use crate::layout::letter_geometry;
use crate::models::resume::ResumeDocument;

pub use blocks::{build_blocks, ResumeLayout};
pub use pdf::{write_pdf, RenderError};

/// File name offered to the browser for the generated resume.
pub const RESUME_FILE_NAME: &str = "generated_resume.pdf";
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Renders a resume on US letter paper. Same document in, same bytes out.
pub fn render(document: &ResumeDocument) -> Result<Vec<u8>, RenderError> {
    let layout = build_blocks(document);
    write_pdf(&layout, &letter_geometry())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResumeDocument {
        ResumeDocument {
            full_name: "Ada Lovelace".to_string(),
            professional_title: "Backend Engineer".to_string(),
            contact_email: "ada@example.com".to_string(),
            work_experience: "Engineer at Acme\nFreelancer".to_string(),
            key_skills: "Rust, Go".to_string(),
            certifications: "Solutions Architect by AWS".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_twice_is_byte_identical() {
        let doc = sample();
        let first = render(&doc).unwrap();
        let second = render(&doc).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_empty_document_still_produces_pdf() {
        let bytes = render(&ResumeDocument::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_different_documents_render_differently() {
        let a = render(&sample()).unwrap();
        let b = render(&ResumeDocument {
            full_name: "Grace Hopper".to_string(),
            ..sample()
        })
        .unwrap();
        assert_ne!(a, b);
    }
}
