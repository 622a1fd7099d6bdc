//! Uploaded-PDF handling: first-page JPEG preview and best-effort text extraction.
//!
//! Rasterization is delegated to `pdftoppm` behind the `PageDecoder` trait so
//! handlers can be tested without the binary installed.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

pub const PREVIEW_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("uploaded file is empty")]
    Empty,

    #[error("uploaded file is not a PDF")]
    NotPdf,

    #[error("could not run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("pdftoppm failed: {0}")]
    Rasterize(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns PDF bytes into an image of their first page.
#[async_trait]
pub trait PageDecoder: Send + Sync {
    async fn first_page_jpeg(&self, pdf: &[u8]) -> Result<Vec<u8>, DecodeError>;
}

/// A base64-encoded first-page image, returned inline to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePreview {
    pub mime_type: &'static str,
    pub data: String,
}

impl PagePreview {
    pub fn from_jpeg(jpeg: &[u8]) -> Self {
        Self {
            mime_type: PREVIEW_MIME_TYPE,
            data: STANDARD.encode(jpeg),
        }
    }
}

fn check_pdf(pdf: &[u8]) -> Result<(), DecodeError> {
    if pdf.is_empty() {
        return Err(DecodeError::Empty);
    }
    if !pdf.starts_with(b"%PDF-") {
        return Err(DecodeError::NotPdf);
    }
    Ok(())
}

/// Renders the first page with `pdftoppm` inside a throwaway directory.
#[derive(Debug, Clone)]
pub struct PdftoppmDecoder {
    binary: PathBuf,
    dpi: u32,
}

impl PdftoppmDecoder {
    pub fn new(binary: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            binary: binary.into(),
            dpi,
        }
    }
}

#[async_trait]
impl PageDecoder for PdftoppmDecoder {
    async fn first_page_jpeg(&self, pdf: &[u8]) -> Result<Vec<u8>, DecodeError> {
        check_pdf(pdf)?;

        let dir = tempfile::tempdir()?;
        let input = dir.path().join("upload.pdf");
        let prefix = dir.path().join("page");
        tokio::fs::write(&input, pdf).await?;

        let output = Command::new(&self.binary)
            .arg("-jpeg")
            .arg("-r")
            .arg(self.dpi.to_string())
            .args(["-f", "1", "-l", "1", "-singlefile"])
            .arg(&input)
            .arg(&prefix)
            .output()
            .await
            .map_err(|source| DecodeError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DecodeError::Rasterize(if stderr.is_empty() {
                format!("exit status {}", output.status)
            } else {
                stderr
            }));
        }

        let jpeg = tokio::fs::read(prefix.with_extension("jpg")).await?;
        debug!("Rendered first page preview: {} bytes at {} dpi", jpeg.len(), self.dpi);
        Ok(jpeg)
    }
}

/// Pulls plain text out of the PDF on a blocking thread.
/// Returns `None` on any failure; the preview path is the one that must succeed.
pub async fn extract_resume_text(pdf: Bytes) -> Option<String> {
    let joined = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf)).await;

    match joined {
        Ok(Ok(text)) => {
            let text = text.trim().to_string();
            (!text.is_empty()).then_some(text)
        }
        Ok(Err(e)) => {
            warn!("Resume text extraction failed: {e}");
            None
        }
        Err(e) => {
            warn!("Resume text extraction task failed: {e}");
            None
        }
    }
}
