//! Axum route handlers for the resume builder.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::generation::orchestrator::{flatten_fields, generate};
use crate::generation::prompts::RESUME_BUILDER_INSTRUCTION;
use crate::models::resume::ResumeDocument;
use crate::render::{render, PDF_MEDIA_TYPE, RESUME_FILE_NAME};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateResumeResponse {
    pub generated_resume: String,
}

/// Normalizes the form and rejects it when name or title is blank.
fn validated(document: ResumeDocument) -> Result<ResumeDocument, AppError> {
    let document = document.normalized();
    let missing = document.missing_required();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Please fill out the required fields: {}",
            missing.join(", ")
        )));
    }
    Ok(document)
}

/// POST /api/v1/resumes/generate
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    Json(document): Json<ResumeDocument>,
) -> Result<Json<GenerateResumeResponse>, AppError> {
    let document = validated(document)?;
    info!("Generating resume for '{}'", document.full_name);

    let context = flatten_fields(document.fields());
    let generated_resume = generate(state.llm.as_ref(), &context, RESUME_BUILDER_INSTRUCTION).await?;

    Ok(Json(GenerateResumeResponse { generated_resume }))
}

/// POST /api/v1/resumes/pdf
pub async fn handle_resume_pdf(Json(document): Json<ResumeDocument>) -> Result<Response, AppError> {
    let document = validated(document)?;

    let bytes = tokio::task::spawn_blocking(move || render(&document))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("render task failed: {e}")))?
        .map_err(|e| AppError::Render(e.to_string()))?;
    info!("Rendered resume PDF: {} bytes", bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, PDF_MEDIA_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{RESUME_FILE_NAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_lists_missing_fields() {
        let err = validated(ResumeDocument::default()).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("full_name") && msg.contains("professional_title")));
    }

    #[test]
    fn test_validated_normalizes() {
        let document = ResumeDocument {
            full_name: "Ada\r Lovelace".to_string(),
            professional_title: "Engineer".to_string(),
            ..Default::default()
        };
        assert_eq!(validated(document).unwrap().full_name, "Ada Lovelace");
    }
}
