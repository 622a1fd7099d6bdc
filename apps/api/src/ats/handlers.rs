use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::ats::scoring::{evaluate_resume, evaluation_context, score_resume};
use crate::decode::{extract_resume_text, PagePreview};
use crate::errors::AppError;
use crate::models::ats::AtsResult;
use crate::state::AppState;

/// The two inputs every ATS request carries.
#[derive(Debug)]
pub struct AtsUpload {
    pub job_description: String,
    pub file_name: String,
    pub resume: Bytes,
}

#[derive(Serialize)]
pub struct EvaluationResponse {
    pub preview: PagePreview,
    pub evaluation: String,
}

#[derive(Serialize)]
pub struct ScoreResponse {
    pub preview: PagePreview,
    pub match_score: u8,
    pub raw_response: String,
    pub warnings: Vec<String>,
    pub result: AtsResult,
}

/// Reads `job_description` and `resume` from the form. A missing or empty file
/// is reported before an empty job description.
async fn read_upload(mut multipart: Multipart) -> Result<AtsUpload, AppError> {
    let mut job_description = String::new();
    let mut resume: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("job_description") => {
                job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job description: {e}")))?;
            }
            Some("resume") => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid resume upload: {e}")))?;
                resume = Some((file_name, bytes));
            }
            _ => {}
        }
    }

    let (file_name, resume) = resume
        .filter(|(_, bytes)| !bytes.is_empty())
        .ok_or(AppError::NoFileUploaded)?;

    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description must not be empty".to_string(),
        ));
    }

    Ok(AtsUpload {
        job_description,
        file_name,
        resume,
    })
}

/// Preview plus the context block for the model.
async fn prepare(state: &AppState, upload: AtsUpload) -> Result<(PagePreview, String), AppError> {
    let jpeg = state
        .decoder
        .first_page_jpeg(&upload.resume)
        .await
        .map_err(|e| AppError::Decode(e.to_string()))?;
    let preview = PagePreview::from_jpeg(&jpeg);

    let resume_text = extract_resume_text(upload.resume).await;
    let context = evaluation_context(
        &upload.file_name,
        &upload.job_description,
        resume_text.as_deref(),
    );
    Ok((preview, context))
}

/// POST /api/v1/sessions/:id/ats/evaluate
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<EvaluationResponse>, AppError> {
    state.sessions.ensure_exists(id).await?;
    let upload = read_upload(multipart).await?;
    info!("ATS evaluation requested: session={id}, file={}", upload.file_name);

    let (preview, context) = prepare(&state, upload).await?;
    let evaluation = evaluate_resume(state.llm.as_ref(), &context).await?;

    let stored = evaluation.clone();
    state
        .sessions
        .update(id, |s| s.last_evaluation = Some(stored))
        .await?;

    Ok(Json(EvaluationResponse {
        preview,
        evaluation,
    }))
}

/// POST /api/v1/sessions/:id/ats/score
pub async fn handle_score(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ScoreResponse>, AppError> {
    state.sessions.ensure_exists(id).await?;
    let upload = read_upload(multipart).await?;
    info!("ATS score requested: session={id}, file={}", upload.file_name);

    let (preview, context) = prepare(&state, upload).await?;
    let scored = score_resume(state.llm.as_ref(), &context).await?;

    let stored = scored.result.clone();
    state.sessions.update(id, |s| s.record_score(stored)).await?;

    Ok(Json(ScoreResponse {
        preview,
        match_score: scored.result.match_score,
        raw_response: scored.raw_response,
        warnings: scored.warnings,
        result: scored.result,
    }))
}

/// GET /api/v1/sessions/:id/ats/result
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AtsResult>, AppError> {
    state
        .sessions
        .read(id, |s| s.ats_result.clone())
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} has no ATS result yet")))
}
