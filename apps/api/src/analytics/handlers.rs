use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::analytics::{project, project_history, ChartSpec};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AnalyticsResponse {
    pub charts: Vec<ChartSpec>,
}

/// GET /api/v1/sessions/:id/analytics
pub async fn handle_analytics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let charts = state
        .sessions
        .read(id, |s| match &s.ats_result {
            Some(result) => project(result, &s.history),
            None => project_history(&s.history),
        })
        .await?;
    Ok(Json(AnalyticsResponse { charts }))
}
