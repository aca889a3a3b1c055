//! Axum route handlers for the Analyze Function and the history views.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::history::render_history_to_md;
use crate::analysis::report::AnalysisReport;
use crate::analysis::service::analyze_resume;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::analysis::HistoryEntry;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub resume_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: AnalysisReport,
}

/// POST /api/v1/analyze-resume
///
/// Authentication runs first (the `AuthUser` extractor), so a missing or
/// invalid token is rejected before the body is read or the upstream called.
pub async fn handle_analyze(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let analysis = analyze_resume(
        &state.llm,
        state.repo.as_ref(),
        user.id,
        request.resume_id,
        &request.resume_text,
    )
    .await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
    }))
}

/// GET /api/v1/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    Ok(Json(state.repo.list_analyses(user.id).await?))
}

/// GET /api/v1/analyses/report
pub async fn handle_history_report(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let entries = state.repo.list_analyses(user.id).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        render_history_to_md(&entries),
    ))
}
