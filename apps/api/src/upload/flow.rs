//! Upload flow: stores a resume, records it, and runs the analysis.
//!
//! Flow: validate → put object → insert pending row → extract text → analyze.
//!
//! Each stage fails with its own message. Nothing is rolled back: a failure
//! leaves state exactly as the last successful stage left it.

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::report::AnalysisReport;
use crate::analysis::service::analyze_resume;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::{NewResume, ResumeRow};
use crate::state::AppState;
use crate::storage::object_key;
use crate::upload::text::extract_text;
use crate::upload::validation::validate_upload;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Serialize)]
pub struct UploadOutcome {
    pub success: bool,
    pub resume: ResumeRow,
    pub analysis: AnalysisReport,
}

pub async fn upload_and_analyze(
    state: &AppState,
    user: &AuthUser,
    file: UploadedFile,
) -> Result<UploadOutcome, AppError> {
    validate_upload(&file.content_type, file.bytes.len())?;

    let file_path = object_key(user.id, Utc::now().timestamp_millis(), &file.file_name);
    state
        .objects
        .put(&file_path, file.bytes.clone(), &file.content_type)
        .await?;

    let resume = state
        .repo
        .insert_resume(NewResume {
            user_id: user.id,
            file_name: file.file_name.clone(),
            file_path,
            file_size: file.bytes.len() as i64,
        })
        .await?;

    info!(resume_id = %resume.id, user_id = %user.id, "Resume uploaded, starting analysis");

    let resume_text = extract_text(&file.content_type, file.bytes).await;
    let analysis = analyze_resume(
        &state.llm,
        state.repo.as_ref(),
        user.id,
        resume.id,
        &resume_text,
    )
    .await?;

    let resume = state
        .repo
        .get_resume(user.id, resume.id)
        .await?
        .unwrap_or(resume);
    if !resume.is_completed() {
        warn!(resume_id = %resume.id, "Analysis stored but resume still pending");
    }

    Ok(UploadOutcome {
        success: true,
        resume,
        analysis,
    })
}
