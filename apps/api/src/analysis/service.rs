//! Analyze Function: turns raw resume text into a persisted analysis.
//!
//! Flow: prompt → upstream chat call → locate JSON → decode + normalize →
//!       insert analysis → mark resume completed.
//!
//! Nothing is written unless the upstream call and the parse both succeed,
//! and the resume is only marked completed after the analysis row exists.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::parser::parse_report;
use crate::analysis::prompts::{ANALYZE_PROMPT_TEMPLATE, ANALYZE_SYSTEM};
use crate::analysis::report::AnalysisReport;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::analysis::NewAnalysis;
use crate::store::ResumeRepository;

pub async fn analyze_resume(
    llm: &LlmClient,
    repo: &dyn ResumeRepository,
    user_id: Uuid,
    resume_id: Uuid,
    resume_text: &str,
) -> Result<AnalysisReport, AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resumeText cannot be empty".to_string(),
        ));
    }

    info!(%user_id, %resume_id, "Analyzing resume");

    let prompt = ANALYZE_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
    let analysis_text = llm.chat_text(ANALYZE_SYSTEM, &prompt).await?;
    debug!("Raw AI response: {analysis_text}");

    let report = parse_report(&analysis_text)?;

    repo.insert_analysis(NewAnalysis {
        resume_id,
        user_id,
        analysis_text,
        report: report.clone(),
    })
    .await?;

    // The analysis row already exists, so a failed status update is only logged.
    if let Err(e) = repo.mark_resume_completed(resume_id).await {
        warn!(%resume_id, "Analysis stored but resume status not updated: {e}");
    }

    info!(%user_id, %resume_id, "Analysis completed successfully");
    Ok(report)
}
