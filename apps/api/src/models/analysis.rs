use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::report::AnalysisReport;

/// A persisted analysis. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub user_id: Uuid,
    /// Raw model output the report was parsed from.
    pub analysis_text: String,
    #[serde(flatten)]
    pub report: AnalysisReport,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub resume_id: Uuid,
    pub user_id: Uuid,
    pub analysis_text: String,
    pub report: AnalysisReport,
}

/// The resume fields shown next to each analysis in the history view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub file_name: String,
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub analysis: Analysis,
    pub resume: ResumeSummary,
}
