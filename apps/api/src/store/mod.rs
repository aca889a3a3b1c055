//! Persistence seam for the resume and analysis tables.
//!
//! `AppState` holds an `Arc<dyn ResumeRepository>`. Production uses
//! `PgResumeRepository`; tests use an in-memory implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{Analysis, HistoryEntry, NewAnalysis};
use crate::models::resume::{NewResume, ResumeRow};

pub mod postgres;

pub use postgres::PgResumeRepository;

#[async_trait]
pub trait ResumeRepository: Send + Sync {
    /// Inserts a resume row with status `pending`.
    async fn insert_resume(&self, resume: NewResume) -> Result<ResumeRow, AppError>;

    /// Returns the resume only if it belongs to `user_id`.
    async fn get_resume(&self, user_id: Uuid, resume_id: Uuid)
        -> Result<Option<ResumeRow>, AppError>;

    async fn insert_analysis(&self, analysis: NewAnalysis) -> Result<Analysis, AppError>;

    async fn mark_resume_completed(&self, resume_id: Uuid) -> Result<(), AppError>;

    /// All analyses for a user, newest first, joined with their resume.
    async fn list_analyses(&self, user_id: Uuid) -> Result<Vec<HistoryEntry>, AppError>;
}
