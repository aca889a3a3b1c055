use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use crate::analysis::report::{AnalysisReport, Education, JobRecommendation};
use crate::errors::AppError;
use crate::models::analysis::{Analysis, HistoryEntry, NewAnalysis, ResumeSummary};
use crate::models::resume::{AnalysisStatus, NewResume, ResumeRow};
use crate::store::ResumeRepository;

#[derive(Clone)]
pub struct PgResumeRepository {
    pool: PgPool,
}

impl PgResumeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AnalysisRecord {
    id: Uuid,
    resume_id: Uuid,
    user_id: Uuid,
    analysis_text: String,
    skills: Vec<String>,
    experience_years: i32,
    education: Json<Vec<Education>>,
    job_recommendations: Json<Vec<JobRecommendation>>,
    strengths: Vec<String>,
    improvements: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<AnalysisRecord> for Analysis {
    fn from(r: AnalysisRecord) -> Self {
        Analysis {
            id: r.id,
            resume_id: r.resume_id,
            user_id: r.user_id,
            analysis_text: r.analysis_text,
            report: AnalysisReport {
                skills: r.skills,
                experience_years: u32::try_from(r.experience_years).unwrap_or(0),
                education: r.education.0,
                job_recommendations: r.job_recommendations.0,
                strengths: r.strengths,
                improvements: r.improvements,
            },
            created_at: r.created_at,
        }
    }
}

/// An analysis row joined with its resume's display fields.
#[derive(Debug, FromRow)]
struct HistoryRecord {
    id: Uuid,
    resume_id: Uuid,
    user_id: Uuid,
    analysis_text: String,
    skills: Vec<String>,
    experience_years: i32,
    education: Json<Vec<Education>>,
    job_recommendations: Json<Vec<JobRecommendation>>,
    strengths: Vec<String>,
    improvements: Vec<String>,
    created_at: DateTime<Utc>,
    file_name: String,
    upload_date: DateTime<Utc>,
}

impl From<HistoryRecord> for HistoryEntry {
    fn from(r: HistoryRecord) -> Self {
        let analysis = AnalysisRecord {
            id: r.id,
            resume_id: r.resume_id,
            user_id: r.user_id,
            analysis_text: r.analysis_text,
            skills: r.skills,
            experience_years: r.experience_years,
            education: r.education,
            job_recommendations: r.job_recommendations,
            strengths: r.strengths,
            improvements: r.improvements,
            created_at: r.created_at,
        };
        HistoryEntry {
            analysis: analysis.into(),
            resume: ResumeSummary {
                file_name: r.file_name,
                upload_date: r.upload_date,
            },
        }
    }
}

/// Logs the driver error and returns a user-facing persistence error.
fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        error!("{context}: {e}");
        AppError::Persistence(context.to_string())
    }
}

#[async_trait]
impl ResumeRepository for PgResumeRepository {
    async fn insert_resume(&self, resume: NewResume) -> Result<ResumeRow, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (user_id, file_name, file_path, file_size, analysis_status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(resume.user_id)
        .bind(&resume.file_name)
        .bind(&resume.file_path)
        .bind(resume.file_size)
        .bind(AnalysisStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to record uploaded resume"))?;

        info!(resume_id = %row.id, user_id = %row.user_id, "Inserted pending resume");
        Ok(row)
    }

    async fn get_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
    ) -> Result<Option<ResumeRow>, AppError> {
        sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(resume_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to load resume"))
    }

    async fn insert_analysis(&self, analysis: NewAnalysis) -> Result<Analysis, AppError> {
        let NewAnalysis {
            resume_id,
            user_id,
            analysis_text,
            report,
        } = analysis;

        let record = sqlx::query_as::<_, AnalysisRecord>(
            r#"
            INSERT INTO resume_analysis
                (resume_id, user_id, analysis_text, skills, experience_years,
                 education, job_recommendations, strengths, improvements)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(resume_id)
        .bind(user_id)
        .bind(&analysis_text)
        .bind(&report.skills)
        .bind(i32::try_from(report.experience_years).unwrap_or(i32::MAX))
        .bind(Json(&report.education))
        .bind(Json(&report.job_recommendations))
        .bind(&report.strengths)
        .bind(&report.improvements)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to store analysis"))?;

        info!(analysis_id = %record.id, %resume_id, "Inserted analysis");
        Ok(record.into())
    }

    async fn mark_resume_completed(&self, resume_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE resumes SET analysis_status = $1 WHERE id = $2")
            .bind(AnalysisStatus::Completed.as_str())
            .bind(resume_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update resume status"))?;
        Ok(())
    }

    async fn list_analyses(&self, user_id: Uuid) -> Result<Vec<HistoryEntry>, AppError> {
        let records = sqlx::query_as::<_, HistoryRecord>(
            r#"
            SELECT a.*, r.file_name, r.upload_date
            FROM resume_analysis a
            JOIN resumes r ON r.id = a.resume_id
            WHERE a.user_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load analysis history"))?;

        Ok(records.into_iter().map(HistoryEntry::from).collect())
    }
}
