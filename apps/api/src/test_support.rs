//! Shared fakes for tests: in-memory collaborators, a scripted upstream
//! server, and router helpers.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::Response;
use axum::Router;
use bytes::Bytes;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::auth::{AuthUser, AuthVerifier};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::analysis::{Analysis, HistoryEntry, NewAnalysis, ResumeSummary};
use crate::models::resume::{AnalysisStatus, NewResume, ResumeRow};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{ObjectStore, UPLOAD_FAILED_MESSAGE};
use crate::store::ResumeRepository;

pub const TEST_TOKEN: &str = "test-user-token";
pub const MULTIPART_BOUNDARY: &str = "----resume-analyzer-test-boundary";

/// The example reply from the analysis prompt.
pub const EXAMPLE_REPORT_JSON: &str = r#"{
  "skills": ["React", "Node.js", "TypeScript"],
  "experience_years": 5,
  "education": [{"degree": "Bachelor's in Computer Science", "institution": "University Name", "year": "2020"}],
  "job_recommendations": [
    {
      "title": "Senior Software Engineer",
      "company_type": "Tech Companies",
      "requirements": "5+ years experience, React, Node.js, System Design",
      "salary_range": "$120k-$160k",
      "match_score": 92,
      "growth_potential": "High",
      "why_good_fit": "Your strong background in full-stack development and 5 years of experience align perfectly with this role."
    }
  ],
  "strengths": ["Strong technical skills", "Proven track record"],
  "improvements": ["Add leadership experience", "Obtain cloud certifications"]
}"#;

// ────────────────────────────────────────────────────────────────────────────
// Scripted upstream
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub apikey: Option<String>,
    /// Parsed JSON body, or `Null` when the body was empty or not JSON.
    pub body: Value,
}

/// A real HTTP server on an ephemeral port that answers every request with
/// the same canned response and records what it received.
pub struct MockUpstream {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    server: JoinHandle<()>,
}

impl MockUpstream {
    pub async fn respond(status: u16, content_type: &'static str, body: String) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        let status = StatusCode::from_u16(status).expect("valid status code");

        let app = Router::new().fallback(
            move |method: Method, uri: Uri, headers: HeaderMap, payload: Bytes| {
                let recorded = recorded.clone();
                let body = body.clone();
                async move {
                    let header_value = |name: &str| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string)
                    };
                    recorded.lock().unwrap().push(RecordedRequest {
                        method: method.to_string(),
                        path: uri.path().to_string(),
                        authorization: header_value("authorization"),
                        apikey: header_value("apikey"),
                        body: serde_json::from_slice(&payload).unwrap_or(Value::Null),
                    });
                    (status, [(header::CONTENT_TYPE, content_type)], body)
                }
            },
        )
        // prompts carry whole resumes, which can exceed axum's 2 MB default
        .layer(DefaultBodyLimit::disable());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            requests,
            server,
        }
    }

    pub async fn status(status: u16, body: &str) -> Self {
        Self::respond(status, "text/plain", body.to_string()).await
    }

    pub async fn json(status: u16, body: Value) -> Self {
        Self::respond(status, "application/json", body.to_string()).await
    }

    /// A successful chat completion whose first choice says `content`.
    pub async fn completion(content: &str) -> Self {
        Self::json(
            200,
            json!({
                "id": "chatcmpl-test",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
                "usage": {"prompt_tokens": 100, "completion_tokens": 50}
            }),
        )
        .await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory collaborators
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryRepository {
    resumes: Mutex<Vec<ResumeRow>>,
    analyses: Mutex<Vec<Analysis>>,
    failing_analysis_writes: AtomicBool,
}

impl MemoryRepository {
    pub fn resumes(&self) -> Vec<ResumeRow> {
        self.resumes.lock().unwrap().clone()
    }

    pub fn resume(&self, id: Uuid) -> Option<ResumeRow> {
        self.resumes().into_iter().find(|r| r.id == id)
    }

    pub fn analyses(&self) -> Vec<Analysis> {
        self.analyses.lock().unwrap().clone()
    }

    pub fn fail_analysis_writes(&self) {
        self.failing_analysis_writes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ResumeRepository for MemoryRepository {
    async fn insert_resume(&self, resume: NewResume) -> Result<ResumeRow, AppError> {
        let row = ResumeRow {
            id: Uuid::new_v4(),
            user_id: resume.user_id,
            file_name: resume.file_name,
            file_path: resume.file_path,
            file_size: resume.file_size,
            analysis_status: AnalysisStatus::Pending.as_str().to_string(),
            upload_date: Utc::now(),
        };
        self.resumes.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn get_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
    ) -> Result<Option<ResumeRow>, AppError> {
        Ok(self
            .resume(resume_id)
            .filter(|r| r.user_id == user_id))
    }

    async fn insert_analysis(&self, analysis: NewAnalysis) -> Result<Analysis, AppError> {
        if self.failing_analysis_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("Failed to store analysis".into()));
        }
        // mirrors the (resume_id, user_id) foreign key
        let owned = self
            .get_resume(analysis.user_id, analysis.resume_id)
            .await?
            .is_some();
        if !owned {
            return Err(AppError::Persistence("Failed to store analysis".into()));
        }
        let row = Analysis {
            id: Uuid::new_v4(),
            resume_id: analysis.resume_id,
            user_id: analysis.user_id,
            analysis_text: analysis.analysis_text,
            report: analysis.report,
            created_at: Utc::now(),
        };
        self.analyses.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn mark_resume_completed(&self, resume_id: Uuid) -> Result<(), AppError> {
        for row in self.resumes.lock().unwrap().iter_mut() {
            if row.id == resume_id {
                row.analysis_status = AnalysisStatus::Completed.as_str().to_string();
            }
        }
        Ok(())
    }

    async fn list_analyses(&self, user_id: Uuid) -> Result<Vec<HistoryEntry>, AppError> {
        let resumes = self.resumes();
        let mut entries: Vec<HistoryEntry> = self
            .analyses()
            .into_iter()
            .filter(|a| a.user_id == user_id)
            .filter_map(|analysis| {
                let resume = resumes.iter().find(|r| r.id == analysis.resume_id)?;
                Some(HistoryEntry {
                    resume: ResumeSummary {
                        file_name: resume.file_name.clone(),
                        upload_date: resume.upload_date,
                    },
                    analysis,
                })
            })
            .collect();
        entries.sort_by(|a, b| b.analysis.created_at.cmp(&a.analysis.created_at));
        Ok(entries)
    }
}

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Bytes>>,
    failing_writes: AtomicBool,
}

impl MemoryObjectStore {
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn fail_writes(&self) {
        self.failing_writes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> Result<(), AppError> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(AppError::Storage(UPLOAD_FAILED_MESSAGE.to_string()));
        }
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(())
    }
}

pub struct StaticAuth {
    users: HashMap<String, AuthUser>,
}

#[async_trait]
impl AuthVerifier for StaticAuth {
    async fn verify(&self, token: &str) -> Result<AuthUser, AppError> {
        self.users.get(token).cloned().ok_or(AppError::Unauthorized)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Router harness
// ────────────────────────────────────────────────────────────────────────────

pub struct TestApp {
    pub upstream: MockUpstream,
    pub repo: Arc<MemoryRepository>,
    pub objects: Arc<MemoryObjectStore>,
    pub user: AuthUser,
    state: AppState,
}

impl TestApp {
    pub async fn new(upstream: MockUpstream) -> Self {
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: Some("candidate@example.com".into()),
        };
        let repo = Arc::new(MemoryRepository::default());
        let objects = Arc::new(MemoryObjectStore::default());
        let auth = StaticAuth {
            users: HashMap::from([(TEST_TOKEN.to_string(), user.clone())]),
        };
        let state = AppState {
            llm: LlmClient::new(upstream.url(), "test-gateway-key".into()).unwrap(),
            repo: repo.clone(),
            objects: objects.clone(),
            auth: Arc::new(auth),
        };
        Self {
            upstream,
            repo,
            objects,
            user,
            state,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// A multipart/form-data body with a single `file` part.
pub fn multipart_body(file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{MULTIPART_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}
