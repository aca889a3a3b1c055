//! Axum route handlers for resume uploads.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::state::AppState;
use crate::upload::flow::{upload_and_analyze, UploadOutcome, UploadedFile};
use crate::upload::validation::FILE_TOO_LARGE_MESSAGE;

const FILE_FIELD: &str = "file";

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation(FILE_TOO_LARGE_MESSAGE.to_string())
    } else {
        AppError::Validation(format!("Invalid upload: {}", e.body_text()))
    }
}

/// POST /api/v1/resumes
///
/// Multipart upload with a single `file` field. Runs the full upload flow and
/// returns the stored resume with its analysis.
pub async fn handle_upload(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadOutcome>, AppError> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("resume")
            .to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
        break;
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    Ok(Json(upload_and_analyze(&state, &user, upload).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    user: AuthUser,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let resume = state
        .repo
        .get_resume(user.id, resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
    Ok(Json(resume))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    use crate::test_support::{
        body_json, multipart_body, MockUpstream, TestApp, EXAMPLE_REPORT_JSON, MULTIPART_BOUNDARY,
        TEST_TOKEN,
    };
    use crate::upload::validation::{INVALID_TYPE_MESSAGE, PDF_CONTENT_TYPE};

    fn upload_request(file_name: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/resumes")
            .header("authorization", format!("Bearer {TEST_TOKEN}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(multipart_body(file_name, content_type, bytes)))
            .unwrap()
    }

    /// A 1 KiB file that starts like a PDF but carries plain text.
    fn pdf_stub(text: &str) -> Vec<u8> {
        let mut stub = format!("%PDF-1.4\n% {text}\n").into_bytes();
        stub.resize(1024, b' ');
        stub
    }

    #[tokio::test]
    async fn test_end_to_end_upload_and_analysis() {
        let app = TestApp::new(MockUpstream::completion(EXAMPLE_REPORT_JSON).await).await;

        let response = app
            .router()
            .oneshot(upload_request(
                "jane.pdf",
                PDF_CONTENT_TYPE,
                &pdf_stub("5 years React experience"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["resume"]["analysis_status"], "completed");
        assert_eq!(body["resume"]["file_size"], 1024);
        assert_eq!(body["analysis"]["experience_years"], 5);

        // the upstream saw the resume text
        let requests = app.upstream.requests();
        assert_eq!(requests.len(), 1);
        let user_message = requests[0].body["messages"][1]["content"].as_str().unwrap();
        assert!(user_message.contains("5 years React experience"));

        // object stored under {user_id}/{epoch_ms}_{file_name}
        let keys = app.objects.keys();
        assert_eq!(keys.len(), 1);
        let (prefix, rest) = keys[0].split_once('/').unwrap();
        assert_eq!(prefix, app.user.id.to_string());
        let (millis, name) = rest.split_once('_').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(name, "jane.pdf");

        // pending → completed, exactly one analysis
        let resumes = app.repo.resumes();
        assert_eq!(resumes.len(), 1);
        assert!(resumes[0].is_completed());
        let analyses = app.repo.analyses();
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].report.experience_years, 5);
        assert_eq!(analyses[0].resume_id, resumes[0].id);
    }

    #[tokio::test]
    async fn test_png_rejected_before_any_side_effect() {
        let app = TestApp::new(MockUpstream::completion(EXAMPLE_REPORT_JSON).await).await;

        let response = app
            .router()
            .oneshot(upload_request("photo.png", "image/png", b"\x89PNG...."))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], INVALID_TYPE_MESSAGE);
        assert!(app.objects.keys().is_empty());
        assert!(app.repo.resumes().is_empty());
        assert!(app.upstream.requests().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_stops_flow() {
        let app = TestApp::new(MockUpstream::completion(EXAMPLE_REPORT_JSON).await).await;
        app.objects.fail_writes();

        let response = app
            .router()
            .oneshot(upload_request("cv.pdf", PDF_CONTENT_TYPE, &pdf_stub("Rust")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to upload resume");
        assert!(app.repo.resumes().is_empty());
        assert!(app.upstream.requests().is_empty());
    }

    #[tokio::test]
    async fn test_analysis_failure_leaves_pending_resume() {
        let app = TestApp::new(MockUpstream::status(429, "busy").await).await;

        let response = app
            .router()
            .oneshot(upload_request("cv.pdf", PDF_CONTENT_TYPE, &pdf_stub("Rust")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(app.objects.keys().len(), 1);
        let resumes = app.repo.resumes();
        assert_eq!(resumes.len(), 1);
        assert!(!resumes[0].is_completed());
        assert!(app.repo.analyses().is_empty());
    }

    #[tokio::test]
    async fn test_get_resume_scoped_to_owner() {
        let app = TestApp::new(MockUpstream::completion(EXAMPLE_REPORT_JSON).await).await;
        app.router()
            .oneshot(upload_request("cv.pdf", PDF_CONTENT_TYPE, &pdf_stub("Go")))
            .await
            .unwrap();
        let resume_id = app.repo.resumes()[0].id;

        let response = app
            .router()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/resumes/{resume_id}"))
                    .header("authorization", format!("Bearer {TEST_TOKEN}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["analysis_status"], "completed");

        let response = app
            .router()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/resumes/{}", uuid::Uuid::new_v4()))
                    .header("authorization", format!("Bearer {TEST_TOKEN}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
