use std::sync::Arc;

use crate::auth::AuthVerifier;
use crate::llm_client::LlmClient;
use crate::storage::ObjectStore;
use crate::store::ResumeRepository;

/// Shared application state injected into all route handlers via Axum extractors.
/// External collaborators are trait objects so they can be swapped per deployment
/// (and per test).
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub repo: Arc<dyn ResumeRepository>,
    pub objects: Arc<dyn ObjectStore>,
    pub auth: Arc<dyn AuthVerifier>,
}
