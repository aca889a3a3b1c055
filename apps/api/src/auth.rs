//! Bearer-token authentication.
//!
//! Tokens are resolved by an `AuthVerifier`. Production asks the backend's
//! GoTrue-compatible `/auth/v1/user` endpoint; tests plug in a static map.
//! `AuthUser` is an Axum extractor, so handlers that take it reject
//! unauthenticated requests before reading the body.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthUser, AppError>;
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let (scheme, token) = value.split_once(' ').ok_or(AppError::Unauthorized)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers)?;
        state.auth.verify(token).await
    }
}

/// Verifies tokens against the backend's auth service using the service key.
#[derive(Clone)]
pub struct BackendAuth {
    client: Client,
    user_endpoint: String,
    service_key: String,
}

impl BackendAuth {
    pub fn new(backend_url: &str, service_key: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .context("Failed to build auth HTTP client")?,
            user_endpoint: format!("{}/auth/v1/user", backend_url.trim_end_matches('/')),
            service_key,
        })
    }
}

#[async_trait]
impl AuthVerifier for BackendAuth {
    async fn verify(&self, token: &str) -> Result<AuthUser, AppError> {
        let response = self
            .client
            .get(&self.user_endpoint)
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow!("Auth backend unreachable: {e}")))?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::BAD_REQUEST
                | StatusCode::UNAUTHORIZED
                | StatusCode::FORBIDDEN
                | StatusCode::NOT_FOUND
        ) {
            warn!(status = status.as_u16(), "Auth backend rejected token");
            return Err(AppError::Unauthorized);
        }
        if !status.is_success() {
            return Err(AppError::Internal(anyhow!(
                "Auth backend returned status {status}"
            )));
        }

        response
            .json::<AuthUser>()
            .await
            .map_err(|e| AppError::Internal(anyhow!("Invalid auth backend response: {e}")))
    }
}
