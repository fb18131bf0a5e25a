/// HTTP API Layer
///
/// Thin axum layer over the content core. It handles:
/// - Public read endpoints consumed by the rendered page
/// - Admin JSON endpoints for sections, blocks, projects and settings
/// - Snapshot export and import
///
/// Session login, password hashing and file uploads live outside this crate;
/// admin routes only check an optional static bearer token.

// Public read endpoints
pub mod public;

// Admin endpoints (token-guarded)
pub mod admin;

use crate::content::{ContentRepository, SettingsStore};
use crate::error::ContentError;
use crate::snapshot::ImportTransaction;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

pub use admin::create_admin_routes;
pub use public::create_public_routes;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Sections, blocks and projects
    pub repo: ContentRepository,
    /// Flat key/value settings
    pub settings: SettingsStore,
    /// Snapshot import
    pub import: ImportTransaction,
    /// Bearer token required on admin routes, if configured
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(pool: SqlitePool, admin_token: Option<String>) -> Self {
        Self {
            repo: ContentRepository::new(pool.clone()),
            settings: SettingsStore::new(pool.clone()),
            import: ImportTransaction::new(pool),
            admin_token: admin_token.map(Arc::from),
        }
    }
}

/// Errors returned by handlers, rendered as `{ "error": message }`
#[derive(Debug)]
pub enum ApiError {
    Content(ContentError),
    Invalid(String),
    Unauthorized,
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        ApiError::Content(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Content(err) => {
                let status = match &err {
                    ContentError::NotFound { .. } => StatusCode::NOT_FOUND,
                    ContentError::DuplicateSlug(_) => StatusCode::CONFLICT,
                    ContentError::MalformedDocument(_) => StatusCode::BAD_REQUEST,
                    ContentError::Storage(e) => {
                        tracing::error!("Storage failure: {}", e);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
            ApiError::Invalid(message) => {
                tracing::warn!("Rejected input: {}", message);
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
