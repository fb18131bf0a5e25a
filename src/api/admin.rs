/// Admin REST API endpoints
///
/// CRUD for sections, blocks and projects, the settings form, and snapshot
/// export/import. Every route is guarded by the optional bearer token.

use crate::api::{ApiError, ApiResult, AppState};
use crate::content::settings::ADMIN_SETTING_KEYS;
use crate::content::{ContentBlock, ContentStats, NewBlock, NewProject, NewSection, Project, Section};
use crate::snapshot::{ImportReport, SnapshotCodec, SnapshotDocument};
use axum::{
    extract::{DefaultBodyLimit, Path, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Create admin routes
///
/// `state` is needed up front to wire the token check; `max_import_bytes`
/// bounds the import request body.
pub fn create_admin_routes(state: AppState, max_import_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(stats))
        .route("/admin/sections", get(list_sections).post(create_section))
        .route("/admin/sections/{id}", delete(delete_section))
        .route("/admin/sections/{id}/toggle", post(toggle_section))
        .route("/admin/sections/{id}/blocks", get(list_blocks).post(create_block))
        .route("/admin/blocks/{id}", delete(delete_block))
        .route("/admin/projects", get(list_projects).post(create_project))
        .route("/admin/projects/{id}", delete(delete_project))
        .route("/admin/settings", get(get_settings).put(update_settings))
        .route("/admin/export", get(export_snapshot))
        .route(
            "/admin/import",
            post(import_snapshot).layer(DefaultBodyLimit::max(max_import_bytes)),
        )
        .route_layer(middleware::from_fn_with_state(state, require_admin_token))
}

/// Reject requests without the configured bearer token
async fn require_admin_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(expected) = state.admin_token.as_deref() {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));
        if presented != Some(expected) {
            tracing::warn!("🔒 Rejected admin request to {}", request.uri().path());
            return ApiError::Unauthorized.into_response();
        }
    }
    next.run(request).await
}

/// GET /admin/stats
async fn stats(State(state): State<AppState>) -> ApiResult<Json<ContentStats>> {
    Ok(Json(state.repo.stats().await?))
}

/// GET /admin/sections
/// Returns every section, enabled or not, in display order
async fn list_sections(State(state): State<AppState>) -> ApiResult<Json<Vec<Section>>> {
    Ok(Json(state.repo.list_sections().await?))
}

/// POST /admin/sections
/// Body: { "name": "...", "slug": "...", "sort_order": 0 }
async fn create_section(
    State(state): State<AppState>,
    Json(mut form): Json<NewSection>,
) -> ApiResult<(StatusCode, Json<Section>)> {
    form.name = form.name.trim().to_string();
    form.slug = form.slug.trim().to_string();
    form.validate().map_err(ApiError::Invalid)?;

    let section = state.repo.create_section(&form).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

/// POST /admin/sections/{id}/toggle
async fn toggle_section(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Section>> {
    Ok(Json(state.repo.toggle_section_enabled(id).await?))
}

/// DELETE /admin/sections/{id}
/// Returns: { "message": "...", "blocks_removed": n }
async fn delete_section(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let blocks_removed = state.repo.delete_section(id).await?;
    Ok(Json(json!({
        "message": "Section deleted successfully",
        "blocks_removed": blocks_removed,
    })))
}

/// GET /admin/sections/{id}/blocks
async fn list_blocks(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<ContentBlock>>> {
    Ok(Json(state.repo.list_blocks(id).await?))
}

/// POST /admin/sections/{id}/blocks
/// Body: { "title": "...", "layout": "card", "image": "<uploaded path>", ... }
async fn create_block(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<NewBlock>,
) -> ApiResult<(StatusCode, Json<ContentBlock>)> {
    form.validate().map_err(ApiError::Invalid)?;

    let block = state.repo.create_block(id, &form).await?;
    Ok((StatusCode::CREATED, Json(block)))
}

/// DELETE /admin/blocks/{id}
/// Returns: { "message": "...", "section_id": n }
async fn delete_block(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let section_id = state.repo.delete_block(id).await?;
    Ok(Json(json!({
        "message": "Block deleted successfully",
        "section_id": section_id,
    })))
}

/// GET /admin/projects
async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.repo.list_projects().await?))
}

/// POST /admin/projects
async fn create_project(
    State(state): State<AppState>,
    Json(form): Json<NewProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    form.validate().map_err(ApiError::Invalid)?;

    let project = state.repo.create_project(&form).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// DELETE /admin/projects/{id}
async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.repo.delete_project(id).await?;
    Ok(Json(json!({ "message": "Project deleted successfully" })))
}

/// GET /admin/settings
/// Returns every settings-form key, empty when unset
async fn get_settings(
    State(state): State<AppState>,
) -> ApiResult<Json<BTreeMap<String, String>>> {
    Ok(Json(state.settings.get_many(&ADMIN_SETTING_KEYS).await?))
}

/// PUT /admin/settings
/// Body: { "site_name": "...", ... } restricted to the settings-form keys.
/// Keys left out of the body keep their stored values.
async fn update_settings(
    State(state): State<AppState>,
    Json(form): Json<BTreeMap<String, String>>,
) -> ApiResult<Json<BTreeMap<String, String>>> {
    let unknown = form
        .keys()
        .find(|key| !ADMIN_SETTING_KEYS.iter().any(|known| *known == key.as_str()));
    if let Some(key) = unknown {
        return Err(ApiError::Invalid(format!("Unknown setting: {}", key)));
    }

    let pairs: Vec<(String, Option<String>)> = form
        .into_iter()
        .map(|(key, value)| (key, Some(value)))
        .collect();
    state.settings.set_many(pairs).await?;

    Ok(Json(state.settings.get_many(&ADMIN_SETTING_KEYS).await?))
}

/// GET /admin/export
/// Downloads the full snapshot as portfolio-export-YYYYMMDD.json
async fn export_snapshot(
    State(state): State<AppState>,
) -> ApiResult<(HeaderMap, Json<SnapshotDocument>)> {
    let document = SnapshotCodec::serialize(&state.repo).await?;

    let filename = format!("portfolio-export-{}.json", chrono::Utc::now().format("%Y%m%d"));
    let mut headers = HeaderMap::new();
    if let Ok(value) = format!("attachment; filename=\"{}\"", filename).parse::<HeaderValue>() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    tracing::info!("📤 Exported snapshot: {}", filename);
    Ok((headers, Json(document)))
}

/// POST /admin/import
/// Body: snapshot JSON as produced by /admin/export
async fn import_snapshot(
    State(state): State<AppState>,
    body: String,
) -> ApiResult<Json<ImportReport>> {
    Ok(Json(state.import.import_json(&body).await?))
}
