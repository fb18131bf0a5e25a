/// Public read endpoints
///
/// Only enabled sections, published blocks and published projects are exposed.
/// Internal ids and visibility flags are left out of the payloads.

use crate::api::{ApiResult, AppState};
use crate::content::settings::setting_default;
use crate::content::{ContentBlock, Project, Section};
use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct PublicSection {
    pub name: String,
    pub slug: String,
    pub blocks: Vec<PublicBlock>,
}

#[derive(Debug, Serialize)]
pub struct PublicBlock {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub image: String,
    pub icon: String,
    pub button_text: String,
    pub button_url: String,
    pub layout: String,
}

#[derive(Debug, Serialize)]
pub struct PublicProject {
    pub title: String,
    pub description: String,
    pub tags: String,
    pub image: String,
    pub link: String,
    pub code_link: String,
}

impl PublicSection {
    fn new(section: Section, blocks: Vec<ContentBlock>) -> Self {
        Self {
            name: section.name,
            slug: section.slug,
            blocks: blocks.into_iter().map(PublicBlock::from).collect(),
        }
    }
}

impl From<ContentBlock> for PublicBlock {
    fn from(block: ContentBlock) -> Self {
        Self {
            title: block.title,
            subtitle: block.subtitle,
            body: block.body,
            image: block.image,
            icon: block.icon,
            button_text: block.button_text,
            button_url: block.button_url,
            layout: block.layout,
        }
    }
}

impl From<Project> for PublicProject {
    fn from(project: Project) -> Self {
        Self {
            title: project.title,
            description: project.description,
            tags: project.tags,
            image: project.image,
            link: project.link,
            code_link: project.code_link,
        }
    }
}

/// Create public read routes
pub fn create_public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sections", get(list_sections))
        .route("/api/projects", get(list_projects))
        .route("/api/settings/{key}", get(get_setting))
}

/// GET /api/sections
/// Returns: [{ "name": "...", "slug": "...", "blocks": [{ "title": "...", ... }] }]
async fn list_sections(State(state): State<AppState>) -> ApiResult<Json<Vec<PublicSection>>> {
    let page = state.repo.list_published_sections_with_blocks().await?;
    Ok(Json(
        page.into_iter()
            .map(|(section, blocks)| PublicSection::new(section, blocks))
            .collect(),
    ))
}

/// GET /api/projects
async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<PublicProject>>> {
    let projects = state.repo.list_published_projects().await?;
    Ok(Json(projects.into_iter().map(PublicProject::from).collect()))
}

/// GET /api/settings/{key}
/// Returns: { "key": "...", "value": "..." } with the key's default when unset
async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<Value>> {
    let value = state.settings.get(&key, setting_default(&key)).await?;
    Ok(Json(json!({ "key": key, "value": value })))
}
