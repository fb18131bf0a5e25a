/// Snapshot codec: the full content graph as one JSON document
///
/// Shape:
/// { settings: {key: value},
///   sections: [ {id, name, slug, is_enabled, sort_order, blocks: [ {...} ]} ],
///   projects: [ {...} ] }
///
/// Section and block ids only reference things within the document; importing
/// never reuses them. Parsing is tolerant: missing or null fields fall back to
/// empty strings, `true` for flags and `0` for sort_order.

use crate::content::repository::{blocks_ordered, projects_ordered, sections_ordered};
use crate::content::settings::all_settings;
use crate::content::types::{ContentBlock, Layout, NewBlock, NewProject, NewSection, Project, Section};
use crate::content::ContentRepository;
use crate::error::{ContentError, ContentResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Full exported content graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default, deserialize_with = "setting_values")]
    pub settings: BTreeMap<String, Option<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<SectionEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEntry {
    /// Source-side id; any JSON scalar is accepted on import
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub is_enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort_order: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocks: Vec<BlockEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub button_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub button_url: String,
    #[serde(default = "default_layout", deserialize_with = "null_as_layout")]
    pub layout: String,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub is_published: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort_order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code_link: String,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub is_published: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort_order: i64,
}

/// A section to recreate, with the id it had in the source document
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpec {
    /// Source id rendered as JSON text, used only to report the id mapping
    pub source_id: Option<String>,
    pub section: NewSection,
}

/// Parsed document, ready to be replayed by the import transaction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPlan {
    pub settings: Vec<(String, Option<String>)>,
    pub sections: Vec<(SectionSpec, Vec<NewBlock>)>,
    pub projects: Vec<NewProject>,
}

impl ImportPlan {
    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|(_, blocks)| blocks.len()).sum()
    }
}

pub struct SnapshotCodec;

impl SnapshotCodec {
    /// Read the whole content graph in one transaction
    ///
    /// Every section and block is included regardless of visibility, children in
    /// stored (sort_order, id) order.
    pub async fn serialize(repo: &ContentRepository) -> ContentResult<SnapshotDocument> {
        let mut tx = repo.pool().begin().await?;

        let settings = all_settings(&mut tx).await?;

        let mut sections = Vec::new();
        for section in sections_ordered(&mut tx).await? {
            let blocks = blocks_ordered(&mut tx, section.id).await?;
            sections.push(SectionEntry::from_stored(section, blocks));
        }

        let projects = projects_ordered(&mut tx)
            .await?
            .into_iter()
            .map(ProjectEntry::from)
            .collect();

        tx.commit().await?;

        let document = SnapshotDocument { settings, sections, projects };
        tracing::debug!(
            "📦 Serialized snapshot: {} sections, {} projects",
            document.sections.len(),
            document.projects.len()
        );
        Ok(document)
    }

    /// Parse JSON text into a document; MalformedDocument when it is not a JSON
    /// object of the expected shape
    pub fn parse(text: &str) -> ContentResult<SnapshotDocument> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ContentError::MalformedDocument(e.to_string()))?;
        if !value.is_object() {
            return Err(ContentError::MalformedDocument(
                "top-level value must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| ContentError::MalformedDocument(e.to_string()))
    }

    /// Parse JSON text straight into an import plan
    pub fn deserialize(text: &str) -> ContentResult<ImportPlan> {
        Ok(Self::parse(text)?.into_plan())
    }
}

impl SnapshotDocument {
    /// Convert into creation records, preserving document order
    pub fn into_plan(self) -> ImportPlan {
        let settings = self.settings.into_iter().collect();

        let sections = self
            .sections
            .into_iter()
            .map(|entry| {
                let spec = SectionSpec {
                    source_id: entry.id.as_ref().map(source_key),
                    section: NewSection {
                        name: entry.name,
                        slug: entry.slug,
                        is_enabled: entry.is_enabled,
                        sort_order: entry.sort_order,
                    },
                };
                let blocks = entry.blocks.into_iter().map(NewBlock::from).collect();
                (spec, blocks)
            })
            .collect();

        let projects = self.projects.into_iter().map(NewProject::from).collect();

        ImportPlan { settings, sections, projects }
    }

    /// Copy of the document with every id removed, for comparing exports taken
    /// before and after an import
    pub fn without_ids(&self) -> SnapshotDocument {
        let mut document = self.clone();
        for section in &mut document.sections {
            section.id = None;
            for block in &mut section.blocks {
                block.id = None;
            }
        }
        for project in &mut document.projects {
            project.id = None;
        }
        document
    }
}

impl SectionEntry {
    fn from_stored(section: Section, blocks: Vec<ContentBlock>) -> Self {
        Self {
            id: Some(Value::from(section.id)),
            name: section.name,
            slug: section.slug,
            is_enabled: section.is_enabled,
            sort_order: section.sort_order,
            blocks: blocks.into_iter().map(BlockEntry::from).collect(),
        }
    }
}

impl From<ContentBlock> for BlockEntry {
    fn from(block: ContentBlock) -> Self {
        Self {
            id: Some(Value::from(block.id)),
            title: block.title,
            subtitle: block.subtitle,
            body: block.body,
            image: block.image,
            icon: block.icon,
            button_text: block.button_text,
            button_url: block.button_url,
            layout: block.layout,
            is_published: block.is_published,
            sort_order: block.sort_order,
        }
    }
}

impl From<Project> for ProjectEntry {
    fn from(project: Project) -> Self {
        Self {
            id: Some(Value::from(project.id)),
            title: project.title,
            description: project.description,
            tags: project.tags,
            image: project.image,
            link: project.link,
            code_link: project.code_link,
            is_published: project.is_published,
            sort_order: project.sort_order,
        }
    }
}

impl From<BlockEntry> for NewBlock {
    fn from(entry: BlockEntry) -> Self {
        Self {
            title: entry.title,
            subtitle: entry.subtitle,
            body: entry.body,
            image: entry.image,
            icon: entry.icon,
            button_text: entry.button_text,
            button_url: entry.button_url,
            layout: entry.layout,
            is_published: entry.is_published,
            sort_order: entry.sort_order,
        }
    }
}

impl From<ProjectEntry> for NewProject {
    fn from(entry: ProjectEntry) -> Self {
        Self {
            title: entry.title,
            description: entry.description,
            tags: entry.tags,
            image: entry.image,
            link: entry.link,
            code_link: entry.code_link,
            is_published: entry.is_published,
            sort_order: entry.sort_order,
        }
    }
}

/// Strings keep their text, everything else its JSON rendering
fn source_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn default_true() -> bool {
    true
}

fn default_layout() -> String {
    Layout::default().as_str().to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

fn null_as_layout<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_layout))
}

/// Settings must be a mapping; scalar non-string values are kept as JSON text
fn setting_values<'de, D>(deserializer: D) -> Result<BTreeMap<String, Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            };
            (key, value)
        })
        .collect())
}
