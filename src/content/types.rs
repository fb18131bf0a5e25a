/// Content type definitions
///
/// Stored entities (Section, ContentBlock, Project) and the typed records the
/// admin layer submits to create them. Every recognized input field is listed
/// here with its default, so request handling never guesses at parameters.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named, orderable top-level area of the public page (e.g. "about")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Section {
    pub id: i64,
    /// Display name
    pub name: String,
    /// Stable external identifier, unique across all sections
    pub slug: String,
    pub is_enabled: bool,
    /// Ascending display order, ties broken by insertion order
    pub sort_order: i64,
}

/// A single content unit nested under a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ContentBlock {
    pub id: i64,
    /// Owning section
    pub section_id: i64,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    /// Path or URI produced by the upload layer, empty when absent
    pub image: String,
    pub icon: String,
    pub button_text: String,
    pub button_url: String,
    /// Presentation variant, see [`Layout`]
    pub layout: String,
    pub is_published: bool,
    /// Ordering scoped to the owning section
    pub sort_order: i64,
}

/// A portfolio entry, independent of sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Comma-separated tag list
    pub tags: String,
    pub image: String,
    pub link: String,
    pub code_link: String,
    pub is_published: bool,
    /// Global ordering
    pub sort_order: i64,
}

impl Project {
    /// Split the comma-separated tag string into trimmed, non-empty tags
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

/// Presentation variants the public page knows how to render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    #[default]
    TextLeftImageRight,
    TextRightImageLeft,
    TextCenter,
    Card,
}

impl Layout {
    pub const ALL: [Layout; 4] = [
        Layout::TextLeftImageRight,
        Layout::TextRightImageLeft,
        Layout::TextCenter,
        Layout::Card,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::TextLeftImageRight => "text-left-image-right",
            Layout::TextRightImageLeft => "text-right-image-left",
            Layout::TextCenter => "text-center",
            Layout::Card => "card",
        }
    }

    pub fn parse(value: &str) -> Option<Layout> {
        Self::ALL.into_iter().find(|layout| layout.as_str() == value)
    }
}

/// Section creation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSection {
    pub name: String,
    pub slug: String,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    #[serde(default)]
    pub sort_order: i64,
}

impl NewSection {
    pub fn new(name: impl Into<String>, slug: impl Into<String>, sort_order: i64) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            is_enabled: true,
            sort_order,
        }
    }

    /// Admin form validation: name and slug are required
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() || self.slug.trim().is_empty() {
            return Err("Section name and slug are required".to_string());
        }
        Ok(())
    }
}

/// Content block creation record; the owning section is passed separately
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBlock {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub button_url: String,
    /// Admin form default is "card"
    #[serde(default = "default_form_layout")]
    pub layout: String,
    #[serde(default = "default_true")]
    pub is_published: bool,
    #[serde(default)]
    pub sort_order: i64,
}

impl Default for NewBlock {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            body: String::new(),
            image: String::new(),
            icon: String::new(),
            button_text: String::new(),
            button_url: String::new(),
            layout: Layout::default().as_str().to_string(),
            is_published: true,
            sort_order: 0,
        }
    }
}

impl NewBlock {
    /// Admin form validation: layout must be a known variant
    pub fn validate(&self) -> Result<(), String> {
        match Layout::parse(&self.layout) {
            Some(_) => Ok(()),
            None => Err(format!("Unknown layout: {}", self.layout)),
        }
    }
}

/// Project creation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub code_link: String,
    #[serde(default = "default_true")]
    pub is_published: bool,
    #[serde(default)]
    pub sort_order: i64,
}

impl Default for NewProject {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            tags: String::new(),
            image: String::new(),
            link: String::new(),
            code_link: String::new(),
            is_published: true,
            sort_order: 0,
        }
    }
}

impl NewProject {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Project title is required".to_string());
        }
        Ok(())
    }
}

/// Entity counts for the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContentStats {
    pub sections: i64,
    pub blocks: i64,
    pub projects: i64,
}

fn default_true() -> bool {
    true
}

fn default_form_layout() -> String {
    Layout::Card.as_str().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_names_match_serde() {
        for layout in Layout::ALL {
            let json = serde_json::to_value(layout).unwrap();
            assert_eq!(json, serde_json::json!(layout.as_str()));
            assert_eq!(Layout::parse(layout.as_str()), Some(layout));
        }
        assert_eq!(Layout::parse("grid"), None);
    }

    #[test]
    fn block_form_defaults() {
        let form: NewBlock = serde_json::from_str(r#"{"title": "Hello"}"#).unwrap();
        assert_eq!(form.layout, "card");
        assert!(form.is_published);
        assert_eq!(form.sort_order, 0);
        assert!(form.validate().is_ok());

        let bad = NewBlock { layout: "grid".into(), ..NewBlock::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn section_form_requires_name_and_slug() {
        assert!(NewSection::new("About", "about", 0).validate().is_ok());
        assert!(NewSection::new("About", "  ", 0).validate().is_err());
        assert!(NewSection::new("", "about", 0).validate().is_err());
    }

    #[test]
    fn tag_list_skips_blanks() {
        let project = Project {
            id: 1,
            title: "Scheduler".into(),
            description: String::new(),
            tags: "Rust, SQLite,,axum ".into(),
            image: String::new(),
            link: String::new(),
            code_link: String::new(),
            is_published: true,
            sort_order: 0,
        };
        assert_eq!(project.tag_list(), vec!["Rust", "SQLite", "axum"]);
    }
}
