/// Content management layer
///
/// Owns the site database and the stores built on it:
/// - Entity and input record definitions (Section, ContentBlock, Project)
/// - SQLite schema and pool setup with sqlx
/// - Ordered, visibility-filtered content queries and transactional mutations
/// - The flat settings store

pub mod database;
pub mod repository;
pub mod settings;
pub mod types;

pub use repository::ContentRepository;
pub use settings::SettingsStore;
pub use types::{ContentBlock, ContentStats, Layout, NewBlock, NewProject, NewSection, Project, Section};
