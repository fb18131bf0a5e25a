/// Folio: content backend for a personal portfolio site
///
/// This library provides the content core (ordered sections, content blocks,
/// projects and settings), the JSON snapshot export/import, and a thin axum
/// layer exposing both.

// Core configuration and setup
pub mod config;

// Error taxonomy shared by every content operation
pub mod error;

// Content layer - entities, SQLite storage, repository and settings store
pub mod content;

// Snapshot layer - JSON export and transactional wipe-and-replace import
pub mod snapshot;

// HTTP API layer - public reads and admin endpoints
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use content::{ContentBlock, ContentRepository, Project, Section, SettingsStore};
pub use error::{ContentError, ContentResult};
pub use server::start_server;
pub use snapshot::{ImportTransaction, SnapshotCodec, SnapshotDocument};
