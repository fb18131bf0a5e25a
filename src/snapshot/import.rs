/// Wipe-and-replace import of a snapshot document
///
/// The document is parsed completely before the database is touched. Clearing
/// the old content, overlaying settings and recreating sections, blocks and
/// projects then happen in a single transaction: any failure rolls everything
/// back, so readers see either the old site or the new one.
///
/// Settings are additive (keys missing from the document keep their value);
/// content is replaced wholesale.

use crate::content::repository::{clear_content, insert_block, insert_project, insert_section};
use crate::content::settings::upsert_setting;
use crate::error::ContentResult;
use crate::snapshot::codec::{ImportPlan, SnapshotCodec};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use std::collections::BTreeMap;

/// What an import removed and created
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub removed_sections: u64,
    pub removed_blocks: u64,
    pub removed_projects: u64,
    pub settings_written: usize,
    pub sections_created: usize,
    pub blocks_created: usize,
    pub projects_created: usize,
    /// Source section id -> newly assigned id
    pub section_ids: BTreeMap<String, i64>,
}

#[derive(Debug, Clone)]
pub struct ImportTransaction {
    pool: SqlitePool,
}

impl ImportTransaction {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Parse `text` and replace all content with it
    ///
    /// MalformedDocument is returned before anything is modified.
    pub async fn import_json(&self, text: &str) -> ContentResult<ImportReport> {
        let plan = match SnapshotCodec::deserialize(text) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!("❌ Rejected snapshot import: {}", e);
                return Err(e);
            }
        };
        self.apply(plan).await
    }

    /// Replay a parsed plan inside one transaction
    pub async fn apply(&self, plan: ImportPlan) -> ContentResult<ImportReport> {
        tracing::info!(
            "📥 Importing snapshot: {} settings, {} sections, {} blocks, {} projects",
            plan.settings.len(),
            plan.sections.len(),
            plan.block_count(),
            plan.projects.len()
        );

        let mut tx = self.pool.begin().await?;
        let mut report = ImportReport::default();

        // Children before parents
        let (sections, blocks, projects) = clear_content(&mut tx).await?;
        report.removed_sections = sections;
        report.removed_blocks = blocks;
        report.removed_projects = projects;

        for (key, value) in &plan.settings {
            upsert_setting(&mut tx, key, value.as_deref()).await?;
            report.settings_written += 1;
        }

        for (spec, blocks) in &plan.sections {
            let section = insert_section(&mut tx, &spec.section).await?;
            if let Some(source_id) = &spec.source_id {
                report.section_ids.insert(source_id.clone(), section.id);
            }
            report.sections_created += 1;

            for block in blocks {
                insert_block(&mut tx, section.id, block).await?;
                report.blocks_created += 1;
            }
        }

        for project in &plan.projects {
            insert_project(&mut tx, project).await?;
            report.projects_created += 1;
        }

        // Dropping tx on any `?` above rolls back the delete as well
        tx.commit().await?;

        tracing::info!(
            "✅ Snapshot imported: replaced {} sections / {} blocks / {} projects with {} / {} / {}",
            report.removed_sections,
            report.removed_blocks,
            report.removed_projects,
            report.sections_created,
            report.blocks_created,
            report.projects_created
        );

        Ok(report)
    }
}
