/// Content repository: sections, content blocks and projects
///
/// Every listing is ordered by (sort_order, id) ascending; ids are assigned
/// monotonically, so id order is insertion order. Every mutation runs in its own
/// transaction so readers never observe a half-applied write.
///
/// The connection-level helpers at the bottom of this file are shared with the
/// import transaction, which drives them inside one larger transaction.

use crate::content::types::{
    ContentBlock, ContentStats, NewBlock, NewProject, NewSection, Project, Section,
};
use crate::error::{ContentError, ContentResult};
use sqlx::{sqlite::SqlitePool, SqliteConnection};

const SECTION_COLUMNS: &str = "id, name, slug, is_enabled, sort_order";
const BLOCK_COLUMNS: &str = "id, section_id, title, subtitle, body, image, icon, button_text, button_url, layout, is_published, sort_order";
const PROJECT_COLUMNS: &str = "id, title, description, tags, image, link, code_link, is_published, sort_order";

/// SQLite-backed store for the content graph
#[derive(Debug, Clone)]
pub struct ContentRepository {
    pool: SqlitePool,
}

impl ContentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ---------- Reads ----------

    /// Enabled sections in display order
    pub async fn list_enabled_sections(&self) -> ContentResult<Vec<Section>> {
        let sql = format!(
            "SELECT {SECTION_COLUMNS} FROM sections WHERE is_enabled = 1 ORDER BY sort_order ASC, id ASC"
        );
        let sections = sqlx::query_as::<_, Section>(&sql)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("📄 {} enabled sections", sections.len());
        Ok(sections)
    }

    /// All sections, enabled or not
    pub async fn list_sections(&self) -> ContentResult<Vec<Section>> {
        let mut conn = self.pool.acquire().await?;
        sections_ordered(&mut conn).await
    }

    pub async fn get_section(&self, id: i64) -> ContentResult<Section> {
        let mut conn = self.pool.acquire().await?;
        fetch_section(&mut conn, id).await
    }

    /// Section with `slug`, or `None` when no section uses it
    pub async fn get_section_by_slug(&self, slug: &str) -> ContentResult<Option<Section>> {
        let sql = format!("SELECT {SECTION_COLUMNS} FROM sections WHERE slug = ?");
        Ok(sqlx::query_as::<_, Section>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Published blocks of one section in display order
    ///
    /// An unknown section simply has no blocks.
    pub async fn list_published_blocks(&self, section_id: i64) -> ContentResult<Vec<ContentBlock>> {
        let sql = format!(
            "SELECT {BLOCK_COLUMNS} FROM content_blocks WHERE section_id = ? AND is_published = 1 ORDER BY sort_order ASC, id ASC"
        );
        Ok(sqlx::query_as::<_, ContentBlock>(&sql)
            .bind(section_id)
            .fetch_all(&self.pool)
            .await?)
    }

    /// All blocks of a section, published or not
    pub async fn list_blocks(&self, section_id: i64) -> ContentResult<Vec<ContentBlock>> {
        let mut tx = self.pool.begin().await?;
        fetch_section(&mut tx, section_id).await?;
        let blocks = blocks_ordered(&mut tx, section_id).await?;
        tx.commit().await?;
        Ok(blocks)
    }

    /// Published projects in display order
    pub async fn list_published_projects(&self) -> ContentResult<Vec<Project>> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE is_published = 1 ORDER BY sort_order ASC, id ASC"
        );
        Ok(sqlx::query_as::<_, Project>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    /// All projects, published or not
    pub async fn list_projects(&self) -> ContentResult<Vec<Project>> {
        let mut conn = self.pool.acquire().await?;
        projects_ordered(&mut conn).await
    }

    /// Enabled sections paired with their published blocks, read in one transaction
    pub async fn list_published_sections_with_blocks(
        &self,
    ) -> ContentResult<Vec<(Section, Vec<ContentBlock>)>> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            "SELECT {SECTION_COLUMNS} FROM sections WHERE is_enabled = 1 ORDER BY sort_order ASC, id ASC"
        );
        let sections = sqlx::query_as::<_, Section>(&sql)
            .fetch_all(&mut *tx)
            .await?;

        let block_sql = format!(
            "SELECT {BLOCK_COLUMNS} FROM content_blocks WHERE section_id = ? AND is_published = 1 ORDER BY sort_order ASC, id ASC"
        );
        let mut out = Vec::with_capacity(sections.len());
        for section in sections {
            let blocks = sqlx::query_as::<_, ContentBlock>(&block_sql)
                .bind(section.id)
                .fetch_all(&mut *tx)
                .await?;
            out.push((section, blocks));
        }
        tx.commit().await?;

        Ok(out)
    }

    pub async fn stats(&self) -> ContentResult<ContentStats> {
        let sections: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sections")
            .fetch_one(&self.pool)
            .await?;
        let blocks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM content_blocks")
            .fetch_one(&self.pool)
            .await?;
        let projects: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;

        Ok(ContentStats { sections, blocks, projects })
    }

    // ---------- Sections ----------

    /// Create a section; fails with DuplicateSlug when the slug is taken
    pub async fn create_section(&self, new: &NewSection) -> ContentResult<Section> {
        let mut tx = self.pool.begin().await?;
        let section = insert_section(&mut tx, new).await?;
        tx.commit().await?;

        tracing::info!("➕ Created section: {} ({})", section.slug, section.id);
        Ok(section)
    }

    /// Flip is_enabled and return the updated section
    pub async fn toggle_section_enabled(&self, id: i64) -> ContentResult<Section> {
        let sql = format!(
            "UPDATE sections SET is_enabled = NOT is_enabled WHERE id = ? RETURNING {SECTION_COLUMNS}"
        );
        let mut tx = self.pool.begin().await?;
        let section = sqlx::query_as::<_, Section>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ContentError::not_found("Section", id))?;
        tx.commit().await?;

        tracing::info!(
            "🔀 Section {} is now {}",
            section.slug,
            if section.is_enabled { "enabled" } else { "disabled" }
        );
        Ok(section)
    }

    /// Delete a section and all its blocks; returns the number of blocks removed
    pub async fn delete_section(&self, id: i64) -> ContentResult<u64> {
        let mut tx = self.pool.begin().await?;
        fetch_section(&mut tx, id).await?;

        let blocks = sqlx::query("DELETE FROM content_blocks WHERE section_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM sections WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!("🗑️ Deleted section {} with {} blocks", id, blocks);
        Ok(blocks)
    }

    // ---------- Blocks ----------

    /// Create a block under `section_id`; NotFound when the section is absent
    pub async fn create_block(&self, section_id: i64, new: &NewBlock) -> ContentResult<ContentBlock> {
        let mut tx = self.pool.begin().await?;
        fetch_section(&mut tx, section_id).await?;
        let block = insert_block(&mut tx, section_id, new).await?;
        tx.commit().await?;

        tracing::info!("➕ Created block {} in section {}", block.id, section_id);
        Ok(block)
    }

    /// Delete a block; returns the id of the section it belonged to
    pub async fn delete_block(&self, id: i64) -> ContentResult<i64> {
        let mut tx = self.pool.begin().await?;
        let section_id: i64 =
            sqlx::query_scalar("DELETE FROM content_blocks WHERE id = ? RETURNING section_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| ContentError::not_found("ContentBlock", id))?;
        tx.commit().await?;

        tracing::info!("🗑️ Deleted block {} from section {}", id, section_id);
        Ok(section_id)
    }

    // ---------- Projects ----------

    pub async fn create_project(&self, new: &NewProject) -> ContentResult<Project> {
        let mut tx = self.pool.begin().await?;
        let project = insert_project(&mut tx, new).await?;
        tx.commit().await?;

        tracing::info!("➕ Created project: {} ({})", project.title, project.id);
        Ok(project)
    }

    pub async fn delete_project(&self, id: i64) -> ContentResult<()> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ContentError::not_found("Project", id));
        }
        tx.commit().await?;

        tracing::info!("🗑️ Deleted project {}", id);
        Ok(())
    }
}

// ---------- Connection-level helpers ----------

pub(crate) async fn fetch_section(conn: &mut SqliteConnection, id: i64) -> ContentResult<Section> {
    let sql = format!("SELECT {SECTION_COLUMNS} FROM sections WHERE id = ?");
    sqlx::query_as::<_, Section>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| ContentError::not_found("Section", id))
}

pub(crate) async fn sections_ordered(conn: &mut SqliteConnection) -> ContentResult<Vec<Section>> {
    let sql = format!("SELECT {SECTION_COLUMNS} FROM sections ORDER BY sort_order ASC, id ASC");
    Ok(sqlx::query_as::<_, Section>(&sql).fetch_all(conn).await?)
}

pub(crate) async fn blocks_ordered(
    conn: &mut SqliteConnection,
    section_id: i64,
) -> ContentResult<Vec<ContentBlock>> {
    let sql = format!(
        "SELECT {BLOCK_COLUMNS} FROM content_blocks WHERE section_id = ? ORDER BY sort_order ASC, id ASC"
    );
    Ok(sqlx::query_as::<_, ContentBlock>(&sql)
        .bind(section_id)
        .fetch_all(conn)
        .await?)
}

pub(crate) async fn projects_ordered(conn: &mut SqliteConnection) -> ContentResult<Vec<Project>> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY sort_order ASC, id ASC");
    Ok(sqlx::query_as::<_, Project>(&sql).fetch_all(conn).await?)
}

pub(crate) async fn insert_section(
    conn: &mut SqliteConnection,
    new: &NewSection,
) -> ContentResult<Section> {
    let sql = format!(
        "INSERT INTO sections (name, slug, is_enabled, sort_order) VALUES (?, ?, ?, ?) RETURNING {SECTION_COLUMNS}"
    );
    sqlx::query_as::<_, Section>(&sql)
        .bind(&new.name)
        .bind(&new.slug)
        .bind(new.is_enabled)
        .bind(new.sort_order)
        .fetch_one(conn)
        .await
        .map_err(|e| ContentError::from_section_insert(e, &new.slug))
}

pub(crate) async fn insert_block(
    conn: &mut SqliteConnection,
    section_id: i64,
    new: &NewBlock,
) -> ContentResult<ContentBlock> {
    let sql = format!(
        r#"
        INSERT INTO content_blocks
            (section_id, title, subtitle, body, image, icon, button_text, button_url, layout, is_published, sort_order)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {BLOCK_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, ContentBlock>(&sql)
        .bind(section_id)
        .bind(&new.title)
        .bind(&new.subtitle)
        .bind(&new.body)
        .bind(&new.image)
        .bind(&new.icon)
        .bind(&new.button_text)
        .bind(&new.button_url)
        .bind(&new.layout)
        .bind(new.is_published)
        .bind(new.sort_order)
        .fetch_one(conn)
        .await?)
}

pub(crate) async fn insert_project(
    conn: &mut SqliteConnection,
    new: &NewProject,
) -> ContentResult<Project> {
    let sql = format!(
        r#"
        INSERT INTO projects
            (title, description, tags, image, link, code_link, is_published, sort_order)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {PROJECT_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, Project>(&sql)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.tags)
        .bind(&new.image)
        .bind(&new.link)
        .bind(&new.code_link)
        .bind(new.is_published)
        .bind(new.sort_order)
        .fetch_one(conn)
        .await?)
}

/// Delete every block, then every project, then every section
pub(crate) async fn clear_content(conn: &mut SqliteConnection) -> ContentResult<(u64, u64, u64)> {
    let blocks = sqlx::query("DELETE FROM content_blocks")
        .execute(&mut *conn)
        .await?
        .rows_affected();
    let projects = sqlx::query("DELETE FROM projects")
        .execute(&mut *conn)
        .await?
        .rows_affected();
    let sections = sqlx::query("DELETE FROM sections")
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok((sections, blocks, projects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::database::open_in_memory;

    async fn repo() -> ContentRepository {
        ContentRepository::new(open_in_memory().await.unwrap())
    }

    fn block(title: &str, sort_order: i64, is_published: bool) -> NewBlock {
        NewBlock {
            title: title.to_string(),
            sort_order,
            is_published,
            ..NewBlock::default()
        }
    }

    #[tokio::test]
    async fn enabled_sections_are_filtered_and_ordered() {
        let repo = repo().await;
        let contact = repo.create_section(&NewSection::new("Contact", "contact", 4)).await.unwrap();
        repo.create_section(&NewSection::new("About", "about", 1)).await.unwrap();
        repo.create_section(&NewSection::new("Hero", "hero", 0)).await.unwrap();
        repo.create_section(&NewSection::new("Services", "services", 1)).await.unwrap();
        repo.toggle_section_enabled(contact.id).await.unwrap();

        let slugs: Vec<String> = repo
            .list_enabled_sections()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.slug)
            .collect();
        assert_eq!(slugs, vec!["hero", "about", "services"]);
        assert_eq!(repo.list_sections().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn duplicate_slug_leaves_existing_section() {
        let repo = repo().await;
        let about = repo.create_section(&NewSection::new("About", "about", 0)).await.unwrap();

        let err = repo
            .create_section(&NewSection::new("Other", "about", 9))
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::DuplicateSlug(ref slug) if slug == "about"));

        let sections = repo.list_sections().await.unwrap();
        assert_eq!(sections, vec![about]);
    }

    #[tokio::test]
    async fn section_lookups_by_id_and_slug() {
        let repo = repo().await;
        let about = repo.create_section(&NewSection::new("About", "about", 0)).await.unwrap();

        assert_eq!(repo.get_section_by_slug("about").await.unwrap(), Some(about.clone()));
        assert_eq!(repo.get_section_by_slug("missing").await.unwrap(), None);
        assert_eq!(repo.get_section(about.id).await.unwrap(), about);
        assert!(matches!(
            repo.get_section(about.id + 1).await.unwrap_err(),
            ContentError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn toggle_flips_and_reports_missing() {
        let repo = repo().await;
        let about = repo.create_section(&NewSection::new("About", "about", 0)).await.unwrap();
        assert!(!repo.toggle_section_enabled(about.id).await.unwrap().is_enabled);
        assert!(repo.toggle_section_enabled(about.id).await.unwrap().is_enabled);
        assert!(repo.get_section(about.id).await.unwrap().is_enabled);

        let err = repo.toggle_section_enabled(999).await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound { entity: "Section", id: 999 }));
    }

    #[tokio::test]
    async fn published_blocks_are_scoped_and_filtered() {
        let repo = repo().await;
        let about = repo.create_section(&NewSection::new("About", "about", 0)).await.unwrap();
        let services = repo.create_section(&NewSection::new("Services", "services", 1)).await.unwrap();

        repo.create_block(about.id, &block("second", 1, true)).await.unwrap();
        repo.create_block(about.id, &block("hidden", 0, false)).await.unwrap();
        repo.create_block(about.id, &block("first", 0, true)).await.unwrap();
        repo.create_block(about.id, &block("tie", 1, true)).await.unwrap();
        repo.create_block(services.id, &block("elsewhere", 0, true)).await.unwrap();

        let titles: Vec<String> = repo
            .list_published_blocks(about.id)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "tie"]);
        assert_eq!(repo.list_blocks(about.id).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn create_block_requires_section() {
        let repo = repo().await;
        let err = repo.create_block(7, &NewBlock::default()).await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound { entity: "Section", id: 7 }));
        assert_eq!(repo.stats().await.unwrap().blocks, 0);
    }

    #[tokio::test]
    async fn delete_section_cascades_to_blocks() {
        let repo = repo().await;
        let about = repo.create_section(&NewSection::new("About", "about", 0)).await.unwrap();
        let services = repo.create_section(&NewSection::new("Services", "services", 1)).await.unwrap();
        repo.create_block(about.id, &block("a", 0, true)).await.unwrap();
        repo.create_block(about.id, &block("b", 1, false)).await.unwrap();
        repo.create_block(services.id, &block("c", 0, true)).await.unwrap();

        assert_eq!(repo.delete_section(about.id).await.unwrap(), 2);
        assert!(repo.list_published_blocks(about.id).await.unwrap().is_empty());
        assert!(matches!(
            repo.list_blocks(about.id).await.unwrap_err(),
            ContentError::NotFound { .. }
        ));
        assert_eq!(repo.list_published_blocks(services.id).await.unwrap().len(), 1);

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats, ContentStats { sections: 1, blocks: 1, projects: 0 });

        assert!(matches!(
            repo.delete_section(about.id).await.unwrap_err(),
            ContentError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn delete_block_reports_owner() {
        let repo = repo().await;
        let about = repo.create_section(&NewSection::new("About", "about", 0)).await.unwrap();
        let b = repo.create_block(about.id, &block("a", 0, true)).await.unwrap();

        assert_eq!(repo.delete_block(b.id).await.unwrap(), about.id);
        assert!(matches!(
            repo.delete_block(b.id).await.unwrap_err(),
            ContentError::NotFound { entity: "ContentBlock", .. }
        ));
    }

    #[tokio::test]
    async fn projects_are_filtered_ordered_and_deletable() {
        let repo = repo().await;
        let later = repo
            .create_project(&NewProject { title: "Later".into(), sort_order: 2, ..NewProject::default() })
            .await
            .unwrap();
        repo.create_project(&NewProject { title: "Draft".into(), is_published: false, ..NewProject::default() })
            .await
            .unwrap();
        repo.create_project(&NewProject { title: "First".into(), sort_order: 0, ..NewProject::default() })
            .await
            .unwrap();

        let titles: Vec<String> = repo
            .list_published_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["First", "Later"]);

        repo.delete_project(later.id).await.unwrap();
        assert_eq!(repo.list_projects().await.unwrap().len(), 2);
        assert!(matches!(
            repo.delete_project(later.id).await.unwrap_err(),
            ContentError::NotFound { entity: "Project", .. }
        ));
    }

    #[tokio::test]
    async fn public_page_pairs_sections_with_published_blocks() {
        let repo = repo().await;
        let about = repo.create_section(&NewSection::new("About", "about", 0)).await.unwrap();
        let hidden = repo.create_section(&NewSection::new("Hidden", "hidden", 1)).await.unwrap();
        repo.toggle_section_enabled(hidden.id).await.unwrap();
        repo.create_block(about.id, &block("shown", 0, true)).await.unwrap();
        repo.create_block(about.id, &block("draft", 1, false)).await.unwrap();
        repo.create_block(hidden.id, &block("never", 0, true)).await.unwrap();

        let page = repo.list_published_sections_with_blocks().await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].0.slug, "about");
        assert_eq!(page[0].1.len(), 1);
        assert_eq!(page[0].1[0].title, "shown");
    }
}
