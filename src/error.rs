/// Error taxonomy for content operations
///
/// NotFound and DuplicateSlug are recoverable validation failures surfaced to the
/// admin; MalformedDocument aborts an import before anything is touched; Storage
/// wraps any failure of the underlying database and is never retried.

use thiserror::Error;

/// Errors produced by the content core
#[derive(Debug, Error)]
pub enum ContentError {
    /// Referenced id does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Section slug already taken
    #[error("Slug already in use: {0}")]
    DuplicateSlug(String),

    /// Import payload could not be parsed or has the wrong shape
    #[error("Malformed snapshot document: {0}")]
    MalformedDocument(String),

    /// Underlying persistence failure
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl ContentError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ContentError::NotFound { entity, id }
    }

    /// Map a failed section insert, turning the slug unique violation into DuplicateSlug
    pub(crate) fn from_section_insert(err: sqlx::Error, slug: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ContentError::DuplicateSlug(slug.to_string())
            }
            _ => ContentError::Storage(err),
        }
    }
}

pub type ContentResult<T> = Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_entity() {
        assert_eq!(
            ContentError::not_found("Section", 7).to_string(),
            "Section not found: 7"
        );
        assert_eq!(
            ContentError::DuplicateSlug("about".into()).to_string(),
            "Slug already in use: about"
        );
    }

    #[test]
    fn non_constraint_errors_stay_storage() {
        let err = ContentError::from_section_insert(sqlx::Error::RowNotFound, "about");
        assert!(matches!(err, ContentError::Storage(_)));
    }
}
