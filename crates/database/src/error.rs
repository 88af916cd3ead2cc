use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Query(sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DatabaseError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound(format!("{} with id {} not found", entity, id))
    }

    pub fn duplicate(entity: &str, field: &str) -> Self {
        Self::DuplicateEntry(format!("{} with {} already exists", entity, field))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unique key").to_string();
                return Self::DuplicateEntry(constraint);
            }
        }
        Self::Query(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers() {
        let err = DatabaseError::not_found("Project", "42");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Entity not found: Project with id 42 not found");

        let err = DatabaseError::duplicate("Project", "name");
        assert!(matches!(err, DatabaseError::DuplicateEntry(_)));
    }

    #[test]
    fn test_row_not_found_is_query_error() {
        let err: DatabaseError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DatabaseError::Query(_)));
    }
}
