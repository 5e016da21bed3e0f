pub(crate) mod category_repository;
pub(crate) mod comment_repository;
pub(crate) mod post_repository;
pub(crate) mod user_repository;

use crate::domain::error::DomainError;

/// Postgres error codes the repositories translate into domain errors.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub(crate) fn map_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                return DomainError::AlreadyExists(
                    db_err.constraint().unwrap_or("record").to_string(),
                );
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return DomainError::NotFound(
                    db_err.constraint().unwrap_or("referenced record").to_string(),
                );
            }
            _ => {}
        }
    }
    DomainError::Unexpected(err.to_string())
}
