use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    /// Mutation attempted by someone other than the record's author.
    /// Answered with a redirect to the post's detail page, never an error.
    #[error("actor does not own the record under post {post_id}")]
    NotOwner { post_id: i64 },

    #[error("actor does not own this profile")]
    NotProfileOwner,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}
