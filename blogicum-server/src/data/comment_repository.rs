use async_trait::async_trait;

use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) text: String,
}

#[async_trait]
pub(crate) trait CommentRepository: Send + Sync {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError>;

    /// Fetch a comment scoped to its post; a comment id paired with the
    /// wrong post id is treated as missing.
    async fn get_comment_for_post(
        &self,
        comment_id: i64,
        post_id: i64,
    ) -> Result<Option<Comment>, DomainError>;

    async fn update_comment_text(
        &self,
        comment_id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError>;

    async fn delete_comment(&self, comment_id: i64) -> Result<bool, DomainError>;

    /// All comments under a post, oldest first.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError>;
}
