use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostPreview};

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) author_id: i64,
    pub(crate) category_id: i64,
    pub(crate) location_id: Option<i64>,
    pub(crate) is_published: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) category_id: i64,
    pub(crate) location_id: Option<i64>,
    pub(crate) is_published: bool,
}

/// LIMIT/OFFSET slice computed by the pagination helper.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PageSlice {
    pub(crate) limit: i64,
    pub(crate) offset: i64,
}

/// A post joined with its category's published flag, so callers can apply
/// [`Post::is_visible_to`] instead of re-stating the predicate in SQL.
#[derive(Debug, Clone)]
pub(crate) struct PostWithCategory {
    pub(crate) post: Post,
    pub(crate) category_is_published: bool,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;

    /// Fetch by id with no visibility filtering. Used by the ownership guard.
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;

    /// Fetch by id with the parent category's published flag and no
    /// visibility filtering. Detail views run the visibility check in the
    /// service, through the domain predicate.
    async fn get_post_with_category(
        &self,
        id: i64,
    ) -> Result<Option<PostWithCategory>, DomainError>;

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError>;

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;

    /// Publicly visible posts at `now`, newest `pub_date` first.
    async fn list_published(
        &self,
        slice: PageSlice,
        now: DateTime<Utc>,
    ) -> Result<Vec<PostPreview>, DomainError>;

    async fn count_published(&self, now: DateTime<Utc>) -> Result<i64, DomainError>;

    async fn list_published_in_category(
        &self,
        category_id: i64,
        slice: PageSlice,
        now: DateTime<Utc>,
    ) -> Result<Vec<PostPreview>, DomainError>;

    async fn count_published_in_category(
        &self,
        category_id: i64,
        now: DateTime<Utc>,
    ) -> Result<i64, DomainError>;

    /// Everything the author wrote, drafts and scheduled posts included.
    async fn list_by_author(
        &self,
        author_id: i64,
        slice: PageSlice,
    ) -> Result<Vec<PostPreview>, DomainError>;

    async fn count_by_author(&self, author_id: i64) -> Result<i64, DomainError>;
}
