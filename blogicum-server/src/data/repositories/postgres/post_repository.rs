use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::data::post_repository::{
    NewPost, PageSlice, PostPatch, PostRepository, PostWithCategory,
};
use crate::data::repositories::postgres::map_db_error;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostPreview};

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    title: String,
    text: String,
    pub_date: DateTime<Utc>,
    author_id: i64,
    category_id: i64,
    location_id: Option<i64>,
    is_published: bool,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct PostCategoryRow {
    id: i64,
    title: String,
    text: String,
    pub_date: DateTime<Utc>,
    author_id: i64,
    category_id: i64,
    location_id: Option<i64>,
    is_published: bool,
    created_at: DateTime<Utc>,
    category_is_published: bool,
}

#[derive(FromRow)]
struct PostPreviewRow {
    id: i64,
    title: String,
    text: String,
    pub_date: DateTime<Utc>,
    author_id: i64,
    category_id: i64,
    location_id: Option<i64>,
    is_published: bool,
    created_at: DateTime<Utc>,
    comment_count: i64,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            text: row.text,
            pub_date: row.pub_date,
            author_id: row.author_id,
            category_id: row.category_id,
            location_id: row.location_id,
            is_published: row.is_published,
            created_at: row.created_at,
        }
    }
}

impl From<PostCategoryRow> for PostWithCategory {
    fn from(row: PostCategoryRow) -> Self {
        Self {
            post: Post {
                id: row.id,
                title: row.title,
                text: row.text,
                pub_date: row.pub_date,
                author_id: row.author_id,
                category_id: row.category_id,
                location_id: row.location_id,
                is_published: row.is_published,
                created_at: row.created_at,
            },
            category_is_published: row.category_is_published,
        }
    }
}

impl From<PostPreviewRow> for PostPreview {
    fn from(row: PostPreviewRow) -> Self {
        Self {
            post: Post {
                id: row.id,
                title: row.title,
                text: row.text,
                pub_date: row.pub_date,
                author_id: row.author_id,
                category_id: row.category_id,
                location_id: row.location_id,
                is_published: row.is_published,
                created_at: row.created_at,
            },
            comment_count: row.comment_count,
        }
    }
}

const POST_COLUMNS: &str = "id, title, text, pub_date, author_id, category_id, \
     location_id, is_published, created_at";

/// Preview listing: post columns plus the comment count, with the public
/// visibility predicate left to the caller's WHERE clause.
const PREVIEW_SELECT: &str = "\
    SELECT p.id, p.title, p.text, p.pub_date, p.author_id, p.category_id, \
           p.location_id, p.is_published, p.created_at, \
           COUNT(c.id) AS comment_count \
    FROM posts p \
    JOIN categories cat ON cat.id = p.category_id \
    LEFT JOIN comments c ON c.post_id = p.id";

const PREVIEW_GROUP_ORDER: &str = "\
    GROUP BY p.id \
    ORDER BY p.pub_date DESC, p.id DESC \
    LIMIT $1 OFFSET $2";

const PUBLIC_PREDICATE: &str =
    "p.is_published AND p.pub_date <= $3 AND cat.is_published";

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "INSERT INTO posts (title, text, pub_date, author_id, category_id, \
                 location_id, is_published) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(&input.title)
        .bind(&input.text)
        .bind(input.pub_date)
        .bind(input.author_id)
        .bind(input.category_id)
        .bind(input.location_id)
        .bind(input.is_published)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.into())
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Post::from))
    }

    async fn get_post_with_category(
        &self,
        id: i64,
    ) -> Result<Option<PostWithCategory>, DomainError> {
        let row = sqlx::query_as::<_, PostCategoryRow>(
            "SELECT p.id, p.title, p.text, p.pub_date, p.author_id, p.category_id, \
                 p.location_id, p.is_published, p.created_at, \
                 cat.is_published AS category_is_published \
             FROM posts p \
             JOIN categories cat ON cat.id = p.category_id \
             WHERE p.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(PostWithCategory::from))
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE posts \
             SET title = $2, text = $3, pub_date = $4, category_id = $5, \
                 location_id = $6, is_published = $7 \
             WHERE id = $1 \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.text)
        .bind(patch.pub_date)
        .bind(patch.category_id)
        .bind(patch.location_id)
        .bind(patch.is_published)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Post::from))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_published(
        &self,
        slice: PageSlice,
        now: DateTime<Utc>,
    ) -> Result<Vec<PostPreview>, DomainError> {
        let rows = sqlx::query_as::<_, PostPreviewRow>(&format!(
            "{PREVIEW_SELECT} WHERE {PUBLIC_PREDICATE} {PREVIEW_GROUP_ORDER}"
        ))
        .bind(slice.limit)
        .bind(slice.offset)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(PostPreview::from).collect())
    }

    async fn count_published(&self, now: DateTime<Utc>) -> Result<i64, DomainError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM posts p \
             JOIN categories cat ON cat.id = p.category_id \
             WHERE p.is_published AND p.pub_date <= $1 AND cat.is_published",
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    async fn list_published_in_category(
        &self,
        category_id: i64,
        slice: PageSlice,
        now: DateTime<Utc>,
    ) -> Result<Vec<PostPreview>, DomainError> {
        let rows = sqlx::query_as::<_, PostPreviewRow>(&format!(
            "{PREVIEW_SELECT} WHERE {PUBLIC_PREDICATE} AND p.category_id = $4 \
             {PREVIEW_GROUP_ORDER}"
        ))
        .bind(slice.limit)
        .bind(slice.offset)
        .bind(now)
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(PostPreview::from).collect())
    }

    async fn count_published_in_category(
        &self,
        category_id: i64,
        now: DateTime<Utc>,
    ) -> Result<i64, DomainError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM posts p \
             JOIN categories cat ON cat.id = p.category_id \
             WHERE p.is_published AND p.pub_date <= $1 AND cat.is_published \
               AND p.category_id = $2",
        )
        .bind(now)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    async fn list_by_author(
        &self,
        author_id: i64,
        slice: PageSlice,
    ) -> Result<Vec<PostPreview>, DomainError> {
        let rows = sqlx::query_as::<_, PostPreviewRow>(&format!(
            "{PREVIEW_SELECT} WHERE p.author_id = $3 {PREVIEW_GROUP_ORDER}"
        ))
        .bind(slice.limit)
        .bind(slice.offset)
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(PostPreview::from).collect())
    }

    async fn count_by_author(&self, author_id: i64) -> Result<i64, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count)
    }
}
