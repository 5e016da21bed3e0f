use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::repositories::postgres::map_db_error;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    author_id: i64,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            author_id: row.author_id,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

const COMMENT_COLUMNS: &str = "id, post_id, author_id, text, created_at";

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "INSERT INTO comments (post_id, author_id, text) \
             VALUES ($1, $2, $3) \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(input.post_id)
        .bind(input.author_id)
        .bind(&input.text)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.into())
    }

    async fn get_comment_for_post(
        &self,
        comment_id: i64,
        post_id: i64,
    ) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1 AND post_id = $2"
        ))
        .bind(comment_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Comment::from))
    }

    async fn update_comment_text(
        &self,
        comment_id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "UPDATE comments SET text = $2 WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(comment_id)
        .bind(&text)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Comment::from))
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE post_id = $1 \
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
