use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::comment::{Comment, CommentRequest};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CommentFormDto {
    #[validate(length(min = 1))]
    pub(crate) text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) text: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/posts/{id}/comments",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = CommentFormDto,
    responses(
        (status = 201, description = "Comment created", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found or not visible"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn add_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(post_id): Path<i64>,
    Json(dto): Json<CommentFormDto>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    dto.validate()?;
    let req = CommentRequest { text: dto.text };

    let comment = state
        .comment_service
        .add_comment(auth.user_id, post_id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentDto::from(comment))))
}

#[utoipa::path(
    put,
    path = "/posts/{id}/comments/{comment_id}",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    request_body = CommentFormDto,
    responses(
        (status = 200, description = "Comment updated", body = CommentDto),
        (status = 303, description = "Requester is not the author; redirected to the post"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Comment not found under this post"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn edit_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
    Json(dto): Json<CommentFormDto>,
) -> AppResult<Json<CommentDto>> {
    dto.validate()?;
    let req = CommentRequest { text: dto.text };

    let comment = state
        .comment_service
        .edit_comment(auth.user_id, post_id, comment_id, req)
        .await?;
    Ok(Json(CommentDto::from(comment)))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}/comments/{comment_id}",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 303, description = "Deleted (or rejected as non-author); redirected to the post"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Comment not found under this post"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<Redirect> {
    state
        .comment_service
        .delete_comment(auth.user_id, post_id, comment_id)
        .await?;

    // The original flow lands back on the post's detail page.
    Ok(Redirect::to(&format!("/posts/{post_id}")))
}
