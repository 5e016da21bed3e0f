use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::blog_service::{PostDetail, PostPage};
use crate::application::pagination::PageMeta;
use crate::domain::post::{CreatePostRequest, Post, PostPreview, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::comments::CommentDto;
use crate::presentation::middleware::auth::{AuthenticatedUser, MaybeAuthenticatedUser};

/// `?page=N`, 1-based. Out-of-range values are clamped, not rejected, and
/// anything that does not parse as a page number falls back to page 1.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct PageQuery {
    #[serde(default, deserialize_with = "lenient_page")]
    pub(crate) page: Option<u32>,
}

fn lenient_page<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) text: String,
    pub(crate) category_id: i64,
    pub(crate) location_id: Option<i64>,
    /// Omitted means "publish now"; a future date schedules the post.
    pub(crate) pub_date: Option<DateTime<Utc>>,
    pub(crate) is_published: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) text: String,
    pub(crate) category_id: i64,
    pub(crate) location_id: Option<i64>,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) author_id: i64,
    pub(crate) category_id: i64,
    pub(crate) location_id: Option<i64>,
    pub(crate) is_published: bool,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostPreviewDto {
    #[serde(flatten)]
    pub(crate) post: PostDto,
    pub(crate) comment_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PageMetaDto {
    pub(crate) page: u32,
    pub(crate) total_pages: u32,
    pub(crate) has_previous: bool,
    pub(crate) has_next: bool,
    pub(crate) total_items: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostPageDto {
    pub(crate) posts: Vec<PostPreviewDto>,
    pub(crate) page: PageMetaDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDetailDto {
    #[serde(flatten)]
    pub(crate) post: PostDto,
    pub(crate) comments: Vec<CommentDto>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            text: post.text,
            pub_date: post.pub_date,
            author_id: post.author_id,
            category_id: post.category_id,
            location_id: post.location_id,
            is_published: post.is_published,
            created_at: post.created_at,
        }
    }
}

impl From<PostPreview> for PostPreviewDto {
    fn from(preview: PostPreview) -> Self {
        Self {
            post: preview.post.into(),
            comment_count: preview.comment_count,
        }
    }
}

impl From<PageMeta> for PageMetaDto {
    fn from(meta: PageMeta) -> Self {
        Self {
            page: meta.page,
            total_pages: meta.total_pages,
            has_previous: meta.has_previous,
            has_next: meta.has_next,
            total_items: meta.total_items,
        }
    }
}

impl From<PostPage> for PostPageDto {
    fn from(page: PostPage) -> Self {
        Self {
            posts: page.items.into_iter().map(PostPreviewDto::from).collect(),
            page: page.meta.into(),
        }
    }
}

impl From<PostDetail> for PostDetailDto {
    fn from(detail: PostDetail) -> Self {
        Self {
            post: detail.post.into(),
            comments: detail.comments.into_iter().map(CommentDto::from).collect(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "posts",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number, clamped to range")
    ),
    responses(
        (status = 200, description = "Publicly visible posts, newest first", body = PostPageDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn home_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PostPageDto>> {
    let page = query.page.unwrap_or(1);
    let result = state.blog_service.home_page(page, state.page_size).await?;

    Ok(Json(PostPageDto::from(result)))
}

#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post with its comments", body = PostDetailDto),
        (status = 401, description = "Malformed bearer token"),
        (status = 404, description = "Post not found or not visible"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    viewer: MaybeAuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDetailDto>> {
    let result = state.blog_service.post_detail(id, viewer.user_id()).await?;

    Ok(Json(PostDetailDto::from(result)))
}

#[utoipa::path(
    post,
    path = "/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found or unpublished"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = CreatePostRequest {
        title: dto.title,
        text: dto.text,
        category_id: dto.category_id,
        location_id: dto.location_id,
        pub_date: dto.pub_date,
        is_published: dto.is_published.unwrap_or(true),
    };

    let result = state.blog_service.create_post(auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(result))))
}

#[utoipa::path(
    put,
    path = "/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 303, description = "Requester is not the author; redirected to the post"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(dto): Json<UpdatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = UpdatePostRequest {
        title: dto.title,
        text: dto.text,
        category_id: dto.category_id,
        location_id: dto.location_id,
        pub_date: dto.pub_date,
        is_published: dto.is_published,
    };

    let result = state
        .blog_service
        .update_post(auth.user_id, id, req)
        .await?;
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 303, description = "Requester is not the author; redirected to the post"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.blog_service.delete_post(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::extract::Query;
    use axum::http::Uri;

    use super::PageQuery;

    fn page_from(uri: &str) -> Option<u32> {
        let uri: Uri = uri.parse().expect("uri must parse");
        let query: Query<PageQuery> = Query::try_from_uri(&uri).expect("query must deserialize");
        query.page
    }

    #[test]
    fn page_query_parses_plain_numbers() {
        assert_eq!(page_from("/?page=2"), Some(2));
        assert_eq!(page_from("/"), None);
    }

    #[test]
    fn page_query_falls_back_on_garbage_instead_of_rejecting() {
        assert_eq!(page_from("/?page=abc"), None);
        assert_eq!(page_from("/?page=-3"), None);
        assert_eq!(page_from("/?page="), None);
    }
}
