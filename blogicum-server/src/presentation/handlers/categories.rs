use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::blog_service::CategoryPage;
use crate::domain::category::Category;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::posts::{PageMetaDto, PageQuery, PostPreviewDto};

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryDto {
    pub(crate) id: i64,
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) description: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryPageDto {
    pub(crate) category: CategoryDto,
    pub(crate) posts: Vec<PostPreviewDto>,
    pub(crate) page: PageMetaDto,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            slug: category.slug,
            title: category.title,
            description: category.description,
        }
    }
}

impl From<CategoryPage> for CategoryPageDto {
    fn from(page: CategoryPage) -> Self {
        Self {
            category: page.category.into(),
            posts: page
                .posts
                .items
                .into_iter()
                .map(PostPreviewDto::from)
                .collect(),
            page: page.posts.meta.into(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/category/{slug}",
    tag = "posts",
    params(
        ("slug" = String, Path, description = "Category slug"),
        ("page" = Option<u32>, Query, description = "1-based page number, clamped to range")
    ),
    responses(
        (status = 200, description = "Category with its visible posts", body = CategoryPageDto),
        (status = 404, description = "Category not found or unpublished"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn category_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<CategoryPageDto>> {
    let page = query.page.unwrap_or(1);
    let result = state
        .blog_service
        .category_page(&slug, page, state.page_size)
        .await?;

    Ok(Json(CategoryPageDto::from(result)))
}
