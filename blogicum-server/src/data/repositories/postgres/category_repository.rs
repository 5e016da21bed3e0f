use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::data::category_repository::CategoryRepository;
use crate::data::repositories::postgres::map_db_error;
use crate::domain::category::Category;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CategoryRow {
    id: i64,
    slug: String,
    title: String,
    description: String,
    is_published: bool,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            description: row.description,
            is_published: row.is_published,
            created_at: row.created_at,
        }
    }
}

const CATEGORY_COLUMNS: &str = "id, slug, title, description, is_published, created_at";

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn get_published_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = $1 AND is_published"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Category::from))
    }

    async fn get_published_by_id(&self, id: i64) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1 AND is_published"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Category::from))
    }
}
