use async_trait::async_trait;

use crate::domain::category::Category;
use crate::domain::error::DomainError;

#[async_trait]
pub(crate) trait CategoryRepository: Send + Sync {
    /// Category pages and post forms only ever see published categories.
    async fn get_published_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError>;

    async fn get_published_by_id(&self, id: i64) -> Result<Option<Category>, DomainError>;
}
