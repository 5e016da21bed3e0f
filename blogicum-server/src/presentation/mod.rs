use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::comment_service::CommentService;
use crate::application::profile_service::ProfileService;
use crate::data::repositories::postgres::category_repository::PostgresCategoryRepository;
use crate::data::repositories::postgres::comment_repository::PostgresCommentRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

type PgBlogService =
    BlogService<PostgresPostRepository, PostgresCategoryRepository, PostgresCommentRepository>;
type PgCommentService = CommentService<PostgresPostRepository, PostgresCommentRepository>;
type PgProfileService = ProfileService<PostgresUserRepository, PostgresPostRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService<PostgresUserRepository>>,
    pub(crate) blog_service: Arc<PgBlogService>,
    pub(crate) comment_service: Arc<PgCommentService>,
    pub(crate) profile_service: Arc<PgProfileService>,
    pub(crate) jwt: Arc<JwtService>,
    /// Listing page size from settings.
    pub(crate) page_size: u32,
}
