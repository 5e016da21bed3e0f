use std::sync::Arc;

use anyhow::Result;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::auth_service::AuthService;
use application::blog_service::BlogService;
use application::comment_service::CommentService;
use application::profile_service::ProfileService;
use data::repositories::postgres::category_repository::PostgresCategoryRepository;
use data::repositories::postgres::comment_repository::PostgresCommentRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url).await?;
    run_migrations(&pool).await?;

    let post_repo = PostgresPostRepository::new(pool.clone());
    let category_repo = PostgresCategoryRepository::new(pool.clone());
    let comment_repo = PostgresCommentRepository::new(pool.clone());
    let user_repo = PostgresUserRepository::new(pool.clone());

    let jwt = Arc::new(JwtService::new(
        &settings.jwt_secret,
        settings.jwt_ttl_seconds,
    ));

    let state = AppState {
        auth_service: Arc::new(AuthService::new(
            user_repo.clone(),
            JwtService::new(&settings.jwt_secret, settings.jwt_ttl_seconds),
        )),
        blog_service: Arc::new(BlogService::new(
            post_repo.clone(),
            category_repo,
            comment_repo.clone(),
        )),
        comment_service: Arc::new(CommentService::new(post_repo.clone(), comment_repo)),
        profile_service: Arc::new(ProfileService::new(user_repo, post_repo)),
        jwt,
        page_size: settings.page_size,
    };

    server::run_http(&settings, state).await
}
