use axum::Router;
use axum::routing::get;

use super::AppState;
use crate::presentation::handlers::categories::category_page;
use crate::presentation::handlers::posts::home_page;

pub(crate) mod auth;
pub(crate) mod posts;
pub(crate) mod profiles;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(home_page))
        .route("/category/{slug}", get(category_page))
        .nest("/auth", auth::router())
        .nest("/posts", posts::router(state.clone()))
        .nest("/profile", profiles::router(state))
}
