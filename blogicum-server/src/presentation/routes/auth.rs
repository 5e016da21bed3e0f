use axum::{Router, routing::post};

use crate::presentation::AppState;
use crate::presentation::handlers::auth::{login, register};

/// `/auth` routes. Both are public; the tokens issued here gate the
/// protected post, comment and profile routes.
pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
