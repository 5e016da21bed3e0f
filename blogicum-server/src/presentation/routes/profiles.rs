use axum::Router;
use axum::middleware;
use axum::routing::{get, put};

use crate::presentation::AppState;
use crate::presentation::handlers::profiles::{get_profile, update_profile};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/{username}", get(get_profile));

    let protected = Router::new()
        .route("/{username}", put(update_profile))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
