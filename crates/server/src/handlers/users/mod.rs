/// Password change route.
mod password;

/// Profile update route.
mod profile;

use axum::{middleware::from_fn_with_state, routing::put, Router};

use crate::{auth, state::AppState};

pub(crate) fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/profile", put(profile::update))
        .route("/password", put(password::update))
        .route_layer(from_fn_with_state(
            state,
            auth::require_authentication::<false, false, _>,
        ))
}
