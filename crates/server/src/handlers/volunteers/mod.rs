/// Event join route.
mod join;

/// Event leave route.
mod leave;

/// Roster listing route.
mod list;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};

use crate::{auth, state::AppState};

pub(crate) fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/:id/volunteers", get(list::list));

    let volunteer = Router::new()
        .route("/:id/join", post(join::join))
        .route("/:id/leave", delete(leave::leave))
        .route_layer(from_fn_with_state(
            state,
            auth::require_authentication::<false, true, _>,
        ));

    public.merge(volunteer)
}
