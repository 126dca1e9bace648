/// Rating eligibility route.
mod can_rate;

/// Rating creation route.
mod create;

/// Association rating listing route.
mod list;

/// Rating update route.
mod update;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use crate::{auth, state::AppState};

pub(crate) fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/association/:id", get(list::list));

    let authenticated = Router::new()
        .route("/canRate/:association_id", get(can_rate::can_rate))
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::require_authentication::<false, false, _>,
        ));

    let volunteer = Router::new()
        .route("/", post(create::create))
        .route("/:id", put(update::update))
        .route_layer(from_fn_with_state(
            state,
            auth::require_authentication::<false, true, _>,
        ));

    public.merge(authenticated).merge(volunteer)
}
