/// Event creation route.
mod create;

/// Event deactivation route.
mod deactivate;

/// Event details route.
mod details;

/// Event listing route.
mod list;

/// Event update route.
mod update;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use axum_derive_error::ErrorResponse;
use db::DbErr;
use derive_more::{Display, Error, From};

use crate::{auth, state::AppState};

use axum::http::StatusCode;

/// Errors shared by the owner-scoped event routes.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum EventOwnershipError {
    DatabaseError(DbErr),

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "event not found")]
    EventNotFound,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "event belongs to another association")]
    NotEventOwner,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "an association account is required")]
    AssociationRequired,
}

pub(crate) fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list::list))
        .route("/:id", get(details::details));

    let owned = Router::new()
        .route("/", post(create::create))
        .route("/:id", put(update::update).delete(deactivate::deactivate))
        .route_layer(from_fn_with_state(
            state,
            auth::require_authentication::<true, false, _>,
        ));

    public.merge(owned)
}
