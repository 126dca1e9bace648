/// Association details route.
mod details;

/// Association listing route.
mod list;

use axum::{routing::get, Router};

use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list))
        .route("/:id", get(details::details))
}
