/// Password reset request route.
mod forgot_password;

/// User authentication route.
mod login;

/// Volunteer registration route.
mod register;

/// Association registration route.
mod register_association;

/// Password reset completion route.
mod reset_password;

use axum::{routing::post, Router};

use crate::state::AppState;

/// Create a router that provides an API server with authentication routes.
pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register::register))
        .route(
            "/registerAssociation",
            post(register_association::register_association),
        )
        .route("/login", post(login::login))
        .route("/forgotPassword", post(forgot_password::forgot_password))
        .route("/resetPassword", post(reset_password::reset_password))
}
