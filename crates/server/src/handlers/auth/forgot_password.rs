use axum::{extract::State, Json};
use axum_derive_error::ErrorResponse;
use db::{
    user, ActiveModelTrait, ActiveValue, ColumnTrait, DbErr, EntityTrait, IntoActiveModel, QueryFilter,
    TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::warn;

use crate::state::AppState;

/// Lifetime of a password reset token.
const RESET_TOKEN_LIFESPAN: Duration = Duration::hours(1);

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ForgotPasswordError {
    DatabaseError(DbErr),
}

#[derive(Deserialize)]
pub(super) struct ForgotPasswordRequest {
    email: String,
}

#[derive(Serialize)]
pub(super) struct ForgotPasswordResponse {
    message: &'static str,
}

/// Password reset request handler.
///
/// Responds identically whether or not the email matches an account.
/// Delivery failures are logged and swallowed for the same reason.
pub(super) async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, ForgotPasswordError> {
    let expires_at = state.clock.now_naive() + RESET_TOKEN_LIFESPAN;

    let matched = state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let Some(user) = user::Entity::find()
                    .filter(user::Column::Email.eq(&*request.email))
                    .one(txn)
                    .await?
                else {
                    return Ok(None);
                };

                let reset_token = user::generate_reset_token();
                let email = user.email.clone();
                let greeting_name = user.display_name();

                let mut active = user.into_active_model();
                active.reset_token = ActiveValue::Set(Some(reset_token.clone()));
                active.reset_token_expires_at = ActiveValue::Set(Some(expires_at));
                active.update(txn).await?;

                Ok::<_, DbErr>(Some((email, greeting_name, reset_token)))
            })
        })
        .await
        .into_raw_result()?;

    if let Some((email, greeting_name, reset_token)) = matched {
        let base_url = state
            .config
            .frontend
            .as_ref()
            .map(|frontend| frontend.base_url.as_str())
            .unwrap_or("http://localhost:5173");

        let link = format!("{base_url}/resetPassword?token={reset_token}");
        let body = format!(
            "<p>Hello {greeting_name},</p>\
             <p>A password reset was requested for your account.</p>\
             <p><a href=\"{link}\">Reset your password</a> within one hour.</p>"
        );

        if let Err(err) = state.mailer.send(&email, "Password reset", &body).await {
            warn!(%err, "unable to deliver password reset mail");
        }
    }

    Ok(Json(ForgotPasswordResponse {
        message: "if the email is registered, a reset link has been sent",
    }))
}
