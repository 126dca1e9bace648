use axum::{extract::State, http::StatusCode, Json};
use axum_derive_error::ErrorResponse;
use db::{
    user, ActiveModelTrait, ActiveValue, ColumnTrait, DbErr, EntityTrait, IntoActiveModel, QueryFilter,
    TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{passwords, state::AppState, validation::ValidatedJson};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ResetPasswordError {
    DatabaseError(DbErr),

    #[display(fmt = "unable to hash the provided password")]
    PasswordHashError,

    #[status(StatusCode::BAD_REQUEST)]
    #[display(fmt = "invalid or expired reset token")]
    InvalidResetToken,
}

#[derive(Deserialize, Validate)]
pub(super) struct ResetPasswordRequest {
    token: String,

    #[validate(length(min = 6))]
    password: String,
}

#[derive(Serialize)]
pub(super) struct ResetPasswordResponse {
    message: &'static str,
}

/// Password reset completion handler.
///
/// Consumes the token: a successful reset clears it, so the same link
/// cannot be replayed.
pub(super) async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>, ResetPasswordError> {
    let now = state.clock.now_naive();

    let password = passwords::hash(&request.password)
        .map_err(|_| ResetPasswordError::PasswordHashError)?;

    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let user = user::Entity::find()
                    .filter(user::Column::ResetToken.eq(&*request.token))
                    .one(txn)
                    .await?
                    .ok_or(ResetPasswordError::InvalidResetToken)?;

                let valid = user
                    .reset_token_expires_at
                    .map(|expires_at| expires_at > now)
                    .unwrap_or(false);

                if !valid {
                    return Err(ResetPasswordError::InvalidResetToken);
                }

                let mut active = user.into_active_model();
                active.password = ActiveValue::Set(password);
                active.reset_token = ActiveValue::Set(None);
                active.reset_token_expires_at = ActiveValue::Set(None);
                active.update(txn).await?;

                Ok(Json(ResetPasswordResponse {
                    message: "password has been reset",
                }))
            })
        })
        .await
        .into_raw_result()
}
