use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{
    user, ActiveModelTrait, ActiveValue, DbErr, EntityTrait, IntoActiveModel, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{auth::AuthenticatedUser, passwords, state::AppState, validation::ValidatedJson};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum PasswordChangeError {
    DatabaseError(DbErr),

    #[display(fmt = "unable to hash the provided password")]
    PasswordHashError,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "user doesn't exist")]
    NonExistentUser,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "current password doesn't match")]
    InvalidCurrentPassword,
}

#[derive(Deserialize, Validate)]
pub(super) struct PasswordChangeRequest {
    current_password: String,

    #[validate(length(min = 6))]
    new_password: String,
}

#[derive(Serialize)]
pub(super) struct PasswordChangeResponse {
    message: &'static str,
}

pub(super) async fn update(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PasswordChangeRequest>,
) -> Result<Json<PasswordChangeResponse>, PasswordChangeError> {
    let password = passwords::hash(&request.new_password)
        .map_err(|_| PasswordChangeError::PasswordHashError)?;

    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let user = user::Entity::find_by_id(current_user.id())
                    .one(txn)
                    .await?
                    .ok_or(PasswordChangeError::NonExistentUser)?;

                if !passwords::verify(&request.current_password, &user.password) {
                    return Err(PasswordChangeError::InvalidCurrentPassword);
                }

                let mut active = user.into_active_model();
                active.password = ActiveValue::Set(password);
                active.update(txn).await?;

                Ok(Json(PasswordChangeResponse {
                    message: "password has been changed",
                }))
            })
        })
        .await
        .into_raw_result()
}
