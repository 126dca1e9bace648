use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{
    user, ActiveModelTrait, ActiveValue, DbErr, EntityTrait, IntoActiveModel, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{auth::AuthenticatedUser, state::AppState, validation::ValidatedJson};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ProfileUpdateError {
    DatabaseError(DbErr),

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "user doesn't exist")]
    NonExistentUser,
}

/// Fields absent from the request are left unchanged.
#[derive(Deserialize, Validate)]
pub(super) struct ProfileUpdateRequest {
    #[validate(length(min = 1))]
    name: Option<String>,

    #[validate(length(min = 1))]
    lastname: Option<String>,

    phone: Option<String>,
    profile_image: Option<String>,
}

#[derive(Serialize)]
pub(super) struct ProfileResponse {
    id: i64,
    email: String,
    name: Option<String>,
    lastname: Option<String>,
    phone: Option<String>,
    profile_image: Option<String>,
}

pub(super) async fn update(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ProfileUpdateRequest>,
) -> Result<Json<ProfileResponse>, ProfileUpdateError> {
    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let user = user::Entity::find_by_id(current_user.id())
                    .one(txn)
                    .await?
                    .ok_or(ProfileUpdateError::NonExistentUser)?;

                let mut active = user.into_active_model();

                if let Some(name) = request.name {
                    active.name = ActiveValue::Set(Some(name));
                }

                if let Some(lastname) = request.lastname {
                    active.lastname = ActiveValue::Set(Some(lastname));
                }

                if let Some(phone) = request.phone {
                    active.phone = ActiveValue::Set(Some(phone));
                }

                if let Some(profile_image) = request.profile_image {
                    active.profile_image = ActiveValue::Set(Some(profile_image));
                }

                let user = active.update(txn).await?;

                Ok(Json(ProfileResponse {
                    id: user.id,
                    email: user.email,
                    name: user.name,
                    lastname: user.lastname,
                    phone: user.phone,
                    profile_image: user.profile_image,
                }))
            })
        })
        .await
        .into_raw_result()
}
