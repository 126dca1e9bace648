use axum::{extract::State, http::StatusCode, Json};
use axum_derive_error::ErrorResponse;
use db::{
    association, token, user, ActiveValue, ColumnTrait, DbErr, EntityTrait, QueryFilter,
    QuerySelect, SelectExt, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{passwords, state::AppState, validation::ValidatedJson};

/// Errors that may occur during the association registration process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum AssociationRegistrationError {
    DatabaseError(DbErr),

    #[display(fmt = "unable to hash the provided password")]
    PasswordHashError,

    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "an account with this email already exists")]
    EmailTaken,

    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "an association with this CIF already exists")]
    CifTaken,
}

#[derive(Deserialize, Validate)]
pub(super) struct AssociationRegistrationRequest {
    #[validate(email)]
    email: String,

    #[validate(length(min = 6))]
    password: String,

    #[validate(length(min = 1))]
    name: String,

    #[validate(regex(path = "crate::validation::CIF_PATTERN"))]
    cif: String,

    description: String,

    #[validate(email)]
    contact_email: String,

    image_url: Option<String>,
    website_url: Option<String>,
    social_media_url: Option<String>,
    contact_phone: Option<String>,
}

#[derive(Serialize)]
pub(super) struct AssociationRegistrationResponse {
    token: String,
    user_id: i64,
    association: association::Model,
}

/// Association registration handler.
///
/// The owning user account and its association profile are created
/// all-or-nothing: a duplicate email or CIF aborts the transaction
/// before either row is visible.
pub(super) async fn register_association(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AssociationRegistrationRequest>,
) -> Result<(StatusCode, Json<AssociationRegistrationResponse>), AssociationRegistrationError> {
    let now = state.clock.now_naive();

    let password = passwords::hash(&request.password)
        .map_err(|_| AssociationRegistrationError::PasswordHashError)?;

    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let email_taken = user::Entity::find()
                    .select_only()
                    .filter(user::Column::Email.eq(&*request.email))
                    .exists(txn)
                    .await?;

                if email_taken {
                    return Err(AssociationRegistrationError::EmailTaken);
                }

                let cif_taken = association::Entity::find()
                    .select_only()
                    .filter(association::Column::Cif.eq(&*request.cif))
                    .exists(txn)
                    .await?;

                if cif_taken {
                    return Err(AssociationRegistrationError::CifTaken);
                }

                let user = user::Entity::insert(user::ActiveModel {
                    email: ActiveValue::Set(request.email),
                    password: ActiveValue::Set(password),
                    is_active: ActiveValue::Set(true),
                    created_at: ActiveValue::Set(now),
                    ..Default::default()
                })
                .exec_with_returning(txn)
                .await?;

                let association = association::Entity::insert(association::ActiveModel {
                    name: ActiveValue::Set(request.name),
                    cif: ActiveValue::Set(request.cif),
                    description: ActiveValue::Set(request.description),
                    contact_email: ActiveValue::Set(request.contact_email),
                    image_url: ActiveValue::Set(request.image_url),
                    website_url: ActiveValue::Set(request.website_url),
                    social_media_url: ActiveValue::Set(request.social_media_url),
                    contact_phone: ActiveValue::Set(request.contact_phone),
                    user_id: ActiveValue::Set(user.id),
                    ..Default::default()
                })
                .exec_with_returning(txn)
                .await?;

                let (model, token) = token::generate_token(user.id);

                token::Entity::insert(model)
                    .exec_without_returning(txn)
                    .await?;

                Ok((
                    StatusCode::CREATED,
                    Json(AssociationRegistrationResponse {
                        token,
                        user_id: user.id,
                        association,
                    }),
                ))
            })
        })
        .await
        .into_raw_result()
}
