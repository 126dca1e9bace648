use axum::{extract::State, http::StatusCode, Json};
use axum_derive_error::ErrorResponse;
use db::{
    association, token, user, ColumnTrait, DbErr, EntityTrait, QueryFilter, TransactionErrorExt,
    TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};

use crate::{passwords, state::AppState};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum UserAuthenticationError {
    DatabaseError(DbErr),

    #[status(StatusCode::UNAUTHORIZED)]
    #[display(fmt = "invalid email or password")]
    InvalidCredentials,
}

#[derive(Deserialize)]
pub(super) struct UserAuthenticationRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub(super) enum AccountRole {
    Volunteer,
    Association,
}

#[derive(Serialize)]
pub(super) struct AuthenticatedUserDetails {
    id: i64,
    email: String,
    name: Option<String>,
    lastname: Option<String>,
}

#[derive(Serialize)]
pub(super) struct UserAuthenticationResponse {
    token: String,
    role: AccountRole,
    user: AuthenticatedUserDetails,

    /// Owned association profile, present for association accounts.
    association: Option<association::Model>,
}

/// User authentication handler.
///
/// A password mismatch and an unknown email produce the same response,
/// so the login route cannot be used to enumerate registered addresses.
pub(super) async fn login(
    State(state): State<AppState>,
    Json(request): Json<UserAuthenticationRequest>,
) -> Result<Json<UserAuthenticationResponse>, UserAuthenticationError> {
    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let user = user::Entity::find()
                    .filter(user::Column::Email.eq(&*request.email))
                    .one(txn)
                    .await?
                    .ok_or(UserAuthenticationError::InvalidCredentials)?;

                if !user.is_active || !passwords::verify(&request.password, &user.password) {
                    return Err(UserAuthenticationError::InvalidCredentials);
                }

                let association = association::Entity::find()
                    .filter(association::Column::UserId.eq(user.id))
                    .one(txn)
                    .await?;

                let role = if association.is_some() {
                    AccountRole::Association
                } else {
                    AccountRole::Volunteer
                };

                let (model, token) = token::generate_token(user.id);

                token::Entity::insert(model)
                    .exec_without_returning(txn)
                    .await?;

                Ok(Json(UserAuthenticationResponse {
                    token,
                    role,
                    user: AuthenticatedUserDetails {
                        id: user.id,
                        email: user.email,
                        name: user.name,
                        lastname: user.lastname,
                    },
                    association,
                }))
            })
        })
        .await
        .into_raw_result()
}
