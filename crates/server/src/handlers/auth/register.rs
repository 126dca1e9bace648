use axum::{extract::State, http::StatusCode, Json};
use axum_derive_error::ErrorResponse;
use db::{
    token, user, ActiveValue, ColumnTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    SelectExt, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{passwords, state::AppState, validation::ValidatedJson};

/// Errors that may occur during the volunteer registration process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum VolunteerRegistrationError {
    DatabaseError(DbErr),

    #[display(fmt = "unable to hash the provided password")]
    PasswordHashError,

    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "an account with this email already exists")]
    EmailTaken,
}

#[derive(Deserialize, Validate)]
pub(super) struct VolunteerRegistrationRequest {
    #[validate(email)]
    email: String,

    #[validate(length(min = 6))]
    password: String,

    name: Option<String>,
    lastname: Option<String>,
    phone: Option<String>,
}

#[derive(Serialize)]
pub(super) struct RegisteredUser {
    id: i64,
    email: String,
    name: Option<String>,
    lastname: Option<String>,
}

#[derive(Serialize)]
pub(super) struct VolunteerRegistrationResponse {
    token: String,
    user: RegisteredUser,
}

/// Volunteer registration handler.
///
/// A fresh account immediately receives an authentication token so that
/// the frontend can log the user in without a second round-trip.
pub(super) async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<VolunteerRegistrationRequest>,
) -> Result<(StatusCode, Json<VolunteerRegistrationResponse>), VolunteerRegistrationError> {
    let now = state.clock.now_naive();

    let password = passwords::hash(&request.password)
        .map_err(|_| VolunteerRegistrationError::PasswordHashError)?;

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
                    return Err(VolunteerRegistrationError::EmailTaken);
                }

                let user = user::Entity::insert(user::ActiveModel {
                    email: ActiveValue::Set(request.email),
                    password: ActiveValue::Set(password),
                    name: ActiveValue::Set(request.name),
                    lastname: ActiveValue::Set(request.lastname),
                    phone: ActiveValue::Set(request.phone),
                    is_active: ActiveValue::Set(true),
                    created_at: ActiveValue::Set(now),
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
                    Json(VolunteerRegistrationResponse {
                        token,
                        user: RegisteredUser {
                            id: user.id,
                            email: user.email,
                            name: user.name,
                            lastname: user.lastname,
                        },
                    }),
                ))
            })
        })
        .await
        .into_raw_result()
}

#[cfg(test)]
mod tests {
    use crate::testing::{create_database, test_state, RequestBodyExt, ResponseBodyExt};

    use assert_json::{assert_json, validators};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::token::TOKEN_LENGTH;
    use serde_json::json;
    use tower::{Service, ServiceExt};

    #[tokio::test]
    async fn successful() {
        let db = create_database().await;

        let response = crate::app_router(test_state(db))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/register")
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "email": "ana@example.com",
                        "password": "secret-password",
                        "name": "Ana",
                    })))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        assert_json!(response.json().await, {
            "token": validators::string(|val| {
                (val.len() == TOKEN_LENGTH)
                    .then_some(())
                    .ok_or(String::from("invalid length"))
            }),
            "user": {
                "email": "ana@example.com",
                "name": "Ana",
            },
        });
    }

    #[tokio::test]
    async fn duplicate_email() {
        let db = create_database().await;

        let mut service = crate::app_router(test_state(db));

        let request = || {
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header("Content-Type", "application/json")
                .body(Body::from_json(json!({
                    "email": "ana@example.com",
                    "password": "secret-password",
                })))
                .unwrap()
        };

        let response = service.call(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = service.call(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_email() {
        let db = create_database().await;

        let response = crate::app_router(test_state(db))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/register")
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "email": "not-an-email",
                        "password": "secret-password",
                    })))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn short_password() {
        let db = create_database().await;

        let response = crate::app_router(test_state(db))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/register")
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "email": "ana@example.com",
                        "password": "short",
                    })))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
