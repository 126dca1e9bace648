use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{
    event, rating, ActiveValue, DbErr, EntityTrait, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::Deserialize;

use crate::{
    auth::AuthenticatedUser,
    eligibility::{self, RateDenial},
    state::AppState,
};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum RatingCreationError {
    DatabaseError(DbErr),

    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "rating value must be an integer between 1 and 5")]
    InvalidRatingValue,

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "event not found")]
    EventNotFound,

    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "association doesn't match the event owner")]
    AssociationMismatch,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "the event has not concluded yet")]
    EventNotConcluded,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "only participants may rate an event")]
    NotAParticipant,

    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "this event was already rated")]
    AlreadyRated,
}

impl From<RateDenial> for RatingCreationError {
    fn from(denial: RateDenial) -> Self {
        match denial {
            RateDenial::EventNotConcluded => RatingCreationError::EventNotConcluded,
            RateDenial::NotAParticipant => RatingCreationError::NotAParticipant,
            RateDenial::AlreadyRated => RatingCreationError::AlreadyRated,
        }
    }
}

#[derive(Deserialize)]
pub(super) struct RatingCreationRequest {
    event_id: i64,
    rating: i16,
    comment: Option<String>,

    /// Optional cross-check against the event's owning association.
    association_id: Option<i64>,
}

/// Rating creation handler.
///
/// Eligibility is evaluated inside the same transaction as the insert,
/// a prior `canRate` response is never trusted.
pub(super) async fn create(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<RatingCreationRequest>,
) -> Result<(StatusCode, Json<rating::Model>), RatingCreationError> {
    if !rating::value_in_range(request.rating) {
        return Err(RatingCreationError::InvalidRatingValue);
    }

    let now = state.clock.now_naive();
    let user_id = current_user.id();

    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let event = event::Entity::find_by_id(request.event_id)
                    .one(txn)
                    .await?
                    .ok_or(RatingCreationError::EventNotFound)?;

                if let Some(association_id) = request.association_id {
                    if association_id != event.association_id {
                        return Err(RatingCreationError::AssociationMismatch);
                    }
                }

                if let Some(denial) = eligibility::rate_denial(txn, user_id, &event, now).await? {
                    return Err(denial.into());
                }

                let rating = rating::Entity::insert(rating::ActiveModel {
                    rating: ActiveValue::Set(request.rating),
                    comment: ActiveValue::Set(request.comment),
                    user_id: ActiveValue::Set(user_id),
                    association_id: ActiveValue::Set(event.association_id),
                    event_id: ActiveValue::Set(event.id),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                })
                .exec_with_returning(txn)
                .await?;

                Ok((StatusCode::CREATED, Json(rating)))
            })
        })
        .await
        .into_raw_result()
}

#[cfg(test)]
mod tests {
    use crate::testing::{
        create_association_account, create_database, create_event, create_volunteer, test_state,
        RequestBodyExt, ResponseBodyExt,
    };

    use assert_json::assert_json;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::OffsetDateTime;
    use serde_json::json;
    use time::Duration;
    use tower::{Service, ServiceExt};

    async fn concluded_event(db: &db::DatabaseConnection) -> (i64, i64, String) {
        let (_, association_id, _) =
            create_association_account(db, "org@example.com", "G12345678").await;
        let event_id = create_event(
            db,
            association_id,
            OffsetDateTime::now_utc() - Duration::hours(2),
            None,
        )
        .await;

        let (_, token) = create_volunteer(db, "ana@example.com").await;

        (association_id, event_id, token)
    }

    fn join_request(event_id: i64, token: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/events/{event_id}/join"))
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    fn rate_request(event_id: i64, token: &str, rating: i64) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ratings")
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body(Body::from_json(json!({
                "event_id": event_id,
                "rating": rating,
            })))
            .unwrap()
    }

    #[tokio::test]
    async fn successful() {
        let db = create_database().await;

        let (association_id, event_id, token) = concluded_event(&db).await;

        let mut service = crate::app_router(test_state(db));

        let response = service.call(join_request(event_id, &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = service.call(rate_request(event_id, &token, 5)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        assert_json!(response.json().await, {
            "rating": 5,
            "event_id": event_id,
            "association_id": association_id,
        });
    }

    #[tokio::test]
    async fn duplicate_rating() {
        let db = create_database().await;

        let (_, event_id, token) = concluded_event(&db).await;

        let mut service = crate::app_router(test_state(db));

        service.call(join_request(event_id, &token)).await.unwrap();

        let response = service.call(rate_request(event_id, &token, 5)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = service.call(rate_request(event_id, &token, 4)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn future_event_cannot_be_rated() {
        let db = create_database().await;

        let (_, association_id, _) =
            create_association_account(&db, "org@example.com", "G12345678").await;
        let event_id = create_event(
            &db,
            association_id,
            OffsetDateTime::now_utc() + Duration::days(1),
            None,
        )
        .await;

        let (_, token) = create_volunteer(&db, "ana@example.com").await;

        let mut service = crate::app_router(test_state(db));

        service.call(join_request(event_id, &token)).await.unwrap();

        let response = service.call(rate_request(event_id, &token, 5)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn non_participant_is_rejected() {
        let db = create_database().await;

        let (_, event_id, token) = concluded_event(&db).await;

        let response = crate::app_router(test_state(db))
            .oneshot(rate_request(event_id, &token, 5))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn out_of_range_values() {
        let db = create_database().await;

        let (_, event_id, token) = concluded_event(&db).await;

        let mut service = crate::app_router(test_state(db));

        service.call(join_request(event_id, &token)).await.unwrap();

        for value in [0, 6] {
            let response = service
                .call(rate_request(event_id, &token, value))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }
}
