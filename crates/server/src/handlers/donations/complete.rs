use axum::{extract::State, http::StatusCode, Json};
use axum_derive_error::ErrorResponse;
use db::{donation, DbErr, TransactionErrorExt, TransactionTrait};
use derive_more::{Display, Error, From};
use serde::Deserialize;

use crate::state::AppState;

use super::settle_by_session;

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum DonationCompletionError {
    DatabaseError(DbErr),

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "no donation for this checkout session")]
    UnknownSession,
}

#[derive(Deserialize)]
pub(super) struct DonationCompletionRequest {
    session_id: String,
}

/// Manual completion fallback for a checkout session the processor
/// confirmed out of band. Settling an already settled donation is a
/// no-op and returns the stored row.
pub(super) async fn complete(
    State(state): State<AppState>,
    Json(request): Json<DonationCompletionRequest>,
) -> Result<Json<donation::Model>, DonationCompletionError> {
    let now = state.clock.now_naive();

    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let donation =
                    settle_by_session(txn, &request.session_id, donation::Status::Completed, now)
                        .await?
                        .ok_or(DonationCompletionError::UnknownSession)?;

                Ok(Json(donation))
            })
        })
        .await
        .into_raw_result()
}

#[cfg(test)]
mod tests {
    use crate::testing::{
        create_association_account, create_database, create_volunteer, test_state, RequestBodyExt,
        ResponseBodyExt,
    };

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::{donation, EntityTrait};
    use serde_json::json;
    use tower::{Service, ServiceExt};

    #[tokio::test]
    async fn double_completion_is_idempotent() {
        let db = create_database().await;

        let (_, association_id, _) =
            create_association_account(&db, "org@example.com", "G12345678").await;
        let (_, token) = create_volunteer(&db, "ana@example.com").await;

        let state = test_state(db);
        let mut service = crate::app_router(state.clone());

        let response = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/donations")
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "amount": 50,
                        "association_id": association_id,
                    })))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let session_id = donation::Entity::find()
            .all(&*state.db)
            .await
            .unwrap()
            .remove(0)
            .checkout_session_id
            .unwrap();

        let complete_request = || {
            Request::builder()
                .method("POST")
                .uri("/donations/complete")
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from_json(json!({ "session_id": &session_id })))
                .unwrap()
        };

        let response = service.call(complete_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let first = response.json().await;
        assert_eq!(first["status"], "completed");
        assert!(first["completed_at"].is_string());

        let response = service.call(complete_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let second = response.json().await;
        assert_eq!(second["completed_at"], first["completed_at"]);
    }

    #[tokio::test]
    async fn unknown_session() {
        let db = create_database().await;

        let (_, token) = create_volunteer(&db, "ana@example.com").await;

        let response = crate::app_router(test_state(db))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/donations/complete")
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({ "session_id": "cs_missing" })))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
