use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    association, donation, ColumnTrait, DbErr, Decimal, EntityTrait, PrimitiveDateTime,
    QueryFilter, QuerySelect, SelectExt, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum DonationStatisticsError {
    DatabaseError(DbErr),

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "association not found")]
    AssociationNotFound,
}

/// Without an association the aggregates cover the whole ledger.
#[derive(Deserialize)]
pub(super) struct DonationStatisticsQuery {
    association_id: Option<i64>,
}

#[derive(Serialize)]
pub(super) struct DonationStatisticsResponse {
    total_amount: Decimal,
    total_count: usize,

    /// Average completed donation, rounded to cents.
    average_amount: Decimal,

    last_donation_at: Option<PrimitiveDateTime>,
}

/// Aggregates over completed donations only; pending and failed entries
/// never count towards an association's totals.
pub(super) async fn statistics(
    State(state): State<AppState>,
    Query(query): Query<DonationStatisticsQuery>,
) -> Result<Json<DonationStatisticsResponse>, DonationStatisticsError> {
    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                if let Some(association_id) = query.association_id {
                    let association_exists = association::Entity::find_by_id(association_id)
                        .select_only()
                        .exists(txn)
                        .await?;

                    if !association_exists {
                        return Err(DonationStatisticsError::AssociationNotFound);
                    }
                }

                let mut select = donation::Entity::find()
                    .select_only()
                    .column(donation::Column::Amount)
                    .column(donation::Column::CompletedAt)
                    .filter(donation::Column::Status.eq(donation::Status::Completed));

                if let Some(association_id) = query.association_id {
                    select = select.filter(donation::Column::AssociationId.eq(association_id));
                }

                let completed: Vec<(Decimal, Option<PrimitiveDateTime>)> =
                    select.into_tuple().all(txn).await?;

                let total_count = completed.len();
                let total_amount: Decimal =
                    completed.iter().map(|(amount, _)| *amount).sum();

                let average_amount = if total_count == 0 {
                    Decimal::ZERO
                } else {
                    (total_amount / Decimal::from(total_count as u64)).round_dp(2)
                };

                let last_donation_at = completed
                    .iter()
                    .filter_map(|(_, completed_at)| *completed_at)
                    .max();

                Ok(Json(DonationStatisticsResponse {
                    total_amount,
                    total_count,
                    average_amount,
                    last_donation_at,
                }))
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

    use assert_json::assert_json;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::{donation, EntityTrait};
    use serde_json::json;
    use tower::{Service, ServiceExt};

    #[tokio::test]
    async fn counts_completed_donations_only() {
        let db = create_database().await;

        let (_, association_id, _) =
            create_association_account(&db, "org@example.com", "G12345678").await;
        let (_, token) = create_volunteer(&db, "ana@example.com").await;

        let state = test_state(db);
        let mut service = crate::app_router(state.clone());

        // Three donations, the last one stays pending.
        for amount in [10, 30, 99] {
            let response = service
                .call(
                    Request::builder()
                        .method("POST")
                        .uri("/donations")
                        .header("Authorization", format!("Bearer {token}"))
                        .header("Content-Type", "application/json")
                        .body(Body::from_json(json!({
                            "amount": amount,
                            "association_id": association_id,
                        })))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let donations = donation::Entity::find().all(&*state.db).await.unwrap();

        for donation in &donations[..2] {
            let session_id = donation.checkout_session_id.clone().unwrap();

            let response = service
                .call(
                    Request::builder()
                        .method("POST")
                        .uri("/donations/complete")
                        .header("Authorization", format!("Bearer {token}"))
                        .header("Content-Type", "application/json")
                        .body(Body::from_json(json!({ "session_id": session_id })))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = service
            .call(
                Request::builder()
                    .method("GET")
                    .uri(format!("/donations/statistics?association_id={association_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_json!(response.json().await, {
            "total_amount": 40.0,
            "total_count": 2,
            "average_amount": 20.0,
        });
    }

    #[tokio::test]
    async fn unscoped_statistics_cover_the_whole_ledger() {
        let db = create_database().await;

        let (_, first_association, _) =
            create_association_account(&db, "first@example.com", "G12345678").await;
        let (_, second_association, _) =
            create_association_account(&db, "second@example.com", "G87654321").await;
        let (_, token) = create_volunteer(&db, "ana@example.com").await;

        let state = test_state(db);
        let mut service = crate::app_router(state.clone());

        for association_id in [first_association, second_association] {
            let response = service
                .call(
                    Request::builder()
                        .method("POST")
                        .uri("/donations")
                        .header("Authorization", format!("Bearer {token}"))
                        .header("Content-Type", "application/json")
                        .body(Body::from_json(json!({
                            "amount": 15,
                            "association_id": association_id,
                        })))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        for donation in donation::Entity::find().all(&*state.db).await.unwrap() {
            let session_id = donation.checkout_session_id.unwrap();

            let response = service
                .call(
                    Request::builder()
                        .method("POST")
                        .uri("/donations/complete")
                        .header("Authorization", format!("Bearer {token}"))
                        .header("Content-Type", "application/json")
                        .body(Body::from_json(json!({ "session_id": session_id })))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = service
            .call(
                Request::builder()
                    .method("GET")
                    .uri("/donations/statistics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        assert_json!(response.json().await, {
            "total_amount": 30.0,
            "total_count": 2,
            "average_amount": 15.0,
        });
    }

    #[tokio::test]
    async fn empty_statistics() {
        let db = create_database().await;

        let (_, association_id, _) =
            create_association_account(&db, "org@example.com", "G12345678").await;

        let response = crate::app_router(test_state(db))
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/donations/statistics?association_id={association_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_json!(response.json().await, {
            "total_amount": 0.0,
            "total_count": 0,
            "average_amount": 0.0,
            "last_donation_at": null,
        });
    }

    #[tokio::test]
    async fn unknown_association() {
        let db = create_database().await;

        let response = crate::app_router(test_state(db))
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/donations/statistics?association_id=42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
