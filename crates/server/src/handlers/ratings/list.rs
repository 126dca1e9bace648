use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    association, rating, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    SelectExt, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::state::AppState;

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum RatingListError {
    DatabaseError(DbErr),

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "association not found")]
    AssociationNotFound,
}

#[derive(Serialize)]
pub(super) struct RatingSummary {
    total_ratings: usize,

    /// Average rating rounded to one decimal, `0.0` when unrated.
    average_rating: f64,
}

#[derive(Serialize)]
pub(super) struct RatingListResponse {
    summary: RatingSummary,
    ratings: Vec<rating::Model>,
}

pub(super) async fn list(
    State(state): State<AppState>,
    Path(association_id): Path<i64>,
) -> Result<Json<RatingListResponse>, RatingListError> {
    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let association_exists = association::Entity::find_by_id(association_id)
                    .select_only()
                    .exists(txn)
                    .await?;

                if !association_exists {
                    return Err(RatingListError::AssociationNotFound);
                }

                let ratings = rating::Entity::find()
                    .filter(rating::Column::AssociationId.eq(association_id))
                    .order_by_desc(rating::Column::CreatedAt)
                    .order_by_desc(rating::Column::Id)
                    .all(txn)
                    .await?;

                Ok(Json(RatingListResponse {
                    summary: summarize(&ratings),
                    ratings,
                }))
            })
        })
        .await
        .into_raw_result()
}

fn summarize(ratings: &[rating::Model]) -> RatingSummary {
    if ratings.is_empty() {
        return RatingSummary {
            total_ratings: 0,
            average_rating: 0.0,
        };
    }

    let sum: i64 = ratings.iter().map(|rating| rating.rating as i64).sum();
    let average = sum as f64 / ratings.len() as f64;

    RatingSummary {
        total_ratings: ratings.len(),
        average_rating: (average * 10.0).round() / 10.0,
    }
}
