use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    rating, ActiveModelTrait, ActiveValue, DbErr, EntityTrait, IntoActiveModel, TransactionErrorExt,
    TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::Deserialize;

use crate::{auth::AuthenticatedUser, state::AppState};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum RatingUpdateError {
    DatabaseError(DbErr),

    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "rating value must be an integer between 1 and 5")]
    InvalidRatingValue,

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "rating not found")]
    RatingNotFound,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "only the author may edit a rating")]
    NotRatingAuthor,
}

#[derive(Deserialize)]
pub(super) struct RatingUpdateRequest {
    rating: i16,
    comment: Option<String>,
}

pub(super) async fn update(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(rating_id): Path<i64>,
    Json(request): Json<RatingUpdateRequest>,
) -> Result<Json<rating::Model>, RatingUpdateError> {
    if !rating::value_in_range(request.rating) {
        return Err(RatingUpdateError::InvalidRatingValue);
    }

    let now = state.clock.now_naive();
    let user_id = current_user.id();

    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let rating = rating::Entity::find_by_id(rating_id)
                    .one(txn)
                    .await?
                    .ok_or(RatingUpdateError::RatingNotFound)?;

                if rating.user_id != user_id {
                    return Err(RatingUpdateError::NotRatingAuthor);
                }

                let mut active = rating.into_active_model();
                active.rating = ActiveValue::Set(request.rating);

                if let Some(comment) = request.comment {
                    active.comment = ActiveValue::Set(Some(comment));
                }

                active.updated_at = ActiveValue::Set(now);

                let rating = active.update(txn).await?;

                Ok(Json(rating))
            })
        })
        .await
        .into_raw_result()
}
