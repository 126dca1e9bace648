use axum::{
    extract::{Path, State},
    Extension, Json,
};
use db::{
    event, ActiveModelTrait, ActiveValue, EntityTrait, IntoActiveModel, PrimitiveDateTime, TransactionErrorExt,
    TransactionTrait,
};
use serde::Deserialize;
use validator::Validate;

use crate::{auth::AuthenticatedUser, state::AppState, validation::ValidatedJson};

use super::EventOwnershipError;

/// Fields absent from the request are left unchanged. The active flag
/// is not part of this surface, deactivation has its own route and is
/// terminal.
#[derive(Deserialize, Validate)]
pub(super) struct EventUpdateRequest {
    #[validate(length(min = 1))]
    title: Option<String>,

    description: Option<String>,
    image_url: Option<String>,
    date: Option<PrimitiveDateTime>,

    #[validate(length(min = 1))]
    city: Option<String>,

    address: Option<String>,
    category: Option<String>,

    #[validate(range(min = 0))]
    max_volunteers: Option<i32>,
}

pub(super) async fn update(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<EventUpdateRequest>,
) -> Result<Json<event::Model>, EventOwnershipError> {
    let association_id = current_user
        .association_id()
        .ok_or(EventOwnershipError::AssociationRequired)?;

    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let event = event::Entity::find_by_id(event_id)
                    .one(txn)
                    .await?
                    .ok_or(EventOwnershipError::EventNotFound)?;

                if event.association_id != association_id {
                    return Err(EventOwnershipError::NotEventOwner);
                }

                let mut active = event.into_active_model();

                if let Some(title) = request.title {
                    active.title = ActiveValue::Set(title);
                }

                if let Some(description) = request.description {
                    active.description = ActiveValue::Set(Some(description));
                }

                if let Some(image_url) = request.image_url {
                    active.image_url = ActiveValue::Set(Some(image_url));
                }

                if let Some(date) = request.date {
                    active.date = ActiveValue::Set(date);
                }

                if let Some(city) = request.city {
                    active.city = ActiveValue::Set(city);
                }

                if let Some(address) = request.address {
                    active.address = ActiveValue::Set(Some(address));
                }

                if let Some(category) = request.category {
                    active.category = ActiveValue::Set(Some(category));
                }

                if let Some(max_volunteers) = request.max_volunteers {
                    active.max_volunteers = ActiveValue::Set(Some(max_volunteers));
                }

                let event = active.update(txn).await?;

                Ok(Json(event))
            })
        })
        .await
        .into_raw_result()
}
