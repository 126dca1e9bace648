use axum::{extract::State, http::StatusCode, Extension, Json};
use db::{event, ActiveValue, EntityTrait, PrimitiveDateTime};
use serde::Deserialize;
use validator::Validate;

use crate::{auth::AuthenticatedUser, state::AppState, validation::ValidatedJson};

use super::EventOwnershipError;

#[derive(Deserialize, Validate)]
pub(super) struct EventCreationRequest {
    #[validate(length(min = 1))]
    title: String,

    description: Option<String>,
    image_url: Option<String>,

    date: PrimitiveDateTime,

    #[validate(length(min = 1))]
    city: String,

    address: Option<String>,
    category: Option<String>,

    #[validate(range(min = 0))]
    max_volunteers: Option<i32>,
}

pub(super) async fn create(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<EventCreationRequest>,
) -> Result<(StatusCode, Json<event::Model>), EventOwnershipError> {
    let association_id = current_user
        .association_id()
        .ok_or(EventOwnershipError::AssociationRequired)?;

    let event = event::Entity::insert(event::ActiveModel {
        title: ActiveValue::Set(request.title),
        description: ActiveValue::Set(request.description),
        image_url: ActiveValue::Set(request.image_url),
        date: ActiveValue::Set(request.date),
        city: ActiveValue::Set(request.city),
        address: ActiveValue::Set(request.address),
        category: ActiveValue::Set(request.category),
        max_volunteers: ActiveValue::Set(request.max_volunteers),
        is_active: ActiveValue::Set(true),
        association_id: ActiveValue::Set(association_id),
        created_at: ActiveValue::Set(state.clock.now_naive()),
        ..Default::default()
    })
    .exec_with_returning(&*state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(event)))
}
