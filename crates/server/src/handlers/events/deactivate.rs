use axum::{
    extract::{Path, State},
    Extension,
};
use db::{
    event, ActiveModelTrait, ActiveValue, EntityTrait, IntoActiveModel, TransactionErrorExt, TransactionTrait,
};

use crate::{auth::AuthenticatedUser, state::AppState};

use super::EventOwnershipError;

/// Event deactivation handler.
///
/// A deactivated event stays queryable and keeps its roster, it only
/// stops accepting new volunteers and disappears from the public
/// listing. The transition is terminal and idempotent.
pub(super) async fn deactivate(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<(), EventOwnershipError> {
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

                if event.is_active {
                    let mut active = event.into_active_model();
                    active.is_active = ActiveValue::Set(false);
                    active.update(txn).await?;
                }

                Ok(())
            })
        })
        .await
        .into_raw_result()
}
