use axum::{
    extract::{Query, State},
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{association, DbErr, EntityTrait, QueryOrder, QuerySelect};
use derive_more::{Display, Error, From};

use crate::{pagination::Pagination, state::AppState};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum AssociationListError {
    DatabaseError(DbErr),
}

pub(super) async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<association::Model>>, AssociationListError> {
    let associations = association::Entity::find()
        .order_by_asc(association::Column::Id)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .all(&*state.db)
        .await?;

    Ok(Json(associations))
}

#[cfg(test)]
mod tests {
    use crate::testing::{create_association_account, create_database, test_state, ResponseBodyExt};

    use assert_json::assert_json;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn lists_registered_associations() {
        let db = create_database().await;

        create_association_account(&db, "first@example.com", "G12345678").await;
        create_association_account(&db, "second@example.com", "G87654321").await;

        let response = crate::app_router(test_state(db))
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/associations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_json!(response.json().await, [
            { "cif": "G12345678" },
            { "cif": "G87654321" },
        ]);
    }
}
