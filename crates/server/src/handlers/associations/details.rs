use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{association, DbErr, EntityTrait};
use derive_more::{Display, Error, From};

use crate::state::AppState;

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum AssociationDetailsError {
    DatabaseError(DbErr),

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "association not found")]
    AssociationNotFound,
}

pub(super) async fn details(
    State(state): State<AppState>,
    Path(association_id): Path<i64>,
) -> Result<Json<association::Model>, AssociationDetailsError> {
    let association = association::Entity::find_by_id(association_id)
        .one(&*state.db)
        .await?
        .ok_or(AssociationDetailsError::AssociationNotFound)?;

    Ok(Json(association))
}

#[cfg(test)]
mod tests {
    use crate::testing::{create_association_account, create_database, test_state, ResponseBodyExt};

    use assert_json::assert_json;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn found() {
        let db = create_database().await;

        let (_, association_id, _) =
            create_association_account(&db, "org@example.com", "G12345678").await;

        let response = crate::app_router(test_state(db))
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/associations/{association_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_json!(response.json().await, {
            "id": association_id,
            "cif": "G12345678",
        });
    }

    #[tokio::test]
    async fn not_found() {
        let db = create_database().await;

        let response = crate::app_router(test_state(db))
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/associations/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
