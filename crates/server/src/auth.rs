use axum::{
    extract::State,
    headers::{authorization::Bearer, Authorization},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
    TypedHeader,
};
use axum_derive_error::ErrorResponse;
use db::{
    association, token, ColumnTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};

use crate::state::AppState;

/// Role of an authenticated identity, computed once per request from
/// the presence of an owned association.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Role {
    Volunteer,
    Association,
}

/// Verified identity of the requesting user.
#[derive(Clone, Debug)]
pub(crate) struct AuthenticatedUser {
    user_id: i64,
    association_id: Option<i64>,
}

impl AuthenticatedUser {
    /// Get raw user identifier value.
    pub(crate) fn id(&self) -> i64 {
        self.user_id
    }

    /// Identifier of the owned association, present iff the account
    /// registered as one.
    pub(crate) fn association_id(&self) -> Option<i64> {
        self.association_id
    }
}

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum AuthenticationError {
    DatabaseError(DbErr),

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "invalid authentication token was provided")]
    InvalidAuthenticationToken,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "an association account is required to access")]
    AssociationRoleRequired,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "a volunteer account is required to access")]
    VolunteerRoleRequired,
}

pub(super) async fn require_authentication<
    const REQUIRE_ASSOCIATION: bool,
    const REQUIRE_VOLUNTEER: bool,
    B,
>(
    State(state): State<AppState>,
    TypedHeader(authorization): TypedHeader<Authorization<Bearer>>,
    mut req: Request<B>,
    next: Next<B>,
) -> Result<Response, AuthenticationError> {
    let current_user = state
        .db
        .transaction::<_, _, AuthenticationError>(|txn| {
            Box::pin(async move {
                let bearer = authorization.token();

                let user_id: i64 = token::Entity::find()
                    .select_only()
                    .column(token::Column::UserId)
                    .filter(token::Column::Token.eq(bearer))
                    .into_tuple()
                    .one(txn)
                    .await?
                    .ok_or(AuthenticationError::InvalidAuthenticationToken)?;

                let association_id: Option<i64> = association::Entity::find()
                    .select_only()
                    .column(association::Column::Id)
                    .filter(association::Column::UserId.eq(user_id))
                    .into_tuple()
                    .one(txn)
                    .await?;

                let role = if association_id.is_some() {
                    Role::Association
                } else {
                    Role::Volunteer
                };

                if REQUIRE_ASSOCIATION && role != Role::Association {
                    return Err(AuthenticationError::AssociationRoleRequired);
                }

                if REQUIRE_VOLUNTEER && role != Role::Volunteer {
                    return Err(AuthenticationError::VolunteerRoleRequired);
                }

                Ok(AuthenticatedUser {
                    user_id,
                    association_id,
                })
            })
        })
        .await
        .into_raw_result()?;

    req.extensions_mut().insert(current_user);

    Ok(next.run(req).await)
}
