//! Post-event rating.
//!
//! A rating always targets one specific event; the association identifier
//! is stored redundantly for aggregation and must equal the event's owner.
//! The (user, event) pair is unique at the store level.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Inclusive bounds of a rating value.
pub const MIN_VALUE: i16 = 1;
pub const MAX_VALUE: i16 = 5;

/// Rating model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "ratings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Rating value within `[MIN_VALUE, MAX_VALUE]`.
    pub rating: i16,

    pub comment: Option<String>,

    /// Rating author.
    pub user_id: i64,

    /// Rated association, redundantly stored.
    pub association_id: i64,

    /// Rated event.
    pub event_id: i64,

    pub created_at: TimeDateTime,
    pub updated_at: TimeDateTime,
}

/// Rating model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::association::Entity",
        from = "Column::AssociationId",
        to = "super::association::Column::Id"
    )]
    Association,

    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::association::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Association.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Check a rating value against the allowed inclusive range.
pub fn value_in_range(value: i16) -> bool {
    (MIN_VALUE..=MAX_VALUE).contains(&value)
}
