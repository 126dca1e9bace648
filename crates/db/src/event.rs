//! Volunteering event created by an association.
//!
//! Events are never hard-deleted: deactivation clears the active flag and
//! is terminal. The volunteer roster lives in
//! [`event_volunteer`](super::event_volunteer).

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Event model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,

    /// Scheduled instant of the event, naive UTC.
    pub date: TimeDateTime,

    pub city: String,
    pub address: Option<String>,

    /// Free-form category tag.
    pub category: Option<String>,

    /// Roster capacity; `None` means unbounded.
    pub max_volunteers: Option<i32>,

    pub is_active: bool,

    /// Owning association identifier.
    pub association_id: i64,

    pub created_at: TimeDateTime,
}

/// Event model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::association::Entity",
        from = "Column::AssociationId",
        to = "super::association::Column::Id"
    )]
    Association,

    #[sea_orm(has_many = "super::event_volunteer::Entity")]
    EventVolunteers,

    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,
}

impl Related<super::association::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Association.def()
    }
}

impl Related<super::event_volunteer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventVolunteers.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
