//! Event roster entry.
//!
//! The composite primary key makes duplicate joins impossible at the store
//! level, independently of any application-side existence check. Entries
//! are hard-deleted when a volunteer leaves.

use sea_orm::entity::prelude::*;

/// Roster entry model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "event_volunteers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub event_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub volunteer_id: i64,

    pub joined_at: TimeDateTime,
}

/// Roster entry model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::VolunteerId",
        to = "super::user::Column::Id"
    )]
    Volunteer,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Volunteer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
