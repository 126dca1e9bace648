//! Association profile owned by a user account.
//!
//! The CIF is the association's business key and is unique across
//! all associations; `user_id` is unique as well, enforcing the
//! one-association-per-user invariant at the store level.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Association model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "associations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    /// Unique organizational tax identifier.
    pub cif: String,

    pub description: String,
    pub contact_email: String,

    pub image_url: Option<String>,
    pub website_url: Option<String>,
    pub social_media_url: Option<String>,
    pub contact_phone: Option<String>,

    /// Owning user identifier.
    pub user_id: i64,
}

/// Association model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(has_many = "super::event::Entity")]
    Events,

    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,

    #[sea_orm(has_many = "super::donation::Entity")]
    Donations,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl Related<super::donation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
