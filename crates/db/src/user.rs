//! Registered user.
//!
//! A user account either belongs to a plain volunteer or owns exactly one
//! association profile; the distinction is derived from the presence of a
//! related [`association`](super::association) row at authentication time.

use sea_orm::entity::prelude::*;

/// User model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Unique login email, matched case-sensitively.
    pub email: String,

    /// Argon2id password hash.
    pub password: String,

    pub name: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,

    pub is_active: bool,

    /// Active password reset token, if one was requested.
    pub reset_token: Option<String>,
    pub reset_token_expires_at: Option<TimeDateTime>,

    pub created_at: TimeDateTime,
}

/// User model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::association::Entity")]
    Association,

    #[sea_orm(has_many = "super::token::Entity")]
    Tokens,

    #[sea_orm(has_many = "super::event_volunteer::Entity")]
    EventVolunteers,

    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,

    #[sea_orm(has_many = "super::donation::Entity")]
    Donations,
}

impl Related<super::association::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Association.def()
    }
}

impl Related<super::token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tokens.def()
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

impl Related<super::donation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Generate a new password reset token string.
///
/// Reset tokens share the alphabet and length of authentication tokens
/// but live on the user row and carry an expiry timestamp.
pub fn generate_reset_token() -> String {
    use rand::{
        distributions::{Alphanumeric, DistString},
        thread_rng,
    };

    Alphanumeric.sample_string(&mut thread_rng(), super::token::TOKEN_LENGTH)
}

impl Model {
    /// Display name composed from the optional name parts, falling back
    /// to the login email.
    pub fn display_name(&self) -> String {
        match (&self.name, &self.lastname) {
            (Some(name), Some(lastname)) => format!("{name} {lastname}"),
            (Some(name), None) => name.clone(),
            _ => self.email.clone(),
        }
    }
}
