//! Donation ledger entry.
//!
//! A donation is created in the `Pending` state and transitions exactly
//! once, either to `Completed` (processor confirmation or the manual
//! fallback) or to `Failed` (processor-reported failure). Both outcomes
//! are terminal.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Donation model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Donated amount in major currency units.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,

    /// ISO 4217 currency code.
    pub currency: String,

    pub description: Option<String>,

    pub donor_id: i64,
    pub association_id: i64,
    pub event_id: Option<i64>,

    /// Processor-tracked checkout session identifier, once initiated.
    pub checkout_session_id: Option<String>,

    pub status: Status,

    pub created_at: TimeDateTime,
    pub completed_at: Option<TimeDateTime>,
}

/// Donation lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i16", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[sea_orm(num_value = 0)]
    Pending,
    #[sea_orm(num_value = 1)]
    Completed,
    #[sea_orm(num_value = 2)]
    Failed,
}

impl Status {
    /// Whether no further transition may leave this state.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Pending)
    }
}

/// Donation model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DonorId",
        to = "super::user::Column::Id"
    )]
    Donor,

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
        Relation::Donor.def()
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
