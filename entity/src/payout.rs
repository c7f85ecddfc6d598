use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payout disbursement state machine.
///
/// pending -> processing -> completed | failed, failed -> pending on manual
/// retry. `completed` is terminal; further amounts require a new payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payout")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub partner_id: i32,
    pub payment_method: String,
    pub period_start: DateTime,
    pub period_end: DateTime,
    pub amount: Decimal,
    pub currency: String,
    pub status: PayoutStatus,
    pub provider_txn_id: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::PartnerId",
        to = "super::partner::Column::Id"
    )]
    Partner,
    #[sea_orm(has_many = "super::payout_event::Entity")]
    PayoutEvent,
}

impl Related<super::partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl Related<super::payout_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayoutEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
