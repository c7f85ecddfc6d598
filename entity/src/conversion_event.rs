use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a conversion was tied to a partner and campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum AttributionType {
    #[sea_orm(string_value = "first_click")]
    FirstClick,
    #[sea_orm(string_value = "last_click")]
    LastClick,
    #[sea_orm(string_value = "unattributed")]
    Unattributed,
}

/// Confidence in the attribution decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum AttributionConfidence {
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "low")]
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    #[sea_orm(string_value = "flat")]
    Flat,
    #[sea_orm(string_value = "percentage")]
    Percentage,
    #[sea_orm(string_value = "tiered")]
    Tiered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// A recorded conversion with its attribution and commission resolution.
///
/// `dedupe_key` is unique; ingestion is first-write-wins so replays of the
/// same key return the stored row untouched. Approved rows are immutable
/// apart from status transitions.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "conversion_event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub dedupe_key: String,
    pub event_type_id: i32,
    pub cookie_id: Option<Uuid>,
    pub click_id: Option<i64>,
    pub partner_id: Option<i32>,
    pub campaign_id: Option<i32>,
    pub attribution_type: AttributionType,
    pub attribution_confidence: AttributionConfidence,
    pub event_value: Option<Decimal>,
    pub commission_type: Option<CommissionType>,
    pub commission_value: Option<Decimal>,
    pub commission_amount: Option<Decimal>,
    pub status: ConversionStatus,
    pub needs_review: bool,
    pub occurred_at: DateTime,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event_type::Entity",
        from = "Column::EventTypeId",
        to = "super::event_type::Column::Id"
    )]
    EventType,
    #[sea_orm(
        belongs_to = "super::visitor_cookie::Entity",
        from = "Column::CookieId",
        to = "super::visitor_cookie::Column::Id"
    )]
    VisitorCookie,
    #[sea_orm(has_many = "super::payout_event::Entity")]
    PayoutEvent,
}

impl Related<super::event_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventType.def()
    }
}

impl Related<super::visitor_cookie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VisitorCookie.def()
    }
}

impl Related<super::payout_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayoutEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
