//! Derived journey rollup per (cookie, partner, campaign). Recomputed
//! wholesale by the funnel aggregator, never hand-edited.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "funnel_journey")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cookie_id: Uuid,
    pub partner_id: i32,
    pub campaign_id: i32,
    pub journey_started_at: DateTime,
    pub last_event_at: DateTime,
    pub total_events: i64,
    pub total_commission: Decimal,
    pub is_converted: bool,
    pub recomputed_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
