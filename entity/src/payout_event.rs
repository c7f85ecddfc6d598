//! Allocation row recording which commission amount from which conversion
//! event contributed to which payout. `conversion_event_id` is unique across
//! all payouts; a commissioned event is never paid out twice.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payout_event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub payout_id: i32,
    #[sea_orm(unique)]
    pub conversion_event_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payout::Entity",
        from = "Column::PayoutId",
        to = "super::payout::Column::Id"
    )]
    Payout,
    #[sea_orm(
        belongs_to = "super::conversion_event::Entity",
        from = "Column::ConversionEventId",
        to = "super::conversion_event::Column::Id"
    )]
    ConversionEvent,
}

impl Related<super::payout::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payout.def()
    }
}

impl Related<super::conversion_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConversionEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
