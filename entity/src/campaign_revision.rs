//! Immutable snapshot of a campaign row taken before each update.

use sea_orm::entity::prelude::*;

use super::campaign::{AttributionPolicy, CampaignStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "campaign_revision")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub campaign_id: i32,
    pub version: i32,
    pub name: String,
    pub destination_url: String,
    pub commission_rule: Json,
    pub attribution_policy: AttributionPolicy,
    pub cookie_duration_days: i32,
    pub approval_required: bool,
    pub is_public: bool,
    pub status: CampaignStatus,
    pub archived_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaign::Entity",
        from = "Column::CampaignId",
        to = "super::campaign::Column::Id"
    )]
    Campaign,
}

impl Related<super::campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
