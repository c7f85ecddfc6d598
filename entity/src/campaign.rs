use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attribution policy applied to conversions under this campaign.
///
/// Stored as an explicit campaign attribute rather than inferred from
/// recorded conversion events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum AttributionPolicy {
    #[sea_orm(string_value = "first_click")]
    FirstClick,
    #[sea_orm(string_value = "last_click")]
    LastClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "paused")]
    Paused,
    #[sea_orm(string_value = "archived")]
    Archived,
}

/// A vendor campaign. `commission_rule` holds the JSON-encoded default rule
/// (flat / percentage / tiered); edits bump `version` and archive the
/// previous values into `campaign_revision`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "campaign")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vendor_id: i32,
    pub name: String,
    pub version: i32,
    pub destination_url: String,
    pub commission_rule: Json,
    pub attribution_policy: AttributionPolicy,
    pub cookie_duration_days: i32,
    pub approval_required: bool,
    pub is_public: bool,
    pub status: CampaignStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id"
    )]
    Vendor,
    #[sea_orm(has_many = "super::campaign_partner::Entity")]
    CampaignPartner,
    #[sea_orm(has_many = "super::campaign_revision::Entity")]
    CampaignRevision,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::campaign_partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CampaignPartner.def()
    }
}

impl Related<super::campaign_revision::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CampaignRevision.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
