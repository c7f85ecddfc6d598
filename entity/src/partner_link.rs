use sea_orm::entity::prelude::*;

/// A short-code tracking link bound to one campaign enrollment. Immutable
/// once created except for `custom_params`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "partner_link")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub short_code: String,
    pub campaign_partner_id: i32,
    pub custom_params: Option<Json>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaign_partner::Entity",
        from = "Column::CampaignPartnerId",
        to = "super::campaign_partner::Column::Id"
    )]
    CampaignPartner,
    #[sea_orm(has_many = "super::click::Entity")]
    Click,
}

impl Related<super::campaign_partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CampaignPartner.def()
    }
}

impl Related<super::click::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Click.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
