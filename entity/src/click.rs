//! Append-only click log. Rows are never updated after insert.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "click")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub partner_link_id: i32,
    pub cookie_id: Option<Uuid>,
    pub occurred_at: DateTime,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub referrer: Option<String>,
    pub ip_address: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::partner_link::Entity",
        from = "Column::PartnerLinkId",
        to = "super::partner_link::Column::Id"
    )]
    PartnerLink,
    #[sea_orm(
        belongs_to = "super::visitor_cookie::Entity",
        from = "Column::CookieId",
        to = "super::visitor_cookie::Column::Id"
    )]
    VisitorCookie,
}

impl Related<super::partner_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PartnerLink.def()
    }
}

impl Related<super::visitor_cookie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VisitorCookie.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
