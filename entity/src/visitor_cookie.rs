use sea_orm::entity::prelude::*;

/// Durable visitor identity, UUID-keyed.
///
/// First-touch pointers are write-once: they are only set while NULL.
/// Last-touch pointers advance under latest-wins-by-click-timestamp.
/// `expires_at` is pushed forward on every touch so it always covers the
/// touching campaign's cookie window.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "visitor_cookie")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_click_id: Option<i64>,
    pub first_partner_id: Option<i32>,
    pub first_campaign_id: Option<i32>,
    pub last_click_id: Option<i64>,
    pub last_partner_id: Option<i32>,
    pub last_campaign_id: Option<i32>,
    /// Timestamp of the click currently holding the last-touch pointers.
    /// Comparator for latest-wins updates under concurrent clicks.
    pub last_touch_at: Option<DateTime>,
    pub expires_at: DateTime,
    pub last_seen_at: DateTime,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::click::Entity")]
    Click,
    #[sea_orm(has_many = "super::conversion_event::Entity")]
    ConversionEvent,
}

impl Related<super::click::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Click.def()
    }
}

impl Related<super::conversion_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConversionEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
