use sea_orm::entity::prelude::*;

/// Catalog entry for a conversion event type, scoped to a vendor.
///
/// `default_rule` (when present) applies before the campaign default for
/// commissionable types. `is_terminal` marks the event that completes a
/// funnel journey.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "event_type")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vendor_id: i32,
    pub key: String,
    pub name: String,
    pub commissionable: bool,
    pub default_rule: Option<Json>,
    pub is_terminal: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id"
    )]
    Vendor,
    #[sea_orm(has_many = "super::conversion_event::Entity")]
    ConversionEvent,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::conversion_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConversionEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
