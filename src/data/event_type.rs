use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

pub struct EventTypeRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EventTypeRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        vendor_id: i32,
        key: &str,
        name: &str,
        commissionable: bool,
        default_rule: Option<sea_orm::JsonValue>,
        is_terminal: bool,
    ) -> Result<entity::event_type::Model, DbErr> {
        let event_type = entity::event_type::ActiveModel {
            vendor_id: ActiveValue::Set(vendor_id),
            key: ActiveValue::Set(key.to_string()),
            name: ActiveValue::Set(name.to_string()),
            commissionable: ActiveValue::Set(commissionable),
            default_rule: ActiveValue::Set(default_rule),
            is_terminal: ActiveValue::Set(is_terminal),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        event_type.insert(self.db).await
    }

    pub async fn find_by_key(
        &self,
        vendor_id: i32,
        key: &str,
    ) -> Result<Option<entity::event_type::Model>, DbErr> {
        entity::prelude::EventType::find()
            .filter(entity::event_type::Column::VendorId.eq(vendor_id))
            .filter(entity::event_type::Column::Key.eq(key))
            .one(self.db)
            .await
    }

    /// Ids of terminal event types, used by the funnel aggregator to decide
    /// journey completion.
    pub async fn terminal_ids(&self) -> Result<Vec<i32>, DbErr> {
        let terminal = entity::prelude::EventType::find()
            .filter(entity::event_type::Column::IsTerminal.eq(true))
            .all(self.db)
            .await?;

        Ok(terminal.into_iter().map(|event_type| event_type.id).collect())
    }
}
