use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

pub struct PartnerLinkRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PartnerLinkRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        short_code: &str,
        campaign_partner_id: i32,
        custom_params: Option<sea_orm::JsonValue>,
    ) -> Result<entity::partner_link::Model, DbErr> {
        let link = entity::partner_link::ActiveModel {
            short_code: ActiveValue::Set(short_code.to_string()),
            campaign_partner_id: ActiveValue::Set(campaign_partner_id),
            custom_params: ActiveValue::Set(custom_params),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        link.insert(self.db).await
    }

    pub async fn find_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<entity::partner_link::Model>, DbErr> {
        entity::prelude::PartnerLink::find()
            .filter(entity::partner_link::Column::ShortCode.eq(short_code))
            .one(self.db)
            .await
    }
}
