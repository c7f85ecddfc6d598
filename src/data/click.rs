use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::model::tracking::RequestMeta;

pub struct ClickRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ClickRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends an immutable click row. Rows are never updated afterwards.
    pub async fn create(
        &self,
        partner_link_id: i32,
        cookie_id: Option<Uuid>,
        meta: &RequestMeta,
        occurred_at: NaiveDateTime,
    ) -> Result<entity::click::Model, DbErr> {
        let click = entity::click::ActiveModel {
            partner_link_id: ActiveValue::Set(partner_link_id),
            cookie_id: ActiveValue::Set(cookie_id),
            occurred_at: ActiveValue::Set(occurred_at),
            utm_source: ActiveValue::Set(meta.utm_source.clone()),
            utm_medium: ActiveValue::Set(meta.utm_medium.clone()),
            utm_campaign: ActiveValue::Set(meta.utm_campaign.clone()),
            referrer: ActiveValue::Set(meta.referrer.clone()),
            ip_address: ActiveValue::Set(meta.ip_address.clone()),
            user_agent: ActiveValue::Set(meta.user_agent.clone()),
            ..Default::default()
        };

        click.insert(self.db).await
    }

    pub async fn get(&self, click_id: i64) -> Result<Option<entity::click::Model>, DbErr> {
        entity::prelude::Click::find_by_id(click_id).one(self.db).await
    }

    /// Source-of-truth click count for one enrollment's links, used by the
    /// counter reconciliation job.
    pub async fn count_for_enrollment(&self, enrollment_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Click::find()
            .inner_join(entity::prelude::PartnerLink)
            .filter(entity::partner_link::Column::CampaignPartnerId.eq(enrollment_id))
            .count(self.db)
            .await
    }

    pub async fn last_click_at_for_enrollment(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<NaiveDateTime>, DbErr> {
        let latest = entity::prelude::Click::find()
            .inner_join(entity::prelude::PartnerLink)
            .filter(entity::partner_link::Column::CampaignPartnerId.eq(enrollment_id))
            .order_by_desc(entity::click::Column::OccurredAt)
            .one(self.db)
            .await?;

        Ok(latest.map(|click| click.occurred_at))
    }
}
