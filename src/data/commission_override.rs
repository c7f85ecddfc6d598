use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

pub struct CommissionOverrideRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CommissionOverrideRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        partner_id: i32,
        campaign_id: i32,
        event_type_id: i32,
        rule: sea_orm::JsonValue,
        valid_from: NaiveDateTime,
        valid_until: Option<NaiveDateTime>,
    ) -> Result<entity::commission_override::Model, DbErr> {
        let commission_override = entity::commission_override::ActiveModel {
            partner_id: ActiveValue::Set(partner_id),
            campaign_id: ActiveValue::Set(campaign_id),
            event_type_id: ActiveValue::Set(event_type_id),
            rule: ActiveValue::Set(rule),
            valid_from: ActiveValue::Set(valid_from),
            valid_until: ActiveValue::Set(valid_until),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        commission_override.insert(self.db).await
    }

    /// The override active at `now` for this (partner, campaign, event type)
    /// scope: `valid_from <= now < valid_until`, open-ended when
    /// `valid_until` is null. The newest matching override wins.
    pub async fn find_active(
        &self,
        partner_id: i32,
        campaign_id: i32,
        event_type_id: i32,
        now: NaiveDateTime,
    ) -> Result<Option<entity::commission_override::Model>, DbErr> {
        entity::prelude::CommissionOverride::find()
            .filter(entity::commission_override::Column::PartnerId.eq(partner_id))
            .filter(entity::commission_override::Column::CampaignId.eq(campaign_id))
            .filter(entity::commission_override::Column::EventTypeId.eq(event_type_id))
            .filter(entity::commission_override::Column::ValidFrom.lte(now))
            .filter(
                Condition::any()
                    .add(entity::commission_override::Column::ValidUntil.is_null())
                    .add(entity::commission_override::Column::ValidUntil.gt(now)),
            )
            .order_by_desc(entity::commission_override::Column::ValidFrom)
            .one(self.db)
            .await
    }
}
