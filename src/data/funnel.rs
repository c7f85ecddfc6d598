use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};
use uuid::Uuid;

/// One recomputed journey rollup, ready for insertion.
pub struct JourneyRollup {
    pub cookie_id: Uuid,
    pub partner_id: i32,
    pub campaign_id: i32,
    pub journey_started_at: NaiveDateTime,
    pub last_event_at: NaiveDateTime,
    pub total_events: i64,
    pub total_commission: Decimal,
    pub is_converted: bool,
}

pub struct FunnelJourneyRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> FunnelJourneyRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Replaces the whole projection with freshly computed rollups.
    ///
    /// The table is derived state; a full delete-and-rebuild keeps the
    /// recompute idempotent and free of drift from partial updates.
    pub async fn replace_all(
        &self,
        rollups: Vec<JourneyRollup>,
        recomputed_at: NaiveDateTime,
    ) -> Result<u64, DbErr> {
        entity::prelude::FunnelJourney::delete_many()
            .exec(self.db)
            .await?;

        if rollups.is_empty() {
            return Ok(0);
        }

        let rows: Vec<entity::funnel_journey::ActiveModel> = rollups
            .into_iter()
            .map(|rollup| entity::funnel_journey::ActiveModel {
                cookie_id: ActiveValue::Set(rollup.cookie_id),
                partner_id: ActiveValue::Set(rollup.partner_id),
                campaign_id: ActiveValue::Set(rollup.campaign_id),
                journey_started_at: ActiveValue::Set(rollup.journey_started_at),
                last_event_at: ActiveValue::Set(rollup.last_event_at),
                total_events: ActiveValue::Set(rollup.total_events),
                total_commission: ActiveValue::Set(rollup.total_commission),
                is_converted: ActiveValue::Set(rollup.is_converted),
                recomputed_at: ActiveValue::Set(recomputed_at),
                ..Default::default()
            })
            .collect();

        let inserted = rows.len() as u64;
        entity::prelude::FunnelJourney::insert_many(rows)
            .exec(self.db)
            .await?;

        Ok(inserted)
    }

    pub async fn find_by_key(
        &self,
        cookie_id: Uuid,
        partner_id: i32,
        campaign_id: i32,
    ) -> Result<Option<entity::funnel_journey::Model>, DbErr> {
        entity::prelude::FunnelJourney::find()
            .filter(entity::funnel_journey::Column::CookieId.eq(cookie_id))
            .filter(entity::funnel_journey::Column::PartnerId.eq(partner_id))
            .filter(entity::funnel_journey::Column::CampaignId.eq(campaign_id))
            .one(self.db)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<entity::funnel_journey::Model>, DbErr> {
        entity::prelude::FunnelJourney::find().all(self.db).await
    }
}
