use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Expr, Query},
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use entity::conversion_event::{
    AttributionConfidence, AttributionType, CommissionType, ConversionStatus,
};

pub struct NewConversion {
    pub dedupe_key: String,
    pub event_type_id: i32,
    pub cookie_id: Option<Uuid>,
    pub click_id: Option<i64>,
    pub partner_id: Option<i32>,
    pub campaign_id: Option<i32>,
    pub attribution_type: AttributionType,
    pub attribution_confidence: AttributionConfidence,
    pub event_value: Option<Decimal>,
    pub commission_type: Option<CommissionType>,
    pub commission_value: Option<Decimal>,
    pub commission_amount: Option<Decimal>,
    pub needs_review: bool,
    pub occurred_at: NaiveDateTime,
}

pub struct ConversionRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ConversionRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// First-write-wins insert keyed by `dedupe_key`.
    ///
    /// On a duplicate key the stored row is returned untouched, making
    /// ingestion idempotent under at-least-once delivery. The boolean is
    /// true when this call created the row.
    pub async fn insert_first_write_wins(
        &self,
        new: NewConversion,
    ) -> Result<(entity::conversion_event::Model, bool), DbErr> {
        let now = chrono::Utc::now().naive_utc();
        let dedupe_key = new.dedupe_key.clone();

        let event = entity::conversion_event::ActiveModel {
            dedupe_key: ActiveValue::Set(new.dedupe_key),
            event_type_id: ActiveValue::Set(new.event_type_id),
            cookie_id: ActiveValue::Set(new.cookie_id),
            click_id: ActiveValue::Set(new.click_id),
            partner_id: ActiveValue::Set(new.partner_id),
            campaign_id: ActiveValue::Set(new.campaign_id),
            attribution_type: ActiveValue::Set(new.attribution_type),
            attribution_confidence: ActiveValue::Set(new.attribution_confidence),
            event_value: ActiveValue::Set(new.event_value),
            commission_type: ActiveValue::Set(new.commission_type),
            commission_value: ActiveValue::Set(new.commission_value),
            commission_amount: ActiveValue::Set(new.commission_amount),
            status: ActiveValue::Set(ConversionStatus::Pending),
            needs_review: ActiveValue::Set(new.needs_review),
            occurred_at: ActiveValue::Set(new.occurred_at),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        match event.insert(self.db).await {
            Ok(model) => Ok((model, true)),
            Err(err) => {
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    let stored = self
                        .find_by_dedupe_key(&dedupe_key)
                        .await?
                        .ok_or_else(|| {
                            DbErr::RecordNotFound(format!(
                                "conversion event {dedupe_key} vanished after duplicate insert"
                            ))
                        })?;

                    Ok((stored, false))
                } else {
                    Err(err)
                }
            }
        }
    }

    pub async fn find_by_dedupe_key(
        &self,
        dedupe_key: &str,
    ) -> Result<Option<entity::conversion_event::Model>, DbErr> {
        entity::prelude::ConversionEvent::find()
            .filter(entity::conversion_event::Column::DedupeKey.eq(dedupe_key))
            .one(self.db)
            .await
    }

    pub async fn get(
        &self,
        event_id: i64,
    ) -> Result<Option<entity::conversion_event::Model>, DbErr> {
        entity::prelude::ConversionEvent::find_by_id(event_id).one(self.db).await
    }

    pub async fn set_status(
        &self,
        event_id: i64,
        status: ConversionStatus,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::ConversionEvent::update_many()
            .col_expr(entity::conversion_event::Column::Status, Expr::value(status))
            .col_expr(
                entity::conversion_event::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().naive_utc()),
            )
            .filter(entity::conversion_event::Column::Id.eq(event_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Count of commissioned conversions for the pair strictly before the
    /// given timestamp. Pre-event cumulative basis for tiered rules.
    pub async fn cumulative_conversion_count(
        &self,
        partner_id: i32,
        campaign_id: i32,
        before: NaiveDateTime,
    ) -> Result<u64, DbErr> {
        entity::prelude::ConversionEvent::find()
            .filter(entity::conversion_event::Column::PartnerId.eq(partner_id))
            .filter(entity::conversion_event::Column::CampaignId.eq(campaign_id))
            .filter(entity::conversion_event::Column::OccurredAt.lt(before))
            .filter(entity::conversion_event::Column::Status.ne(ConversionStatus::Rejected))
            .filter(entity::conversion_event::Column::CommissionAmount.is_not_null())
            .count(self.db)
            .await
    }

    /// Summed event value of commissioned conversions for the pair strictly
    /// before the given timestamp. Pre-event cumulative GMV basis.
    pub async fn cumulative_gmv(
        &self,
        partner_id: i32,
        campaign_id: i32,
        before: NaiveDateTime,
    ) -> Result<Decimal, DbErr> {
        let total: Option<Option<Decimal>> = entity::prelude::ConversionEvent::find()
            .select_only()
            .column_as(entity::conversion_event::Column::EventValue.sum(), "total")
            .filter(entity::conversion_event::Column::PartnerId.eq(partner_id))
            .filter(entity::conversion_event::Column::CampaignId.eq(campaign_id))
            .filter(entity::conversion_event::Column::OccurredAt.lt(before))
            .filter(entity::conversion_event::Column::Status.ne(ConversionStatus::Rejected))
            .filter(entity::conversion_event::Column::CommissionAmount.is_not_null())
            .filter(entity::conversion_event::Column::EventValue.is_not_null())
            .into_tuple()
            .one(self.db)
            .await?;

        Ok(total.flatten().unwrap_or(Decimal::ZERO))
    }

    /// Approved, commissioned conversions within `[period_start, period_end)`
    /// that no payout has allocated yet.
    pub async fn find_unallocated_approved(
        &self,
        partner_id: i32,
        period_start: NaiveDateTime,
        period_end: NaiveDateTime,
    ) -> Result<Vec<entity::conversion_event::Model>, DbErr> {
        entity::prelude::ConversionEvent::find()
            .filter(entity::conversion_event::Column::PartnerId.eq(partner_id))
            .filter(entity::conversion_event::Column::Status.eq(ConversionStatus::Approved))
            .filter(entity::conversion_event::Column::CommissionAmount.gt(Decimal::ZERO))
            .filter(entity::conversion_event::Column::OccurredAt.gte(period_start))
            .filter(entity::conversion_event::Column::OccurredAt.lt(period_end))
            .filter(
                entity::conversion_event::Column::Id.not_in_subquery(
                    Query::select()
                        .column(entity::payout_event::Column::ConversionEventId)
                        .from(entity::prelude::PayoutEvent)
                        .to_owned(),
                ),
            )
            .order_by_asc(entity::conversion_event::Column::OccurredAt)
            .all(self.db)
            .await
    }

    /// Fully attributed conversions, grouped later by the funnel aggregator.
    pub async fn list_attributed(&self) -> Result<Vec<entity::conversion_event::Model>, DbErr> {
        entity::prelude::ConversionEvent::find()
            .filter(entity::conversion_event::Column::CookieId.is_not_null())
            .filter(entity::conversion_event::Column::PartnerId.is_not_null())
            .filter(entity::conversion_event::Column::CampaignId.is_not_null())
            .order_by_asc(entity::conversion_event::Column::OccurredAt)
            .all(self.db)
            .await
    }

    /// Source-of-truth conversion totals for one (partner, campaign) pair,
    /// used by the counter reconciliation job.
    pub async fn totals_for_pair(
        &self,
        partner_id: i32,
        campaign_id: i32,
    ) -> Result<(u64, Decimal, Decimal), DbErr> {
        let count = entity::prelude::ConversionEvent::find()
            .filter(entity::conversion_event::Column::PartnerId.eq(partner_id))
            .filter(entity::conversion_event::Column::CampaignId.eq(campaign_id))
            .filter(entity::conversion_event::Column::Status.ne(ConversionStatus::Rejected))
            .count(self.db)
            .await?;

        let revenue: Option<Option<Decimal>> = entity::prelude::ConversionEvent::find()
            .select_only()
            .column_as(entity::conversion_event::Column::EventValue.sum(), "total")
            .filter(entity::conversion_event::Column::PartnerId.eq(partner_id))
            .filter(entity::conversion_event::Column::CampaignId.eq(campaign_id))
            .filter(entity::conversion_event::Column::Status.ne(ConversionStatus::Rejected))
            .into_tuple()
            .one(self.db)
            .await?;

        let commission: Option<Option<Decimal>> = entity::prelude::ConversionEvent::find()
            .select_only()
            .column_as(
                entity::conversion_event::Column::CommissionAmount.sum(),
                "total",
            )
            .filter(entity::conversion_event::Column::PartnerId.eq(partner_id))
            .filter(entity::conversion_event::Column::CampaignId.eq(campaign_id))
            .filter(entity::conversion_event::Column::Status.ne(ConversionStatus::Rejected))
            .into_tuple()
            .one(self.db)
            .await?;

        Ok((
            count,
            revenue.flatten().unwrap_or(Decimal::ZERO),
            commission.flatten().unwrap_or(Decimal::ZERO),
        ))
    }
}
