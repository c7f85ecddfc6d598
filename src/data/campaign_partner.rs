use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, ExprTrait, QueryFilter,
};

use entity::campaign_partner::EnrollmentStatus;

pub struct CampaignPartnerRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CampaignPartnerRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        campaign_id: i32,
        partner_id: i32,
        status: EnrollmentStatus,
    ) -> Result<entity::campaign_partner::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let enrollment = entity::campaign_partner::ActiveModel {
            campaign_id: ActiveValue::Set(campaign_id),
            partner_id: ActiveValue::Set(partner_id),
            status: ActiveValue::Set(status),
            total_clicks: ActiveValue::Set(0),
            total_conversions: ActiveValue::Set(0),
            total_revenue: ActiveValue::Set(Decimal::ZERO),
            total_commission: ActiveValue::Set(Decimal::ZERO),
            last_click_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        enrollment.insert(self.db).await
    }

    pub async fn get(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<entity::campaign_partner::Model>, DbErr> {
        entity::prelude::CampaignPartner::find_by_id(enrollment_id)
            .one(self.db)
            .await
    }

    pub async fn find_pair(
        &self,
        campaign_id: i32,
        partner_id: i32,
    ) -> Result<Option<entity::campaign_partner::Model>, DbErr> {
        entity::prelude::CampaignPartner::find()
            .filter(entity::campaign_partner::Column::CampaignId.eq(campaign_id))
            .filter(entity::campaign_partner::Column::PartnerId.eq(partner_id))
            .one(self.db)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<entity::campaign_partner::Model>, DbErr> {
        entity::prelude::CampaignPartner::find().all(self.db).await
    }

    pub async fn set_status(
        &self,
        enrollment_id: i32,
        status: EnrollmentStatus,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::CampaignPartner::update_many()
            .col_expr(entity::campaign_partner::Column::Status, Expr::value(status))
            .col_expr(
                entity::campaign_partner::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(entity::campaign_partner::Column::Id.eq(enrollment_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// At-least-once increment of the click display counters. A single
    /// in-database increment so concurrent clicks never lose an update.
    pub async fn increment_click_counters(
        &self,
        enrollment_id: i32,
        clicked_at: NaiveDateTime,
    ) -> Result<(), DbErr> {
        entity::prelude::CampaignPartner::update_many()
            .col_expr(
                entity::campaign_partner::Column::TotalClicks,
                Expr::col(entity::campaign_partner::Column::TotalClicks).add(1),
            )
            .col_expr(
                entity::campaign_partner::Column::LastClickAt,
                Expr::value(clicked_at),
            )
            .col_expr(
                entity::campaign_partner::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(entity::campaign_partner::Column::Id.eq(enrollment_id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// At-least-once increment of the conversion display counters.
    pub async fn increment_conversion_counters(
        &self,
        enrollment_id: i32,
        revenue: Decimal,
        commission: Decimal,
    ) -> Result<(), DbErr> {
        entity::prelude::CampaignPartner::update_many()
            .col_expr(
                entity::campaign_partner::Column::TotalConversions,
                Expr::col(entity::campaign_partner::Column::TotalConversions).add(1),
            )
            .col_expr(
                entity::campaign_partner::Column::TotalRevenue,
                Expr::col(entity::campaign_partner::Column::TotalRevenue).add(revenue),
            )
            .col_expr(
                entity::campaign_partner::Column::TotalCommission,
                Expr::col(entity::campaign_partner::Column::TotalCommission).add(commission),
            )
            .col_expr(
                entity::campaign_partner::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(entity::campaign_partner::Column::Id.eq(enrollment_id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Overwrites the display counters with values recomputed from the
    /// source-of-truth event tables. Used by the reconciliation job.
    pub async fn set_counters(
        &self,
        enrollment_id: i32,
        total_clicks: i64,
        total_conversions: i64,
        total_revenue: Decimal,
        total_commission: Decimal,
        last_click_at: Option<NaiveDateTime>,
    ) -> Result<(), DbErr> {
        entity::prelude::CampaignPartner::update_many()
            .col_expr(
                entity::campaign_partner::Column::TotalClicks,
                Expr::value(total_clicks),
            )
            .col_expr(
                entity::campaign_partner::Column::TotalConversions,
                Expr::value(total_conversions),
            )
            .col_expr(
                entity::campaign_partner::Column::TotalRevenue,
                Expr::value(total_revenue),
            )
            .col_expr(
                entity::campaign_partner::Column::TotalCommission,
                Expr::value(total_commission),
            )
            .col_expr(
                entity::campaign_partner::Column::LastClickAt,
                Expr::value(last_click_at),
            )
            .col_expr(
                entity::campaign_partner::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(entity::campaign_partner::Column::Id.eq(enrollment_id))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
