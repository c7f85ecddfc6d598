use chrono::NaiveDateTime;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter,
};
use uuid::Uuid;

pub struct CookieRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CookieRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Mints a fresh cookie with no touch pointers.
    pub async fn create(
        &self,
        id: Uuid,
        now: NaiveDateTime,
        expires_at: NaiveDateTime,
    ) -> Result<entity::visitor_cookie::Model, DbErr> {
        let cookie = entity::visitor_cookie::ActiveModel {
            id: ActiveValue::Set(id),
            first_click_id: ActiveValue::Set(None),
            first_partner_id: ActiveValue::Set(None),
            first_campaign_id: ActiveValue::Set(None),
            last_click_id: ActiveValue::Set(None),
            last_partner_id: ActiveValue::Set(None),
            last_campaign_id: ActiveValue::Set(None),
            last_touch_at: ActiveValue::Set(None),
            expires_at: ActiveValue::Set(expires_at),
            last_seen_at: ActiveValue::Set(now),
            created_at: ActiveValue::Set(now),
        };

        cookie.insert(self.db).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<entity::visitor_cookie::Model>, DbErr> {
        entity::prelude::VisitorCookie::find_by_id(id).one(self.db).await
    }

    /// Returns the cookie only while its window is open.
    pub async fn find_live(
        &self,
        id: Uuid,
        now: NaiveDateTime,
    ) -> Result<Option<entity::visitor_cookie::Model>, DbErr> {
        entity::prelude::VisitorCookie::find_by_id(id)
            .filter(entity::visitor_cookie::Column::ExpiresAt.gt(now))
            .one(self.db)
            .await
    }

    /// Refreshes `last_seen_at` and pushes `expires_at` forward so the
    /// window always covers the touching campaign's cookie duration. The
    /// expiry update is conditional so a shorter-lived campaign never
    /// shrinks an already longer window.
    pub async fn touch(
        &self,
        id: Uuid,
        now: NaiveDateTime,
        expires_at_candidate: NaiveDateTime,
    ) -> Result<(), DbErr> {
        entity::prelude::VisitorCookie::update_many()
            .col_expr(
                entity::visitor_cookie::Column::LastSeenAt,
                Expr::value(now),
            )
            .filter(entity::visitor_cookie::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        entity::prelude::VisitorCookie::update_many()
            .col_expr(
                entity::visitor_cookie::Column::ExpiresAt,
                Expr::value(expires_at_candidate),
            )
            .filter(entity::visitor_cookie::Column::Id.eq(id))
            .filter(entity::visitor_cookie::Column::ExpiresAt.lt(expires_at_candidate))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Write-once first-touch pointers: compare-and-set, only applied while
    /// `first_click_id` is still NULL. Concurrent clicks cannot overwrite an
    /// established first touch.
    pub async fn set_first_touch(
        &self,
        id: Uuid,
        click_id: i64,
        partner_id: i32,
        campaign_id: i32,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::VisitorCookie::update_many()
            .col_expr(
                entity::visitor_cookie::Column::FirstClickId,
                Expr::value(click_id),
            )
            .col_expr(
                entity::visitor_cookie::Column::FirstPartnerId,
                Expr::value(partner_id),
            )
            .col_expr(
                entity::visitor_cookie::Column::FirstCampaignId,
                Expr::value(campaign_id),
            )
            .filter(entity::visitor_cookie::Column::Id.eq(id))
            .filter(entity::visitor_cookie::Column::FirstClickId.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Latest-wins last-touch pointers, ordered by click timestamp: the
    /// update only applies when no later click has already claimed the
    /// pointers.
    pub async fn set_last_touch(
        &self,
        id: Uuid,
        click_id: i64,
        partner_id: i32,
        campaign_id: i32,
        occurred_at: NaiveDateTime,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::VisitorCookie::update_many()
            .col_expr(
                entity::visitor_cookie::Column::LastClickId,
                Expr::value(click_id),
            )
            .col_expr(
                entity::visitor_cookie::Column::LastPartnerId,
                Expr::value(partner_id),
            )
            .col_expr(
                entity::visitor_cookie::Column::LastCampaignId,
                Expr::value(campaign_id),
            )
            .col_expr(
                entity::visitor_cookie::Column::LastTouchAt,
                Expr::value(occurred_at),
            )
            .filter(entity::visitor_cookie::Column::Id.eq(id))
            .filter(
                Condition::any()
                    .add(entity::visitor_cookie::Column::LastTouchAt.is_null())
                    .add(entity::visitor_cookie::Column::LastTouchAt.lte(occurred_at)),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
