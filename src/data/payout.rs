use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, TransactionTrait,
};

use entity::payout::PayoutStatus;

/// One allocation line: a conversion's commission amount earmarked for a
/// payout.
pub struct PayoutAllocation {
    pub conversion_event_id: i64,
    pub amount: Decimal,
}

pub struct PayoutRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PayoutRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a pending payout together with its allocation rows in one
    /// transaction: either the payout and every allocation commit, or
    /// nothing does. A unique index on `conversion_event_id` aborts the
    /// whole transaction if any event is already allocated elsewhere.
    pub async fn create_with_allocations(
        &self,
        partner_id: i32,
        payment_method: &str,
        period_start: NaiveDateTime,
        period_end: NaiveDateTime,
        currency: &str,
        amount: Decimal,
        allocations: Vec<PayoutAllocation>,
    ) -> Result<entity::payout::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let txn = self.db.begin().await?;

        let payout = entity::payout::ActiveModel {
            partner_id: ActiveValue::Set(partner_id),
            payment_method: ActiveValue::Set(payment_method.to_string()),
            period_start: ActiveValue::Set(period_start),
            period_end: ActiveValue::Set(period_end),
            amount: ActiveValue::Set(amount),
            currency: ActiveValue::Set(currency.to_string()),
            status: ActiveValue::Set(PayoutStatus::Pending),
            provider_txn_id: ActiveValue::Set(None),
            failure_reason: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        let payout = payout.insert(&txn).await?;

        for allocation in allocations {
            let row = entity::payout_event::ActiveModel {
                payout_id: ActiveValue::Set(payout.id),
                conversion_event_id: ActiveValue::Set(allocation.conversion_event_id),
                amount: ActiveValue::Set(allocation.amount),
                created_at: ActiveValue::Set(now),
                ..Default::default()
            };
            row.insert(&txn).await?;
        }

        txn.commit().await?;

        Ok(payout)
    }

    pub async fn get(&self, payout_id: i32) -> Result<Option<entity::payout::Model>, DbErr> {
        entity::prelude::Payout::find_by_id(payout_id).one(self.db).await
    }

    pub async fn list_allocations(
        &self,
        payout_id: i32,
    ) -> Result<Vec<entity::payout_event::Model>, DbErr> {
        entity::prelude::PayoutEvent::find()
            .filter(entity::payout_event::Column::PayoutId.eq(payout_id))
            .all(self.db)
            .await
    }

    /// Conditional state transition: only applies while the payout is still
    /// in `expected`. Returns the number of rows moved (0 when the payout
    /// changed state concurrently or does not exist).
    pub async fn transition(
        &self,
        payout_id: i32,
        expected: PayoutStatus,
        next: PayoutStatus,
        provider_txn_id: Option<&str>,
        failure_reason: Option<&str>,
    ) -> Result<u64, DbErr> {
        let mut update = entity::prelude::Payout::update_many()
            .col_expr(entity::payout::Column::Status, Expr::value(next))
            .col_expr(
                entity::payout::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(entity::payout::Column::Id.eq(payout_id))
            .filter(entity::payout::Column::Status.eq(expected));

        if let Some(txn_id) = provider_txn_id {
            update = update.col_expr(
                entity::payout::Column::ProviderTxnId,
                Expr::value(txn_id.to_string()),
            );
        }
        if let Some(reason) = failure_reason {
            update = update.col_expr(
                entity::payout::Column::FailureReason,
                Expr::value(reason.to_string()),
            );
        }

        let result = update.exec(self.db).await?;

        Ok(result.rows_affected)
    }
}
