//! Payout batching and the payout state machine.
//!
//! `create_payout` allocates approved, not-yet-paid conversions for one
//! partner and period in a single all-or-nothing transaction; the unique
//! allocation index guarantees a commissioned conversion is never paid out
//! twice, even under concurrent runs. State transitions are conditional
//! updates: pending -> processing -> completed | failed, failed -> pending.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, SqlErr};

use entity::payout::PayoutStatus;

use crate::{
    data::{
        conversion::ConversionRepository,
        partner::PartnerRepository,
        payout::{PayoutAllocation, PayoutRepository},
    },
    error::{payout::PayoutError, Error},
    provider::PaymentProviderClient,
};

/// Disbursement currency for payouts.
static PAYOUT_CURRENCY: &str = "USD";

pub struct PayoutService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PayoutService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a pending payout covering every approved, unallocated
    /// conversion of the partner within `[period_start, period_end)`.
    ///
    /// Selection and allocation happen transactionally; when a concurrent
    /// run already claimed part of the selection, this run fails cleanly
    /// with `AlreadyAllocated` and persists nothing.
    pub async fn create_payout(
        &self,
        partner_id: i32,
        payment_method: &str,
        period_start: NaiveDateTime,
        period_end: NaiveDateTime,
    ) -> Result<entity::payout::Model, Error> {
        let conversion_repo = ConversionRepository::new(self.db);
        let payout_repo = PayoutRepository::new(self.db);

        let events = conversion_repo
            .find_unallocated_approved(partner_id, period_start, period_end)
            .await?;

        if events.is_empty() {
            return Err(PayoutError::NothingToPayOut(partner_id).into());
        }

        let mut amount = Decimal::ZERO;
        let mut allocations = Vec::with_capacity(events.len());
        for event in &events {
            // find_unallocated_approved only selects commissioned rows
            let Some(commission) = event.commission_amount else {
                continue;
            };

            amount += commission;
            allocations.push(PayoutAllocation {
                conversion_event_id: event.id,
                amount: commission,
            });
        }

        let payout = payout_repo
            .create_with_allocations(
                partner_id,
                payment_method,
                period_start,
                period_end,
                PAYOUT_CURRENCY,
                amount,
                allocations,
            )
            .await
            .map_err(|err| {
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    Error::PayoutError(PayoutError::AlreadyAllocated)
                } else {
                    Error::DbErr(err)
                }
            })?;

        tracing::info!(
            payout_id = payout.id,
            partner_id,
            amount = %payout.amount,
            "Created payout"
        );

        Ok(payout)
    }

    /// Moves a pending payout to `processing` and fires the provider
    /// disbursement call. The call is fire-and-forget: the provider's
    /// confirmation arrives out of band and completes or fails the payout.
    pub async fn mark_processing(
        &self,
        payout_id: i32,
        provider: &PaymentProviderClient,
    ) -> Result<entity::payout::Model, Error> {
        let payout = self
            .transition(payout_id, PayoutStatus::Pending, PayoutStatus::Processing, None, None)
            .await?;

        let provider = provider.clone();
        let amount = payout.amount;
        let destination = payout.payment_method.clone();
        let currency = payout.currency.clone();

        tokio::spawn(async move {
            match provider.disburse(amount, &currency, &destination).await {
                Ok(provider_txn_id) => {
                    tracing::info!(payout_id, provider_txn_id, "Disbursement submitted");
                }
                Err(err) => {
                    tracing::error!(payout_id, "Disbursement call failed: {err}");
                }
            }
        });

        Ok(payout)
    }

    /// Confirms a processing payout with the provider's transaction id.
    pub async fn mark_completed(
        &self,
        payout_id: i32,
        provider_txn_id: &str,
    ) -> Result<entity::payout::Model, Error> {
        self.transition(
            payout_id,
            PayoutStatus::Processing,
            PayoutStatus::Completed,
            Some(provider_txn_id),
            None,
        )
        .await
    }

    /// Fails a processing payout, recording the reason.
    pub async fn mark_failed(
        &self,
        payout_id: i32,
        reason: &str,
    ) -> Result<entity::payout::Model, Error> {
        self.transition(
            payout_id,
            PayoutStatus::Processing,
            PayoutStatus::Failed,
            None,
            Some(reason),
        )
        .await
    }

    /// Manual retry: returns a failed payout to `pending`.
    pub async fn retry(&self, payout_id: i32) -> Result<entity::payout::Model, Error> {
        self.transition(payout_id, PayoutStatus::Failed, PayoutStatus::Pending, None, None)
            .await
    }

    /// Scheduled sweep: creates a payout per payable partner for the
    /// previous calendar month. Partners with nothing to pay are skipped.
    /// Returns the number of payouts created.
    pub async fn run_monthly_sweep(&self, now: NaiveDateTime) -> Result<u32, Error> {
        let partner_repo = PartnerRepository::new(self.db);
        let (period_start, period_end) = previous_month(now);

        let mut created = 0;
        for partner in partner_repo.find_payable().await? {
            // find_payable only returns partners with a payment method
            let Some(payment_method) = partner.payment_method.clone() else {
                continue;
            };

            match self
                .create_payout(partner.id, &payment_method, period_start, period_end)
                .await
            {
                Ok(_) => created += 1,
                Err(Error::PayoutError(PayoutError::NothingToPayOut(_))) => continue,
                Err(Error::PayoutError(PayoutError::AlreadyAllocated)) => {
                    tracing::warn!(
                        partner_id = partner.id,
                        "Concurrent sweep already allocated this partner's conversions"
                    );
                    continue;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(created)
    }

    /// Applies a conditional state transition, surfacing the actual state
    /// when the payout has moved on (or never existed in `expected`).
    async fn transition(
        &self,
        payout_id: i32,
        expected: PayoutStatus,
        next: PayoutStatus,
        provider_txn_id: Option<&str>,
        failure_reason: Option<&str>,
    ) -> Result<entity::payout::Model, Error> {
        let payout_repo = PayoutRepository::new(self.db);

        let moved = payout_repo
            .transition(payout_id, expected, next, provider_txn_id, failure_reason)
            .await?;

        if moved == 0 {
            let current = payout_repo
                .get(payout_id)
                .await?
                .ok_or(PayoutError::NotFound(payout_id))?;

            return Err(PayoutError::InvalidStateTransition {
                payout_id,
                from: current.status,
                to: next,
            }
            .into());
        }

        let payout = payout_repo
            .get(payout_id)
            .await?
            .ok_or(PayoutError::NotFound(payout_id))?;

        Ok(payout)
    }
}

/// The previous calendar month as `[start, end)` in naive UTC.
fn previous_month(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let today = now.date();
    let this_month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .unwrap_or(today)
        .and_hms_opt(0, 0, 0)
        .unwrap_or(now);

    let previous_start = if today.month() == 1 {
        NaiveDate::from_ymd_opt(today.year() - 1, 12, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() - 1, 1)
    }
    .unwrap_or(today)
    .and_hms_opt(0, 0, 0)
    .unwrap_or(now);

    (previous_start, this_month_start)
}
