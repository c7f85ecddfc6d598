//! Commission calculation.
//!
//! Resolution order, first match wins: an active per-partner override scoped
//! to the event type, then the event type's own default rule, then the
//! campaign default. Amounts are rounded half-even to the currency's two
//! minor-unit digits and clamped at zero.

pub mod tiers;

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::DatabaseConnection;

use entity::conversion_event::CommissionType;

use crate::{
    data::{commission_override::CommissionOverrideRepository, conversion::ConversionRepository},
    error::{commission::CommissionError, Error},
    model::commission::{CommissionRule, TierBasis},
    service::commission::tiers::select_tier,
};

/// Result of a commission computation for one attributed conversion.
pub struct ComputedCommission {
    pub commission_type: CommissionType,
    /// The resolved rate or flat value; for tiered rules, the selected
    /// tier's rate.
    pub value: Decimal,
    pub amount: Decimal,
    /// Set when the computed amount had to be clamped to zero.
    pub needs_review: bool,
}

pub struct CommissionService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CommissionService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes the commission for an attributed conversion of a
    /// commissionable event type.
    pub async fn compute(
        &self,
        partner_id: i32,
        campaign: &entity::campaign::Model,
        event_type: &entity::event_type::Model,
        event_value: Option<Decimal>,
        occurred_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<ComputedCommission, Error> {
        let rule = self
            .resolve_rule(partner_id, campaign, event_type, now)
            .await?;

        let (value, raw_amount) = match &rule {
            CommissionRule::Flat { value } => (*value, *value),
            CommissionRule::Percentage { value } => {
                let event_value = event_value.ok_or(CommissionError::MissingEventValue)?;

                (*value, event_value * *value / Decimal::ONE_HUNDRED)
            }
            CommissionRule::Tiered { basis, tiers } => {
                let event_value = event_value.ok_or(CommissionError::MissingEventValue)?;

                let conversion_repo = ConversionRepository::new(self.db);
                let cumulative = match basis {
                    TierBasis::ConversionCount => {
                        let count = conversion_repo
                            .cumulative_conversion_count(partner_id, campaign.id, occurred_at)
                            .await?;

                        Decimal::from(count)
                    }
                    TierBasis::Gmv => {
                        conversion_repo
                            .cumulative_gmv(partner_id, campaign.id, occurred_at)
                            .await?
                    }
                };

                let tier = select_tier(tiers, cumulative).ok_or_else(|| {
                    CommissionError::InvalidRule("stored tier table is empty".to_string())
                })?;

                (tier.rate, event_value * tier.rate / Decimal::ONE_HUNDRED)
            }
        };

        let rounded = round_to_minor_unit(raw_amount);

        // A negative amount is never forwarded to payouts; it is clamped and
        // flagged for manual review instead.
        let (amount, needs_review) = if rounded.is_sign_negative() {
            tracing::warn!(
                partner_id,
                campaign_id = campaign.id,
                amount = %rounded,
                "Computed commission is negative; clamping to zero for review"
            );

            (Decimal::ZERO, true)
        } else {
            (rounded, false)
        };

        Ok(ComputedCommission {
            commission_type: rule.commission_type(),
            value,
            amount,
            needs_review,
        })
    }

    /// Resolves the applicable rule for this (partner, campaign, event type)
    /// scope at `now`.
    async fn resolve_rule(
        &self,
        partner_id: i32,
        campaign: &entity::campaign::Model,
        event_type: &entity::event_type::Model,
        now: NaiveDateTime,
    ) -> Result<CommissionRule, Error> {
        let override_repo = CommissionOverrideRepository::new(self.db);

        if let Some(commission_override) = override_repo
            .find_active(partner_id, campaign.id, event_type.id, now)
            .await?
        {
            return Ok(CommissionRule::from_json(&commission_override.rule)?);
        }

        if let Some(default_rule) = &event_type.default_rule {
            return Ok(CommissionRule::from_json(default_rule)?);
        }

        Ok(CommissionRule::from_json(&campaign.commission_rule)?)
    }
}

/// Round-half-even to the currency's two minor-unit digits.
pub fn round_to_minor_unit(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}
