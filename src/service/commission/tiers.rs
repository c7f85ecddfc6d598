//! Tier table validation and selection.
//!
//! Tables are validated when a campaign or override is saved; selection at
//! computation time never fails for a table that passed validation.

use rust_decimal::Decimal;

use crate::{error::commission::CommissionError, model::commission::Tier};

/// Validates a tier table: non-empty, rates non-negative, tiers sorted by
/// ascending minimum, contiguous `[min, max)` ranges starting at zero, and
/// only the final tier unbounded.
pub fn validate_tiers(tiers: &[Tier]) -> Result<(), CommissionError> {
    let first = tiers.first().ok_or(CommissionError::EmptyTiers)?;

    if !first.min.is_zero() {
        return Err(CommissionError::TierGap(Decimal::ZERO, first.min));
    }

    for tier in tiers {
        if tier.rate.is_sign_negative() {
            return Err(CommissionError::NegativeRate(tier.rate));
        }
    }

    for pair in tiers.windows(2) {
        let (previous, next) = (&pair[0], &pair[1]);

        let previous_max = previous
            .max
            .ok_or(CommissionError::UnboundedInnerTier)?;

        if next.min < previous.min {
            return Err(CommissionError::UnorderedTiers(next.min, previous.min));
        }
        if next.min > previous_max {
            return Err(CommissionError::TierGap(previous_max, next.min));
        }
        if next.min < previous_max {
            return Err(CommissionError::TierOverlap(next.min, previous_max));
        }
    }

    Ok(())
}

/// Selects the tier whose `[min, max)` range contains the cumulative value.
///
/// A cumulative value beyond the highest bounded tier selects the highest
/// tier. Returns `None` only for an empty table, which validation rejects
/// before a rule is ever stored.
pub fn select_tier(tiers: &[Tier], cumulative: Decimal) -> Option<&Tier> {
    for tier in tiers {
        match tier.max {
            Some(max) if cumulative < max => return Some(tier),
            None => return Some(tier),
            Some(_) => continue,
        }
    }

    tiers.last()
}
