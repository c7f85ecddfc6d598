//! Commission rule representation.
//!
//! Rules are stored as JSON columns (campaign default, event-type default,
//! per-partner override) as a closed tagged union validated at write time,
//! never consumed as loose key-value data at read time.

use rust_decimal::Decimal;
use sea_orm::JsonValue;
use serde::{Deserialize, Serialize};

use entity::conversion_event::CommissionType;

use crate::error::commission::CommissionError;

/// What a tiered rule accumulates to select the applicable tier.
///
/// Bucketing is pre-event and lifetime-cumulative: the value accumulated by
/// the (partner, campaign) pair strictly before the conversion being priced
/// decides the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierBasis {
    /// Count of previously commissioned conversions.
    ConversionCount,
    /// Sum of previously commissioned conversions' event values.
    Gmv,
}

/// A single tier: `[min, max)` with `max == None` meaning unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub min: Decimal,
    pub max: Option<Decimal>,
    /// Percentage rate applied to the conversion's event value.
    pub rate: Decimal,
}

/// Closed tagged union of supported commission rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommissionRule {
    Flat { value: Decimal },
    Percentage { value: Decimal },
    Tiered { basis: TierBasis, tiers: Vec<Tier> },
}

impl CommissionRule {
    pub fn commission_type(&self) -> CommissionType {
        match self {
            CommissionRule::Flat { .. } => CommissionType::Flat,
            CommissionRule::Percentage { .. } => CommissionType::Percentage,
            CommissionRule::Tiered { .. } => CommissionType::Tiered,
        }
    }

    /// Parses a rule from a stored JSON column value.
    ///
    /// Stored rules were validated when written, so a parse failure here
    /// indicates an out-of-band edit of the column.
    pub fn from_json(value: &JsonValue) -> Result<Self, CommissionError> {
        serde_json::from_value(value.clone())
            .map_err(|err| CommissionError::InvalidRule(err.to_string()))
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).expect("commission rule serialization is infallible")
    }
}
