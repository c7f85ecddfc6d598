use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::api::ErrorDto;

/// Commission configuration and computation errors.
///
/// Tier-table errors are raised at campaign save time so that computation
/// over a stored rule never fails for a well-formed table.
#[derive(Error, Debug)]
pub enum CommissionError {
    #[error("A percentage commission cannot be computed without an event value")]
    MissingEventValue,
    #[error("Tier table is empty")]
    EmptyTiers,
    #[error("Tiers must be sorted by ascending minimum, found {0} after {1}")]
    UnorderedTiers(Decimal, Decimal),
    #[error("Gap between tier ending at {0} and tier starting at {1}")]
    TierGap(Decimal, Decimal),
    #[error("Tier starting at {0} overlaps the previous tier ending at {1}")]
    TierOverlap(Decimal, Decimal),
    #[error("Only the last tier may omit its upper bound")]
    UnboundedInnerTier,
    #[error("Commission rate {0} is negative")]
    NegativeRate(Decimal),
    #[error("Invalid commission rule: {0}")]
    InvalidRule(String),
}

impl IntoResponse for CommissionError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
