//! Error types for the Trackwire server.
//!
//! Each domain (tracking, attribution, commission, payout, payment provider,
//! configuration) has its own thiserror enum; this module aggregates them
//! into a single `Error` with `#[from]` conversions so services can use `?`
//! across layers. All errors implement `IntoResponse` for axum handlers.

pub mod attribution;
pub mod commission;
pub mod config;
pub mod payout;
pub mod provider;
pub mod tracking;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    error::{
        attribution::AttributionError, commission::CommissionError, config::ConfigError,
        payout::PayoutError, provider::ProviderError, tracking::TrackingError,
    },
    model::api::ErrorDto,
};

/// Aggregated error type for the Trackwire server.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Tracking error (unknown link or cookie on the click path).
    #[error(transparent)]
    TrackingError(#[from] TrackingError),
    /// Attribution error (conversion could not be tied to a partner).
    #[error(transparent)]
    AttributionError(#[from] AttributionError),
    /// Commission error (invalid rule configuration or computation input).
    #[error(transparent)]
    CommissionError(#[from] CommissionError),
    /// Payout error (state machine misuse, empty or conflicting allocation).
    #[error(transparent)]
    PayoutError(#[from] PayoutError),
    /// Payment provider error (disbursement call failed or was rejected).
    #[error(transparent)]
    ProviderError(#[from] ProviderError),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    /// Socket/bind error during server startup.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::TrackingError(err) => err.into_response(),
            Self::AttributionError(err) => err.into_response(),
            Self::CommissionError(err) => err.into_response(),
            Self::PayoutError(err) => err.into_response(),
            Self::ProviderError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper converting any displayable error into a 500 response.
///
/// Logs the full error for debugging while returning a generic message to
/// the client so internal details never leak.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
