use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

/// Why a conversion could not be attributed.
///
/// An unattributed conversion is still persisted (flagged low confidence,
/// commission withheld); this error only surfaces when a caller asks for an
/// attribution that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnattributedReason {
    /// Neither a cookie id nor a click id was supplied.
    NoIdentity,
    /// The referenced cookie or click does not exist.
    UnknownIdentity,
    /// The cookie exists but its window expired before the conversion.
    CookieExpired,
    /// The cookie exists but never recorded a touch.
    NoTouchRecorded,
}

impl std::fmt::Display for UnattributedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::NoIdentity => "no cookie or click id supplied",
            Self::UnknownIdentity => "referenced cookie or click not found",
            Self::CookieExpired => "cookie window expired",
            Self::NoTouchRecorded => "cookie has no recorded touch",
        };
        write!(f, "{}", reason)
    }
}

#[derive(Error, Debug)]
pub enum AttributionError {
    #[error("Conversion could not be attributed: {0}")]
    Unattributed(UnattributedReason),
    #[error("Conversion {0:?} references event type {1:?} which is not in the vendor's catalog")]
    UnknownEventType(String, String),
    #[error("Conversion must carry a transaction id or an idempotency key")]
    MissingDedupeKey,
}

impl IntoResponse for AttributionError {
    fn into_response(self) -> Response {
        match self {
            Self::Unattributed(_) => {
                tracing::debug!("{}", self);

                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ErrorDto {
                        error: self.to_string(),
                    }),
                )
                    .into_response()
            }
            Self::UnknownEventType(_, _) | Self::MissingDedupeKey => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorDto {
                    error: self.to_string(),
                }),
            )
                .into_response(),
        }
    }
}
