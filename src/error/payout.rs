use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use entity::payout::PayoutStatus;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum PayoutError {
    #[error("Payout {payout_id} cannot transition from {from:?} to {to:?}")]
    InvalidStateTransition {
        payout_id: i32,
        from: PayoutStatus,
        to: PayoutStatus,
    },
    #[error("No approved unallocated conversions for partner {0} in the requested period")]
    NothingToPayOut(i32),
    #[error("A conversion in the selected set is already allocated to another payout")]
    AlreadyAllocated,
    #[error("Payout {0} not found")]
    NotFound(i32),
}

impl IntoResponse for PayoutError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::InvalidStateTransition { .. } => StatusCode::CONFLICT,
            Self::NothingToPayOut(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::AlreadyAllocated => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        tracing::debug!("{}", self);

        (
            status,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
