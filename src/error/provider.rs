use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::error::InternalServerError;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("Payment provider rejected the disbursement ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Payment provider base URL {0:?} is invalid")]
    InvalidBaseUrl(String),
}

impl IntoResponse for ProviderError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}
