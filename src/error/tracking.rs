use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("No partner link found for short code {0:?}")]
    UnknownLink(String),
    #[error("No visitor cookie found for id {0}")]
    UnknownCookie(Uuid),
    #[error("Partner link {0} references campaign enrollment {1} which does not exist")]
    OrphanedLink(i32, i32),
}

impl IntoResponse for TrackingError {
    fn into_response(self) -> Response {
        match self {
            Self::UnknownLink(_) => {
                tracing::debug!("{}", self);

                (
                    StatusCode::NOT_FOUND,
                    Json(ErrorDto {
                        error: "Link not found".to_string(),
                    }),
                )
                    .into_response()
            }
            Self::UnknownCookie(_) => {
                tracing::debug!("{}", self);

                (
                    StatusCode::NOT_FOUND,
                    Json(ErrorDto {
                        error: "Visitor not found".to_string(),
                    }),
                )
                    .into_response()
            }
            Self::OrphanedLink(_, _) => super::InternalServerError(self).into_response(),
        }
    }
}
