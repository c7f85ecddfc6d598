use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use entity::conversion_event::ConversionStatus;

use crate::{
    data::conversion::ConversionRepository,
    error::Error,
    model::{
        api::{ConversionResultDto, ErrorDto},
        app::AppState,
    },
};

pub static CONVERSION_REVIEW_TAG: &str = "conversion-review";

/// Approve a conversion
///
/// Approved conversions become eligible for payout allocation. Approval is
/// the only mutation an attributed conversion accepts.
///
/// # Responses
/// - 200 (OK): The approved conversion
/// - 404 (Not Found): No conversion with this id
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/conversions/{conversion_id}/approve",
    tag = CONVERSION_REVIEW_TAG,
    params(("conversion_id" = i64, Path, description = "Conversion event id")),
    responses(
        (status = 200, description = "Conversion approved", body = ConversionResultDto),
        (status = 404, description = "Conversion not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn approve_conversion(
    State(state): State<AppState>,
    Path(conversion_id): Path<i64>,
) -> Result<impl IntoResponse, Error> {
    review_conversion(&state, conversion_id, ConversionStatus::Approved).await
}

/// Reject a conversion
///
/// Rejected conversions are excluded from payouts and from tier cumulative
/// bases.
///
/// # Responses
/// - 200 (OK): The rejected conversion
/// - 404 (Not Found): No conversion with this id
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/conversions/{conversion_id}/reject",
    tag = CONVERSION_REVIEW_TAG,
    params(("conversion_id" = i64, Path, description = "Conversion event id")),
    responses(
        (status = 200, description = "Conversion rejected", body = ConversionResultDto),
        (status = 404, description = "Conversion not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject_conversion(
    State(state): State<AppState>,
    Path(conversion_id): Path<i64>,
) -> Result<impl IntoResponse, Error> {
    review_conversion(&state, conversion_id, ConversionStatus::Rejected).await
}

async fn review_conversion(
    state: &AppState,
    conversion_id: i64,
    status: ConversionStatus,
) -> Result<axum::response::Response, Error> {
    let conversion_repo = ConversionRepository::new(&state.db);

    if conversion_repo.set_status(conversion_id, status).await? == 0 {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorDto {
                error: "Conversion not found".to_string(),
            }),
        )
            .into_response());
    }

    let conversion = conversion_repo.get(conversion_id).await?.ok_or_else(|| {
        sea_orm::DbErr::RecordNotFound(format!("conversion {conversion_id} vanished after update"))
    })?;

    Ok(Json(ConversionResultDto::from(conversion)).into_response())
}
