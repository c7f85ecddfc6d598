use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;

use crate::{
    error::{attribution::AttributionError, Error},
    model::{
        api::{ConversionResultDto, ConversionWebhookDto},
        app::AppState,
    },
    service::attribution::{AttributionService, ConversionInput},
};

pub static CONVERSION_TAG: &str = "conversions";

/// Vendor conversion webhook
///
/// Attributes the conversion to a (partner, campaign) pair under the
/// campaign's attribution policy and computes the commission owed. The
/// conversion is always persisted, attributed or not; replays of the same
/// transaction id or idempotency key return the originally stored result.
///
/// # Responses
/// - 200 (OK): The stored conversion with its attribution and commission resolution
/// - 422 (Unprocessable Entity): Missing dedupe key or unknown event type
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/webhooks/conversion",
    tag = CONVERSION_TAG,
    request_body = ConversionWebhookDto,
    responses(
        (status = 200, description = "Conversion recorded", body = ConversionResultDto),
        (status = 422, description = "Invalid conversion payload", body = crate::model::api::ErrorDto),
        (status = 500, description = "Internal server error", body = crate::model::api::ErrorDto)
    ),
)]
pub async fn ingest_conversion(
    State(state): State<AppState>,
    Json(dto): Json<ConversionWebhookDto>,
) -> Result<impl IntoResponse, Error> {
    let attribution_service = AttributionService::new(&state.db);

    let dedupe_key = dto
        .transaction_id
        .clone()
        .or_else(|| dto.idempotency_key.clone())
        .ok_or(AttributionError::MissingDedupeKey)?;

    let conversion = attribution_service
        .attribute(
            ConversionInput {
                dedupe_key,
                vendor_id: dto.vendor_id,
                event_type_key: dto.event_type,
                cookie_id: dto.cookie_id,
                click_id: dto.click_id,
                event_value: dto.event_value,
                occurred_at: dto.occurred_at.naive_utc(),
            },
            Utc::now().naive_utc(),
        )
        .await?;

    Ok(Json(ConversionResultDto::from(conversion)))
}
