use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::Error,
    model::{
        api::{CompletePayoutDto, CreatePayoutDto, ErrorDto, FailPayoutDto, PayoutDto},
        app::AppState,
    },
    service::payout::PayoutService,
};

pub static PAYOUT_TAG: &str = "payouts";

/// Create a payout
///
/// Allocates every approved, not-yet-paid conversion of the partner within
/// the period into a single pending payout. Allocation is all-or-nothing; a
/// concurrent run claiming the same conversions fails cleanly with a
/// conflict.
///
/// # Responses
/// - 201 (Created): The pending payout with the summed amount
/// - 409 (Conflict): A selected conversion is already allocated elsewhere
/// - 422 (Unprocessable Entity): Nothing eligible to pay out in the period
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/payouts",
    tag = PAYOUT_TAG,
    request_body = CreatePayoutDto,
    responses(
        (status = 201, description = "Payout created", body = PayoutDto),
        (status = 409, description = "Conversions already allocated", body = ErrorDto),
        (status = 422, description = "Nothing to pay out", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_payout(
    State(state): State<AppState>,
    Json(dto): Json<CreatePayoutDto>,
) -> Result<impl IntoResponse, Error> {
    let payout_service = PayoutService::new(&state.db);

    let payout = payout_service
        .create_payout(
            dto.partner_id,
            &dto.payment_method,
            dto.period_start,
            dto.period_end,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PayoutDto::from(payout))))
}

/// Start processing a payout
///
/// Moves a pending payout to `processing` and submits the disbursement to
/// the payment provider. The provider call is fire-and-forget; completion
/// or failure is recorded by a later confirmation.
///
/// # Responses
/// - 200 (OK): The payout, now processing
/// - 404 (Not Found): No payout with this id
/// - 409 (Conflict): The payout is not pending
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/payouts/{payout_id}/processing",
    tag = PAYOUT_TAG,
    params(("payout_id" = i32, Path, description = "Payout id")),
    responses(
        (status = 200, description = "Payout processing", body = PayoutDto),
        (status = 404, description = "Payout not found", body = ErrorDto),
        (status = 409, description = "Invalid state transition", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn process_payout(
    State(state): State<AppState>,
    Path(payout_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let payout_service = PayoutService::new(&state.db);

    let payout = payout_service
        .mark_processing(payout_id, &state.provider)
        .await?;

    Ok(Json(PayoutDto::from(payout)))
}

/// Complete a payout
///
/// Records the provider transaction id and moves the payout to its terminal
/// `completed` state. Only a processing payout can complete.
///
/// # Responses
/// - 200 (OK): The completed payout
/// - 404 (Not Found): No payout with this id
/// - 409 (Conflict): The payout is not processing
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/payouts/{payout_id}/complete",
    tag = PAYOUT_TAG,
    params(("payout_id" = i32, Path, description = "Payout id")),
    request_body = CompletePayoutDto,
    responses(
        (status = 200, description = "Payout completed", body = PayoutDto),
        (status = 404, description = "Payout not found", body = ErrorDto),
        (status = 409, description = "Invalid state transition", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn complete_payout(
    State(state): State<AppState>,
    Path(payout_id): Path<i32>,
    Json(dto): Json<CompletePayoutDto>,
) -> Result<impl IntoResponse, Error> {
    let payout_service = PayoutService::new(&state.db);

    let payout = payout_service
        .mark_completed(payout_id, &dto.provider_txn_id)
        .await?;

    Ok(Json(PayoutDto::from(payout)))
}

/// Fail a payout
///
/// # Responses
/// - 200 (OK): The failed payout with its recorded reason
/// - 404 (Not Found): No payout with this id
/// - 409 (Conflict): The payout is not processing
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/payouts/{payout_id}/fail",
    tag = PAYOUT_TAG,
    params(("payout_id" = i32, Path, description = "Payout id")),
    request_body = FailPayoutDto,
    responses(
        (status = 200, description = "Payout failed", body = PayoutDto),
        (status = 404, description = "Payout not found", body = ErrorDto),
        (status = 409, description = "Invalid state transition", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn fail_payout(
    State(state): State<AppState>,
    Path(payout_id): Path<i32>,
    Json(dto): Json<FailPayoutDto>,
) -> Result<impl IntoResponse, Error> {
    let payout_service = PayoutService::new(&state.db);

    let payout = payout_service.mark_failed(payout_id, &dto.reason).await?;

    Ok(Json(PayoutDto::from(payout)))
}

/// Retry a failed payout
///
/// Returns a failed payout to `pending` for another processing attempt. A
/// completed payout can never be retried; further amounts need a new payout.
///
/// # Responses
/// - 200 (OK): The payout, pending again
/// - 404 (Not Found): No payout with this id
/// - 409 (Conflict): The payout is not failed
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/payouts/{payout_id}/retry",
    tag = PAYOUT_TAG,
    params(("payout_id" = i32, Path, description = "Payout id")),
    responses(
        (status = 200, description = "Payout pending again", body = PayoutDto),
        (status = 404, description = "Payout not found", body = ErrorDto),
        (status = 409, description = "Invalid state transition", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn retry_payout(
    State(state): State<AppState>,
    Path(payout_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let payout_service = PayoutService::new(&state.db);

    let payout = payout_service.retry(payout_id).await?;

    Ok(Json(PayoutDto::from(payout)))
}
