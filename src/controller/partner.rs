use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use entity::campaign_partner::EnrollmentStatus;

use crate::{
    error::Error,
    model::{
        api::{CreateEnrollmentDto, CreatePartnerDto, EnrollmentDto, ErrorDto, PartnerDto, PartnerStatusDto},
        app::AppState,
    },
    service::partner::PartnerService,
};

pub static PARTNER_TAG: &str = "partners";

#[derive(Deserialize, ToSchema)]
pub struct EnrollmentReviewDto {
    #[schema(value_type = String)]
    pub status: EnrollmentStatus,
}

/// Register a partner
///
/// Partner accounts start pending until approved by a vendor.
///
/// # Responses
/// - 201 (Created): The pending partner account
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/partners",
    tag = PARTNER_TAG,
    request_body = CreatePartnerDto,
    responses(
        (status = 201, description = "Partner registered", body = PartnerDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_partner(
    State(state): State<AppState>,
    Json(dto): Json<CreatePartnerDto>,
) -> Result<impl IntoResponse, Error> {
    let partner_service = PartnerService::new(&state.db);

    let partner = partner_service.register_partner(&dto.name, &dto.email).await?;

    Ok((StatusCode::CREATED, Json(PartnerDto::from(partner))))
}

/// Change a partner's account status
///
/// # Responses
/// - 200 (OK): The partner with its new status
/// - 404 (Not Found): No partner with this id
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/partners/{partner_id}/status",
    tag = PARTNER_TAG,
    params(("partner_id" = i32, Path, description = "Partner id")),
    request_body = PartnerStatusDto,
    responses(
        (status = 200, description = "Status updated", body = PartnerDto),
        (status = 404, description = "Partner not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn set_partner_status(
    State(state): State<AppState>,
    Path(partner_id): Path<i32>,
    Json(dto): Json<PartnerStatusDto>,
) -> Result<impl IntoResponse, Error> {
    let partner_service = PartnerService::new(&state.db);

    let Some(partner) = partner_service
        .set_partner_status(partner_id, dto.status)
        .await?
    else {
        return Ok(not_found("Partner not found").into_response());
    };

    Ok(Json(PartnerDto::from(partner)).into_response())
}

/// Enroll a partner into a campaign
///
/// Enrollment starts pending when the campaign requires approval, approved
/// otherwise. A partner can enroll at most once per campaign.
///
/// # Responses
/// - 201 (Created): The enrollment
/// - 404 (Not Found): No campaign with this id
/// - 500 (Internal Server Error): A database error occurred, including a duplicate enrollment
#[utoipa::path(
    post,
    path = "/api/enrollments",
    tag = PARTNER_TAG,
    request_body = CreateEnrollmentDto,
    responses(
        (status = 201, description = "Enrollment created", body = EnrollmentDto),
        (status = 404, description = "Campaign not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_enrollment(
    State(state): State<AppState>,
    Json(dto): Json<CreateEnrollmentDto>,
) -> Result<impl IntoResponse, Error> {
    let partner_service = PartnerService::new(&state.db);

    let Some(enrollment) = partner_service.enroll(dto.campaign_id, dto.partner_id).await? else {
        return Ok(not_found("Campaign not found").into_response());
    };

    Ok((StatusCode::CREATED, Json(EnrollmentDto::from(enrollment))).into_response())
}

/// Review a campaign enrollment
///
/// Vendor approval or rejection of a pending enrollment.
///
/// # Responses
/// - 200 (OK): The reviewed enrollment
/// - 404 (Not Found): No enrollment with this id
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/enrollments/{enrollment_id}/review",
    tag = PARTNER_TAG,
    params(("enrollment_id" = i32, Path, description = "Enrollment id")),
    request_body = EnrollmentReviewDto,
    responses(
        (status = 200, description = "Enrollment reviewed", body = EnrollmentDto),
        (status = 404, description = "Enrollment not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn review_enrollment(
    State(state): State<AppState>,
    Path(enrollment_id): Path<i32>,
    Json(dto): Json<EnrollmentReviewDto>,
) -> Result<impl IntoResponse, Error> {
    let partner_service = PartnerService::new(&state.db);

    let Some(enrollment) = partner_service
        .review_enrollment(enrollment_id, dto.status)
        .await?
    else {
        return Ok(not_found("Enrollment not found").into_response());
    };

    Ok(Json(EnrollmentDto::from(enrollment)).into_response())
}

fn not_found(message: &str) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorDto {
            error: message.to_string(),
        }),
    )
}
