use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    error::Error,
    model::{
        api::{
            CreateEventTypeDto, CreateOverrideDto, CreateVendorDto, ErrorDto, EventTypeDto,
            OverrideDto, VendorDto,
        },
        app::AppState,
    },
    service::vendor::VendorService,
};

pub static VENDOR_TAG: &str = "vendors";

/// Create a vendor
///
/// # Responses
/// - 201 (Created): The new vendor
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/vendors",
    tag = VENDOR_TAG,
    request_body = CreateVendorDto,
    responses(
        (status = 201, description = "Vendor created", body = VendorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    Json(dto): Json<CreateVendorDto>,
) -> Result<impl IntoResponse, Error> {
    let vendor_service = VendorService::new(&state.db);

    let vendor = vendor_service
        .create_vendor(&dto.name, &dto.contact_email)
        .await?;

    Ok((StatusCode::CREATED, Json(VendorDto::from(vendor))))
}

/// Add an event type to a vendor's catalog
///
/// An optional default commission rule is validated before the type is
/// stored; it applies ahead of the campaign default for commissionable
/// events of this type.
///
/// # Responses
/// - 201 (Created): The catalog entry
/// - 422 (Unprocessable Entity): The default rule failed validation
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/event-types",
    tag = VENDOR_TAG,
    request_body = CreateEventTypeDto,
    responses(
        (status = 201, description = "Event type created", body = EventTypeDto),
        (status = 422, description = "Invalid default rule", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_event_type(
    State(state): State<AppState>,
    Json(dto): Json<CreateEventTypeDto>,
) -> Result<impl IntoResponse, Error> {
    let vendor_service = VendorService::new(&state.db);

    let event_type = vendor_service
        .create_event_type(
            dto.vendor_id,
            &dto.key,
            &dto.name,
            dto.commissionable,
            dto.default_rule,
            dto.is_terminal,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(EventTypeDto::from(event_type))))
}

/// Create a per-partner commission override
///
/// The override applies to one (partner, campaign, event type) scope within
/// its validity window and takes precedence over all defaults. Its rule is
/// validated before storage.
///
/// # Responses
/// - 201 (Created): The override
/// - 422 (Unprocessable Entity): The rule failed validation
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/overrides",
    tag = VENDOR_TAG,
    request_body = CreateOverrideDto,
    responses(
        (status = 201, description = "Override created", body = OverrideDto),
        (status = 422, description = "Invalid rule", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_override(
    State(state): State<AppState>,
    Json(dto): Json<CreateOverrideDto>,
) -> Result<impl IntoResponse, Error> {
    let vendor_service = VendorService::new(&state.db);

    let commission_override = vendor_service
        .create_override(
            dto.partner_id,
            dto.campaign_id,
            dto.event_type_id,
            dto.rule,
            dto.valid_from,
            dto.valid_until,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OverrideDto::from(commission_override)),
    ))
}
