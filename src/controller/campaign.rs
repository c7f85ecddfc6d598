use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{
    error::Error,
    model::{
        api::{CampaignDto, CreateCampaignDto, ErrorDto, UpdateCampaignDto},
        app::AppState,
    },
    service::campaign::CampaignService,
};

pub static CAMPAIGN_TAG: &str = "campaigns";

#[derive(Deserialize)]
pub struct ListCampaignsParams {
    pub vendor_id: i32,
}

/// Create a campaign
///
/// Validates the commission rule (tier ordering, contiguity, non-negative
/// rates) before anything is stored; a malformed rule is rejected here so
/// commission computation never sees one.
///
/// # Responses
/// - 201 (Created): The new campaign at version 1
/// - 422 (Unprocessable Entity): The commission rule failed validation
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/campaigns",
    tag = CAMPAIGN_TAG,
    request_body = CreateCampaignDto,
    responses(
        (status = 201, description = "Campaign created", body = CampaignDto),
        (status = 422, description = "Invalid commission rule", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(dto): Json<CreateCampaignDto>,
) -> Result<impl IntoResponse, Error> {
    let campaign_service = CampaignService::new(&state.db);

    let campaign = campaign_service.create_campaign(dto).await?;

    Ok((StatusCode::CREATED, Json(CampaignDto::from(campaign))))
}

/// Update a campaign
///
/// Applies a partial update. The replaced values are archived as a revision
/// and the campaign version is bumped.
///
/// # Responses
/// - 200 (OK): The updated campaign
/// - 404 (Not Found): No campaign with this id
/// - 422 (Unprocessable Entity): The new commission rule failed validation
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    put,
    path = "/api/campaigns/{campaign_id}",
    tag = CAMPAIGN_TAG,
    params(("campaign_id" = i32, Path, description = "Campaign id")),
    request_body = UpdateCampaignDto,
    responses(
        (status = 200, description = "Campaign updated", body = CampaignDto),
        (status = 404, description = "Campaign not found", body = ErrorDto),
        (status = 422, description = "Invalid commission rule", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<i32>,
    Json(dto): Json<UpdateCampaignDto>,
) -> Result<impl IntoResponse, Error> {
    let campaign_service = CampaignService::new(&state.db);

    let Some(campaign) = campaign_service.update_campaign(campaign_id, dto).await? else {
        return Ok(campaign_not_found().into_response());
    };

    Ok(Json(CampaignDto::from(campaign)).into_response())
}

/// Get a campaign
///
/// # Responses
/// - 200 (OK): The campaign
/// - 404 (Not Found): No campaign with this id
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    get,
    path = "/api/campaigns/{campaign_id}",
    tag = CAMPAIGN_TAG,
    params(("campaign_id" = i32, Path, description = "Campaign id")),
    responses(
        (status = 200, description = "The campaign", body = CampaignDto),
        (status = 404, description = "Campaign not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let campaign_service = CampaignService::new(&state.db);

    let Some(campaign) = campaign_service.get_campaign(campaign_id).await? else {
        return Ok(campaign_not_found().into_response());
    };

    Ok(Json(CampaignDto::from(campaign)).into_response())
}

/// List a vendor's campaigns
///
/// # Responses
/// - 200 (OK): Campaigns owned by the vendor
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    get,
    path = "/api/campaigns",
    tag = CAMPAIGN_TAG,
    params(("vendor_id" = i32, Query, description = "Owning vendor id")),
    responses(
        (status = 200, description = "The vendor's campaigns", body = Vec<CampaignDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(params): Query<ListCampaignsParams>,
) -> Result<impl IntoResponse, Error> {
    let campaign_service = CampaignService::new(&state.db);

    let campaigns = campaign_service.list_campaigns(params.vendor_id).await?;
    let dtos: Vec<CampaignDto> = campaigns.into_iter().map(CampaignDto::from).collect();

    Ok(Json(dtos))
}

fn campaign_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorDto {
            error: "Campaign not found".to_string(),
        }),
    )
}
