use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    error::Error,
    model::{
        api::{CreateLinkDto, ErrorDto, LinkDto},
        app::AppState,
    },
    service::tracking::link::LinkService,
};

pub static LINK_TAG: &str = "links";

/// Create a partner tracking link
///
/// Mints a unique short code bound to the campaign enrollment. The link is
/// immutable once created apart from its custom parameters.
///
/// # Responses
/// - 201 (Created): The new link with its short code
/// - 500 (Internal Server Error): A database error occurred
#[utoipa::path(
    post,
    path = "/api/links",
    tag = LINK_TAG,
    request_body = CreateLinkDto,
    responses(
        (status = 201, description = "Link created", body = LinkDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_link(
    State(state): State<AppState>,
    Json(dto): Json<CreateLinkDto>,
) -> Result<impl IntoResponse, Error> {
    let link_service = LinkService::new(&state.db);

    let link = link_service
        .create_link(dto.campaign_partner_id, dto.custom_params)
        .await?;

    Ok((StatusCode::CREATED, Json(LinkDto::from(link))))
}
