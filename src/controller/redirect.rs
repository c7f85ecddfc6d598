use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    config::TRACKING_COOKIE_NAME,
    controller::util::cookie::{build_tracking_cookie, tracking_cookie_id},
    error::Error,
    model::{app::AppState, tracking::RequestMeta},
    service::tracking::click::ClickService,
};

pub static TRACKING_TAG: &str = "tracking";

/// Click redirect behind a partner's short link
///
/// Records the click, resolves or mints the visitor's tracking cookie, and
/// redirects to the campaign destination with the `{partner_id}` placeholder
/// substituted. Tracking failures degrade to a bare redirect; only an
/// unknown short code fails the request.
///
/// # Responses
/// - 307 (Temporary Redirect): Redirect to the campaign destination, re-issuing the tracking cookie
/// - 404 (Not Found): No partner link exists for the short code
/// - 500 (Internal Server Error): A database error occurred before the link resolved
#[utoipa::path(
    get,
    path = "/r/{short_code}",
    tag = TRACKING_TAG,
    params(
        ("short_code" = String, Path, description = "Partner link short code"),
        RequestMeta
    ),
    responses(
        (status = 307, description = "Redirect to the campaign destination"),
        (status = 404, description = "Unknown short code", body = crate::model::api::ErrorDto),
        (status = 500, description = "Internal server error", body = crate::model::api::ErrorDto)
    ),
)]
pub async fn follow_link(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
    Query(meta): Query<RequestMeta>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    let click_service = ClickService::new(&state.db);

    let request_cookie_id = tracking_cookie_id(&headers, TRACKING_COOKIE_NAME);

    let mut meta = meta;
    meta.referrer = header_string(&headers, header::REFERER);
    meta.user_agent = header_string(&headers, header::USER_AGENT);
    meta.ip_address = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.split(',').next())
        .map(|ip| ip.trim().to_string());

    let outcome = click_service
        .record(&short_code, request_cookie_id, &meta, Utc::now().naive_utc())
        .await?;

    let set_cookie = build_tracking_cookie(
        TRACKING_COOKIE_NAME,
        outcome.cookie.id,
        outcome.cookie.expires_at,
    );

    Ok((
        StatusCode::TEMPORARY_REDIRECT,
        [
            (header::LOCATION, outcome.destination_url),
            (header::SET_COOKIE, set_cookie),
        ],
    ))
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}
