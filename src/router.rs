//! HTTP routing and OpenAPI documentation configuration.
//!
//! All endpoints are registered here with their utoipa specifications;
//! Swagger UI serves the collected document at `/api/docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::{controller, model::app::AppState};

/// Builds the application router.
///
/// # Registered Endpoints
/// - `GET /r/{short_code}` - Click redirect behind a partner link
/// - `POST /api/webhooks/conversion` - Conversion ingestion webhook
/// - `POST /api/conversions/{id}/approve|reject` - Conversion review
/// - `POST|GET /api/campaigns[...]` - Campaign configuration
/// - `POST /api/vendors`, `/api/event-types`, `/api/overrides` - Vendor
///   accounts and commission configuration
/// - `POST /api/partners[...]`, `/api/enrollments[...]` - Partner accounts
///   and campaign enrollment
/// - `POST /api/links` - Partner link minting
/// - `POST /api/payouts[...]` - Payout creation and state transitions
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "Trackwire", description = "Trackwire API"), tags(
        (name = controller::redirect::TRACKING_TAG, description = "Click tracking routes"),
        (name = controller::webhook::CONVERSION_TAG, description = "Conversion ingestion routes"),
        (name = controller::conversion::CONVERSION_REVIEW_TAG, description = "Conversion review routes"),
        (name = controller::campaign::CAMPAIGN_TAG, description = "Campaign configuration routes"),
        (name = controller::vendor::VENDOR_TAG, description = "Vendor and commission configuration routes"),
        (name = controller::partner::PARTNER_TAG, description = "Partner account and enrollment routes"),
        (name = controller::link::LINK_TAG, description = "Partner link routes"),
        (name = controller::payout::PAYOUT_TAG, description = "Payout administration routes"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::redirect::follow_link))
        .routes(routes!(controller::webhook::ingest_conversion))
        .routes(routes!(controller::conversion::approve_conversion))
        .routes(routes!(controller::conversion::reject_conversion))
        .routes(routes!(
            controller::campaign::create_campaign,
            controller::campaign::list_campaigns
        ))
        .routes(routes!(
            controller::campaign::update_campaign,
            controller::campaign::get_campaign
        ))
        .routes(routes!(controller::vendor::create_vendor))
        .routes(routes!(controller::vendor::create_event_type))
        .routes(routes!(controller::vendor::create_override))
        .routes(routes!(controller::partner::create_partner))
        .routes(routes!(controller::partner::set_partner_status))
        .routes(routes!(controller::partner::create_enrollment))
        .routes(routes!(controller::partner::review_enrollment))
        .routes(routes!(controller::link::create_link))
        .routes(routes!(controller::payout::create_payout))
        .routes(routes!(controller::payout::process_payout))
        .routes(routes!(controller::payout::complete_payout))
        .routes(routes!(controller::payout::fail_payout))
        .routes(routes!(controller::payout::retry_payout))
        .split_for_parts();

    let routes = routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api));

    routes
}
