//! Tests for ClickService::record.

use chrono::{Duration, Utc};
use trackwire::{
    data::{campaign_partner::CampaignPartnerRepository, cookie::CookieRepository},
    model::tracking::RequestMeta,
    service::tracking::click::ClickService,
};
use trackwire_test_utils::prelude::*;

/// Expect a recorded click, touch pointers, counters, and the destination
/// with the partner id substituted
#[tokio::test]
async fn records_click_and_builds_destination() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!()?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;

    let service = ClickService::new(&test.state.db);
    let now = Utc::now().naive_utc();
    let outcome = service
        .record(&ctx.link.short_code, None, &RequestMeta::default(), now)
        .await?;

    assert_eq!(
        outcome.destination_url,
        format!("https://shop.example.com/?ref={}", ctx.partner.id)
    );

    let click = outcome.click.expect("click should be recorded");
    assert_eq!(click.partner_link_id, ctx.link.id);
    assert_eq!(click.cookie_id, Some(outcome.cookie.id));

    // First and last touch both point at this first click
    let cookie_repo = CookieRepository::new(&test.state.db);
    let cookie = cookie_repo.get(outcome.cookie.id).await?.unwrap();
    assert_eq!(cookie.first_click_id, Some(click.id));
    assert_eq!(cookie.last_click_id, Some(click.id));
    assert_eq!(cookie.first_partner_id, Some(ctx.partner.id));
    assert_eq!(cookie.last_campaign_id, Some(ctx.campaign.id));

    let enrollment_repo = CampaignPartnerRepository::new(&test.state.db);
    let enrollment = enrollment_repo.get(ctx.enrollment.id).await?.unwrap();
    assert_eq!(enrollment.total_clicks, 1);
    assert!(enrollment.last_click_at.is_some());

    Ok(())
}

/// Expect a link's custom params to be appended to the destination query
#[tokio::test]
async fn custom_params_reach_destination() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!()?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;

    use sea_orm::{ActiveModelTrait, ActiveValue};
    let link = entity::partner_link::ActiveModel {
        short_code: ActiveValue::Set("cust0m42".to_string()),
        campaign_partner_id: ActiveValue::Set(ctx.enrollment.id),
        custom_params: ActiveValue::Set(Some(serde_json::json!({"sub_id": "yt-desc"}))),
        created_at: ActiveValue::Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    link.insert(&test.state.db).await?;

    let service = ClickService::new(&test.state.db);
    let outcome = service
        .record("cust0m42", None, &RequestMeta::default(), Utc::now().naive_utc())
        .await?;

    assert!(outcome.destination_url.contains("sub_id=yt-desc"));
    assert!(outcome
        .destination_url
        .contains(&format!("ref={}", ctx.partner.id)));

    Ok(())
}

/// Expect UnknownLink for a short code that does not exist
#[tokio::test]
async fn fails_for_unknown_short_code() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!()?;
    test.tracking().insert_mock_tracking_context().await?;

    let service = ClickService::new(&test.state.db);
    let result = service
        .record("n0suchcd", None, &RequestMeta::default(), Utc::now().naive_utc())
        .await;

    assert!(matches!(
        result,
        Err(trackwire::error::Error::TrackingError(
            trackwire::error::tracking::TrackingError::UnknownLink(_)
        ))
    ));

    Ok(())
}

/// Expect a live request cookie to be reused and its first touch to survive
/// a second click
#[tokio::test]
async fn reuses_live_cookie_across_clicks() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!()?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;

    let service = ClickService::new(&test.state.db);
    let now = Utc::now().naive_utc();

    let first = service
        .record(&ctx.link.short_code, None, &RequestMeta::default(), now)
        .await?;
    let first_click_id = first.click.as_ref().map(|click| click.id);

    let second = service
        .record(
            &ctx.link.short_code,
            Some(first.cookie.id),
            &RequestMeta::default(),
            now + Duration::seconds(5),
        )
        .await?;

    assert_eq!(second.cookie.id, first.cookie.id);

    let cookie_repo = CookieRepository::new(&test.state.db);
    let cookie = cookie_repo.get(first.cookie.id).await?.unwrap();

    // First touch still the original click, last touch moved on
    assert_eq!(cookie.first_click_id, first_click_id);
    assert_eq!(cookie.last_click_id, second.click.map(|click| click.id));

    Ok(())
}

/// Expect an expired request cookie to be replaced with a fresh identity
#[tokio::test]
async fn expired_cookie_gets_fresh_identity() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!()?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();

    let expired = test
        .tracking()
        .insert_mock_cookie(now - Duration::days(1))
        .await?;

    let service = ClickService::new(&test.state.db);
    let outcome = service
        .record(
            &ctx.link.short_code,
            Some(expired.id),
            &RequestMeta::default(),
            now,
        )
        .await?;

    assert_ne!(outcome.cookie.id, expired.id);
    assert!(outcome.cookie.expires_at > now);

    Ok(())
}
