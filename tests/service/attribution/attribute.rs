//! Tests for AttributionService::attribute.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use trackwire::service::attribution::{AttributionService, ConversionInput};
use trackwire_test_utils::prelude::*;

use entity::{
    campaign::AttributionPolicy,
    conversion_event::{AttributionConfidence, AttributionType},
};

fn purchase_input(ctx: &TrackingContext, dedupe_key: &str) -> ConversionInput {
    ConversionInput {
        dedupe_key: dedupe_key.to_string(),
        vendor_id: ctx.vendor.id,
        event_type_key: ctx.event_type.key.clone(),
        cookie_id: None,
        click_id: None,
        event_value: Some(Decimal::new(10000, 2)),
        occurred_at: Utc::now().naive_utc(),
    }
}

/// Expect last-click attribution at high confidence with a 20% commission
/// of 100.00 resolving to 20.00
#[tokio::test]
async fn attributes_last_click_and_prices_percentage() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();
    let (cookie, click) = test
        .tracking()
        .insert_mock_touched_cookie(&ctx, now + Duration::days(30))
        .await?;

    let service = AttributionService::new(&test.state.db);
    let mut input = purchase_input(&ctx, "txn-1");
    input.cookie_id = Some(cookie.id);

    let conversion = service.attribute(input, now).await?;

    assert_eq!(conversion.attribution_type, AttributionType::LastClick);
    assert_eq!(
        conversion.attribution_confidence,
        AttributionConfidence::High
    );
    assert_eq!(conversion.partner_id, Some(ctx.partner.id));
    assert_eq!(conversion.campaign_id, Some(ctx.campaign.id));
    assert_eq!(conversion.click_id, Some(click.id));
    assert_eq!(conversion.commission_amount, Some(Decimal::new(2000, 2)));
    assert!(!conversion.needs_review);

    Ok(())
}

/// Expect replaying the same dedupe key to return the identical stored
/// result instead of recomputing
#[tokio::test]
async fn replay_is_idempotent() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();
    let (cookie, _) = test
        .tracking()
        .insert_mock_touched_cookie(&ctx, now + Duration::days(30))
        .await?;

    let service = AttributionService::new(&test.state.db);
    let mut input = purchase_input(&ctx, "txn-1");
    input.cookie_id = Some(cookie.id);

    let first = service.attribute(input, now).await?;

    // Replay with a different event value; the stored result must win
    let mut replay = purchase_input(&ctx, "txn-1");
    replay.cookie_id = Some(cookie.id);
    replay.event_value = Some(Decimal::new(99900, 2));

    let second = service.attribute(replay, now).await?;

    assert_eq!(second.id, first.id);
    assert_eq!(second.event_value, first.event_value);
    assert_eq!(second.commission_amount, first.commission_amount);

    Ok(())
}

/// Expect a conversion with an expired cookie to be recorded unattributed
/// with no commission
#[tokio::test]
async fn expired_cookie_is_unattributed() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();
    // Cookie expired yesterday, with touches recorded while it was live
    let (cookie, _) = test
        .tracking()
        .insert_mock_touched_cookie(&ctx, now - Duration::days(1))
        .await?;

    let service = AttributionService::new(&test.state.db);
    let mut input = purchase_input(&ctx, "txn-1");
    input.cookie_id = Some(cookie.id);

    let conversion = service.attribute(input, now).await?;

    assert_eq!(conversion.attribution_type, AttributionType::Unattributed);
    assert_eq!(conversion.attribution_confidence, AttributionConfidence::Low);
    assert_eq!(conversion.partner_id, None);
    assert_eq!(conversion.commission_amount, None);
    assert!(conversion.needs_review);

    Ok(())
}

/// Expect a conversion carrying only a click id to resolve its cookie
/// through the click
#[tokio::test]
async fn attributes_through_click_id() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();
    let (_, click) = test
        .tracking()
        .insert_mock_touched_cookie(&ctx, now + Duration::days(30))
        .await?;

    let service = AttributionService::new(&test.state.db);
    let mut input = purchase_input(&ctx, "txn-1");
    input.click_id = Some(click.id);

    let conversion = service.attribute(input, now).await?;

    assert_eq!(conversion.attribution_type, AttributionType::LastClick);
    assert_eq!(conversion.partner_id, Some(ctx.partner.id));
    assert_eq!(conversion.commission_amount, Some(Decimal::new(2000, 2)));

    Ok(())
}

/// Expect a conversion with no identity at all to be recorded unattributed
#[tokio::test]
async fn missing_identity_is_unattributed() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;

    let service = AttributionService::new(&test.state.db);
    let conversion = service
        .attribute(purchase_input(&ctx, "txn-1"), Utc::now().naive_utc())
        .await?;

    assert_eq!(conversion.attribution_type, AttributionType::Unattributed);
    assert_eq!(conversion.commission_amount, None);

    Ok(())
}

/// Expect first-click policy to attribute to the first touch at high
/// confidence while the cookie is live
#[tokio::test]
async fn first_click_policy_within_window() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let fixtures = test.tracking();
    let vendor = fixtures.insert_mock_vendor().await?;
    let partner = fixtures.insert_mock_partner().await?;
    let campaign = fixtures
        .insert_mock_campaign(
            vendor.id,
            serde_json::json!({"type": "percentage", "value": "20"}),
            AttributionPolicy::FirstClick,
        )
        .await?;
    let enrollment = fixtures.insert_mock_enrollment(campaign.id, partner.id).await?;
    let event_type = fixtures
        .insert_mock_event_type(vendor.id, "purchase", true, None, true)
        .await?;
    let link = fixtures.insert_mock_link(enrollment.id, "f1rstCl1").await?;
    let ctx = TrackingContext {
        vendor,
        partner,
        campaign,
        enrollment,
        event_type,
        link,
    };

    let now = Utc::now().naive_utc();
    let (cookie, click) = fixtures
        .insert_mock_touched_cookie(&ctx, now + Duration::days(30))
        .await?;

    let service = AttributionService::new(&test.state.db);
    let mut input = purchase_input(&ctx, "txn-1");
    input.cookie_id = Some(cookie.id);

    let conversion = service.attribute(input, now).await?;

    assert_eq!(conversion.attribution_type, AttributionType::FirstClick);
    assert_eq!(
        conversion.attribution_confidence,
        AttributionConfidence::High
    );
    assert_eq!(conversion.click_id, Some(click.id));

    Ok(())
}

/// Expect first-click attribution past expiry to proceed at medium
/// confidence when the first touch was never contested
#[tokio::test]
async fn first_click_grace_past_expiry_is_medium_confidence() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let fixtures = test.tracking();
    let vendor = fixtures.insert_mock_vendor().await?;
    let partner = fixtures.insert_mock_partner().await?;
    let campaign = fixtures
        .insert_mock_campaign(
            vendor.id,
            serde_json::json!({"type": "percentage", "value": "20"}),
            AttributionPolicy::FirstClick,
        )
        .await?;
    let enrollment = fixtures.insert_mock_enrollment(campaign.id, partner.id).await?;
    let event_type = fixtures
        .insert_mock_event_type(vendor.id, "purchase", true, None, true)
        .await?;
    let link = fixtures.insert_mock_link(enrollment.id, "f1rstCl1").await?;
    let ctx = TrackingContext {
        vendor,
        partner,
        campaign,
        enrollment,
        event_type,
        link,
    };

    let now = Utc::now().naive_utc();
    let (cookie, _) = fixtures
        .insert_mock_touched_cookie(&ctx, now - Duration::days(1))
        .await?;

    let service = AttributionService::new(&test.state.db);
    let mut input = purchase_input(&ctx, "txn-1");
    input.cookie_id = Some(cookie.id);

    let conversion = service.attribute(input, now).await?;

    assert_eq!(conversion.attribution_type, AttributionType::FirstClick);
    assert_eq!(
        conversion.attribution_confidence,
        AttributionConfidence::Medium
    );
    assert_eq!(conversion.partner_id, Some(ctx.partner.id));

    Ok(())
}

/// Expect a conversion stamped before its attributed click to still be
/// attributed, at low confidence
#[tokio::test]
async fn clock_skew_downgrades_confidence() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();
    let (cookie, click) = test
        .tracking()
        .insert_mock_touched_cookie(&ctx, now + Duration::days(30))
        .await?;

    let service = AttributionService::new(&test.state.db);
    let mut input = purchase_input(&ctx, "txn-1");
    input.cookie_id = Some(cookie.id);
    // Stamped before the click that will be credited
    input.occurred_at = click.occurred_at - Duration::minutes(10);

    let conversion = service.attribute(input, now).await?;

    assert_eq!(conversion.attribution_type, AttributionType::LastClick);
    assert_eq!(conversion.attribution_confidence, AttributionConfidence::Low);
    assert_eq!(conversion.partner_id, Some(ctx.partner.id));

    Ok(())
}

/// Expect a percentage rule with no event value to hold the conversion for
/// review instead of dropping it
#[tokio::test]
async fn missing_event_value_holds_for_review() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();
    let (cookie, _) = test
        .tracking()
        .insert_mock_touched_cookie(&ctx, now + Duration::days(30))
        .await?;

    let service = AttributionService::new(&test.state.db);
    let mut input = purchase_input(&ctx, "txn-1");
    input.cookie_id = Some(cookie.id);
    input.event_value = None;

    let conversion = service.attribute(input, now).await?;

    assert_eq!(conversion.attribution_type, AttributionType::LastClick);
    assert_eq!(conversion.commission_amount, None);
    assert!(conversion.needs_review);

    Ok(())
}

/// Expect the documented tiered scenario: tiers [0,100) at 10% and
/// [100,inf) at 5%, prior cumulative GMV 90, event value 50; the pre-event
/// cumulative selects the first tier, yielding a 5.00 commission
#[tokio::test]
async fn tiered_commission_uses_pre_event_cumulative() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let fixtures = test.tracking();
    let vendor = fixtures.insert_mock_vendor().await?;
    let partner = fixtures.insert_mock_partner().await?;
    let campaign = fixtures
        .insert_mock_campaign(
            vendor.id,
            serde_json::json!({
                "type": "tiered",
                "basis": "gmv",
                "tiers": [
                    {"min": "0", "max": "100", "rate": "10"},
                    {"min": "100", "max": null, "rate": "5"}
                ]
            }),
            AttributionPolicy::LastClick,
        )
        .await?;
    let enrollment = fixtures.insert_mock_enrollment(campaign.id, partner.id).await?;
    let event_type = fixtures
        .insert_mock_event_type(vendor.id, "purchase", true, None, true)
        .await?;
    let link = fixtures.insert_mock_link(enrollment.id, "t1ers001").await?;
    let ctx = TrackingContext {
        vendor,
        partner,
        campaign,
        enrollment,
        event_type,
        link,
    };

    let now = Utc::now().naive_utc();
    let (cookie, _) = fixtures
        .insert_mock_touched_cookie(&ctx, now + Duration::days(30))
        .await?;

    let service = AttributionService::new(&test.state.db);

    // Prior commissioned conversion worth 90.00 establishes the cumulative
    let mut prior = purchase_input(&ctx, "txn-prior");
    prior.cookie_id = Some(cookie.id);
    prior.event_value = Some(Decimal::new(9000, 2));
    prior.occurred_at = now - Duration::minutes(30);
    service.attribute(prior, now).await?;

    // Pre-event cumulative is 90, inside [0,100): the 10% tier prices this
    // 50.00 conversion even though it pushes the lifetime total past 100
    let mut input = purchase_input(&ctx, "txn-current");
    input.cookie_id = Some(cookie.id);
    input.event_value = Some(Decimal::new(5000, 2));
    input.occurred_at = now - Duration::minutes(5);

    let conversion = service.attribute(input, now).await?;

    assert_eq!(conversion.commission_value, Some(Decimal::new(10, 0)));
    assert_eq!(conversion.commission_amount, Some(Decimal::new(500, 2)));

    Ok(())
}

/// Expect a non-commissionable event type to attribute without pricing
#[tokio::test]
async fn non_commissionable_event_earns_nothing() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let signup = test
        .tracking()
        .insert_mock_event_type(ctx.vendor.id, "signup", false, None, false)
        .await?;
    let now = Utc::now().naive_utc();
    let (cookie, _) = test
        .tracking()
        .insert_mock_touched_cookie(&ctx, now + Duration::days(30))
        .await?;

    let service = AttributionService::new(&test.state.db);
    let mut input = purchase_input(&ctx, "txn-1");
    input.event_type_key = signup.key.clone();
    input.cookie_id = Some(cookie.id);

    let conversion = service.attribute(input, now).await?;

    assert_eq!(conversion.attribution_type, AttributionType::LastClick);
    assert_eq!(conversion.commission_amount, None);
    assert!(!conversion.needs_review);

    Ok(())
}

/// Expect Error when the event type is not in the vendor's catalog
#[tokio::test]
async fn fails_for_unknown_event_type() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;

    let service = AttributionService::new(&test.state.db);
    let mut input = purchase_input(&ctx, "txn-1");
    input.event_type_key = "unheard-of".to_string();

    let result = service.attribute(input, Utc::now().naive_utc()).await;

    assert!(matches!(
        result,
        Err(trackwire::error::Error::AttributionError(
            trackwire::error::attribution::AttributionError::UnknownEventType(_, _)
        ))
    ));

    Ok(())
}
