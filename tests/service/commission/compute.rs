//! Tests for CommissionService::compute and rule resolution order.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use trackwire::service::commission::CommissionService;
use trackwire_test_utils::prelude::*;

use entity::conversion_event::CommissionType;

/// Expect the campaign's 20% default to price 100.00 at 20.00
#[tokio::test]
async fn campaign_percentage_default() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();

    let service = CommissionService::new(&test.state.db);
    let computed = service
        .compute(
            ctx.partner.id,
            &ctx.campaign,
            &ctx.event_type,
            Some(Decimal::new(10000, 2)),
            now,
            now,
        )
        .await?;

    assert_eq!(computed.commission_type, CommissionType::Percentage);
    assert_eq!(computed.value, Decimal::new(20, 0));
    assert_eq!(computed.amount, Decimal::new(2000, 2));
    assert!(!computed.needs_review);

    Ok(())
}

/// Expect a flat rule to ignore the event value entirely
#[tokio::test]
async fn flat_rule_ignores_event_value() -> Result<(), TestError> {
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
            serde_json::json!({"type": "flat", "value": "7.50"}),
            entity::campaign::AttributionPolicy::LastClick,
        )
        .await?;
    let event_type = fixtures
        .insert_mock_event_type(vendor.id, "purchase", true, None, true)
        .await?;
    let now = Utc::now().naive_utc();

    let service = CommissionService::new(&test.state.db);
    let computed = service
        .compute(partner.id, &campaign, &event_type, None, now, now)
        .await?;

    assert_eq!(computed.commission_type, CommissionType::Flat);
    assert_eq!(computed.amount, Decimal::new(750, 2));

    Ok(())
}

/// Expect MissingEventValue for a percentage rule without a value
#[tokio::test]
async fn percentage_without_value_is_rejected() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();

    let service = CommissionService::new(&test.state.db);
    let result = service
        .compute(ctx.partner.id, &ctx.campaign, &ctx.event_type, None, now, now)
        .await;

    assert!(matches!(
        result,
        Err(trackwire::error::Error::CommissionError(
            trackwire::error::commission::CommissionError::MissingEventValue
        ))
    ));

    Ok(())
}

/// Expect an active partner override to beat both the event-type default
/// and the campaign default
#[tokio::test]
async fn override_wins_resolution_order() -> Result<(), TestError> {
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
            entity::campaign::AttributionPolicy::LastClick,
        )
        .await?;
    // Event type carries its own 10% default
    let event_type = fixtures
        .insert_mock_event_type(
            vendor.id,
            "purchase",
            true,
            Some(serde_json::json!({"type": "percentage", "value": "10"})),
            true,
        )
        .await?;

    let now = Utc::now().naive_utc();
    let service = CommissionService::new(&test.state.db);

    // Without an override the event-type default (10%) applies
    let computed = service
        .compute(
            partner.id,
            &campaign,
            &event_type,
            Some(Decimal::new(10000, 2)),
            now,
            now,
        )
        .await?;
    assert_eq!(computed.amount, Decimal::new(1000, 2));

    // An active 25% override takes precedence over everything
    use sea_orm::{ActiveModelTrait, ActiveValue};
    let commission_override = entity::commission_override::ActiveModel {
        partner_id: ActiveValue::Set(partner.id),
        campaign_id: ActiveValue::Set(campaign.id),
        event_type_id: ActiveValue::Set(event_type.id),
        rule: ActiveValue::Set(serde_json::json!({"type": "percentage", "value": "25"})),
        valid_from: ActiveValue::Set(now - Duration::days(1)),
        valid_until: ActiveValue::Set(None),
        created_at: ActiveValue::Set(now),
        ..Default::default()
    };
    commission_override.insert(&test.state.db).await?;

    let computed = service
        .compute(
            partner.id,
            &campaign,
            &event_type,
            Some(Decimal::new(10000, 2)),
            now,
            now,
        )
        .await?;
    assert_eq!(computed.amount, Decimal::new(2500, 2));

    Ok(())
}

/// Expect a conversion-count tier basis to bucket by prior commissioned
/// conversions
#[tokio::test]
async fn tiered_conversion_count_basis() -> Result<(), TestError> {
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
                "basis": "conversion_count",
                "tiers": [
                    {"min": "0", "max": "2", "rate": "5"},
                    {"min": "2", "max": null, "rate": "10"}
                ]
            }),
            entity::campaign::AttributionPolicy::LastClick,
        )
        .await?;
    let enrollment = fixtures.insert_mock_enrollment(campaign.id, partner.id).await?;
    let event_type = fixtures
        .insert_mock_event_type(vendor.id, "purchase", true, None, true)
        .await?;
    let link = fixtures.insert_mock_link(enrollment.id, "c0unt123").await?;
    let ctx = TrackingContext {
        vendor,
        partner,
        campaign: campaign.clone(),
        enrollment,
        event_type: event_type.clone(),
        link,
    };

    let now = Utc::now().naive_utc();

    // Two prior commissioned conversions move the pair into the second tier
    fixtures
        .insert_mock_approved_conversion(&ctx, "txn-1", Decimal::new(100, 2))
        .await?;
    fixtures
        .insert_mock_approved_conversion(&ctx, "txn-2", Decimal::new(100, 2))
        .await?;

    let service = CommissionService::new(&test.state.db);
    let computed = service
        .compute(
            ctx.partner.id,
            &campaign,
            &event_type,
            Some(Decimal::new(10000, 2)),
            now,
            now,
        )
        .await?;

    assert_eq!(computed.value, Decimal::new(10, 0));
    assert_eq!(computed.amount, Decimal::new(1000, 2));

    Ok(())
}

/// Expect a negative computed amount to clamp to zero and flag the
/// conversion for review
#[tokio::test]
async fn negative_amount_clamps_to_zero() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();

    // A refund-style negative event value drives the percentage negative
    let service = CommissionService::new(&test.state.db);
    let computed = service
        .compute(
            ctx.partner.id,
            &ctx.campaign,
            &ctx.event_type,
            Some(Decimal::new(-10000, 2)),
            now,
            now,
        )
        .await?;

    assert_eq!(computed.amount, Decimal::ZERO);
    assert!(computed.needs_review);

    Ok(())
}

/// Expect the computed amount to round half-even to the minor unit
#[tokio::test]
async fn amount_rounds_half_even() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::CommissionOverride
    )?;
    let fixtures = test.tracking();
    let vendor = fixtures.insert_mock_vendor().await?;
    let partner = fixtures.insert_mock_partner().await?;
    // 15% of 10.10 = 1.515, which rounds half-even to 1.52
    let campaign = fixtures
        .insert_mock_campaign(
            vendor.id,
            serde_json::json!({"type": "percentage", "value": "15"}),
            entity::campaign::AttributionPolicy::LastClick,
        )
        .await?;
    let event_type = fixtures
        .insert_mock_event_type(vendor.id, "purchase", true, None, true)
        .await?;
    let now = Utc::now().naive_utc();

    let service = CommissionService::new(&test.state.db);
    let computed = service
        .compute(
            partner.id,
            &campaign,
            &event_type,
            Some(Decimal::new(1010, 2)),
            now,
            now,
        )
        .await?;

    assert_eq!(computed.amount, Decimal::new(152, 2));

    Ok(())
}
