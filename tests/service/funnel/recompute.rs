//! Tests for FunnelService::recompute.

use chrono::{Duration, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue};
use trackwire::{data::funnel::FunnelJourneyRepository, service::funnel::FunnelService};
use trackwire_test_utils::prelude::*;
use uuid::Uuid;

use entity::conversion_event::{
    AttributionConfidence, AttributionType, CommissionType, ConversionStatus,
};

/// Inserts an attributed conversion tied to a cookie for journey grouping.
async fn insert_journey_event(
    test: &TestSetup,
    ctx: &TrackingContext,
    cookie_id: Uuid,
    dedupe_key: &str,
    event_type_id: i32,
    commission: Option<Decimal>,
    occurred_at: NaiveDateTime,
) -> Result<entity::conversion_event::Model, TestError> {
    let now = Utc::now().naive_utc();

    let conversion = entity::conversion_event::ActiveModel {
        dedupe_key: ActiveValue::Set(dedupe_key.to_string()),
        event_type_id: ActiveValue::Set(event_type_id),
        cookie_id: ActiveValue::Set(Some(cookie_id)),
        click_id: ActiveValue::Set(None),
        partner_id: ActiveValue::Set(Some(ctx.partner.id)),
        campaign_id: ActiveValue::Set(Some(ctx.campaign.id)),
        attribution_type: ActiveValue::Set(AttributionType::LastClick),
        attribution_confidence: ActiveValue::Set(AttributionConfidence::High),
        event_value: ActiveValue::Set(commission.map(|c| c * Decimal::new(5, 0))),
        commission_type: ActiveValue::Set(commission.map(|_| CommissionType::Percentage)),
        commission_value: ActiveValue::Set(commission.map(|_| Decimal::new(20, 0))),
        commission_amount: ActiveValue::Set(commission),
        status: ActiveValue::Set(ConversionStatus::Approved),
        needs_review: ActiveValue::Set(false),
        occurred_at: ActiveValue::Set(occurred_at),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    };

    Ok(conversion.insert(&test.state.db).await?)
}

/// Expect one journey per (cookie, partner, campaign) with summed
/// commission and min/max timestamps
#[tokio::test]
async fn groups_events_into_journeys() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::FunnelJourney
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();
    let cookie = test
        .tracking()
        .insert_mock_cookie(now + Duration::days(30))
        .await?;

    // A non-terminal lead event followed by a terminal purchase
    let lead = test
        .tracking()
        .insert_mock_event_type(ctx.vendor.id, "lead", false, None, false)
        .await?;

    let started_at = now - Duration::hours(3);
    let converted_at = now - Duration::hours(1);
    insert_journey_event(&test, &ctx, cookie.id, "txn-lead", lead.id, None, started_at).await?;
    insert_journey_event(
        &test,
        &ctx,
        cookie.id,
        "txn-purchase",
        ctx.event_type.id,
        Some(Decimal::new(2000, 2)),
        converted_at,
    )
    .await?;

    let service = FunnelService::new(&test.state.db);
    let written = service.recompute(now).await?;
    assert_eq!(written, 1);

    let journey_repo = FunnelJourneyRepository::new(&test.state.db);
    let journey = journey_repo
        .find_by_key(cookie.id, ctx.partner.id, ctx.campaign.id)
        .await?
        .unwrap();

    assert_eq!(journey.total_events, 2);
    assert_eq!(journey.journey_started_at, started_at);
    assert_eq!(journey.last_event_at, converted_at);
    assert_eq!(journey.total_commission, Decimal::new(2000, 2));
    assert!(journey.is_converted);

    Ok(())
}

/// Expect a journey that never reached a terminal event to stay incomplete
#[tokio::test]
async fn journey_without_terminal_event_is_incomplete() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::FunnelJourney
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();
    let cookie = test
        .tracking()
        .insert_mock_cookie(now + Duration::days(30))
        .await?;

    let lead = test
        .tracking()
        .insert_mock_event_type(ctx.vendor.id, "lead", false, None, false)
        .await?;

    insert_journey_event(&test, &ctx, cookie.id, "txn-lead", lead.id, None, now).await?;

    let service = FunnelService::new(&test.state.db);
    service.recompute(now).await?;

    let journey_repo = FunnelJourneyRepository::new(&test.state.db);
    let journey = journey_repo
        .find_by_key(cookie.id, ctx.partner.id, ctx.campaign.id)
        .await?
        .unwrap();

    assert!(!journey.is_converted);
    assert_eq!(journey.total_commission, Decimal::ZERO);

    Ok(())
}

/// Expect reruns to be idempotent: same journeys, no double counting
#[tokio::test]
async fn recompute_is_idempotent() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::FunnelJourney
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();
    let cookie = test
        .tracking()
        .insert_mock_cookie(now + Duration::days(30))
        .await?;

    insert_journey_event(
        &test,
        &ctx,
        cookie.id,
        "txn-1",
        ctx.event_type.id,
        Some(Decimal::new(2000, 2)),
        now - Duration::hours(1),
    )
    .await?;

    let service = FunnelService::new(&test.state.db);
    service.recompute(now).await?;
    service.recompute(now).await?;

    let journey_repo = FunnelJourneyRepository::new(&test.state.db);
    let journeys = journey_repo.list_all().await?;

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].total_events, 1);
    assert_eq!(journeys[0].total_commission, Decimal::new(2000, 2));

    Ok(())
}

/// Expect unattributed conversions to stay out of the projection
#[tokio::test]
async fn unattributed_events_are_excluded() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::FunnelJourney
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();

    // An unattributed conversion: no cookie, partner, or campaign
    let conversion = entity::conversion_event::ActiveModel {
        dedupe_key: ActiveValue::Set("txn-unattributed".to_string()),
        event_type_id: ActiveValue::Set(ctx.event_type.id),
        cookie_id: ActiveValue::Set(None),
        click_id: ActiveValue::Set(None),
        partner_id: ActiveValue::Set(None),
        campaign_id: ActiveValue::Set(None),
        attribution_type: ActiveValue::Set(AttributionType::Unattributed),
        attribution_confidence: ActiveValue::Set(AttributionConfidence::Low),
        event_value: ActiveValue::Set(None),
        commission_type: ActiveValue::Set(None),
        commission_value: ActiveValue::Set(None),
        commission_amount: ActiveValue::Set(None),
        status: ActiveValue::Set(ConversionStatus::Pending),
        needs_review: ActiveValue::Set(true),
        occurred_at: ActiveValue::Set(now),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    };
    conversion.insert(&test.state.db).await?;

    let service = FunnelService::new(&test.state.db);
    let written = service.recompute(now).await?;

    assert_eq!(written, 0);

    Ok(())
}
