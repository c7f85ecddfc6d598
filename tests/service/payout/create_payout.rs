//! Tests for PayoutService::create_payout.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use trackwire::service::payout::PayoutService;
use trackwire_test_utils::prelude::*;

use entity::payout::PayoutStatus;

/// Expect a payout summing every approved unallocated conversion in the
/// period
#[tokio::test]
async fn sums_eligible_conversions() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::Payout,
        entity::prelude::PayoutEvent
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let fixtures = test.tracking();

    fixtures
        .insert_mock_approved_conversion(&ctx, "txn-1", Decimal::new(2000, 2))
        .await?;
    fixtures
        .insert_mock_approved_conversion(&ctx, "txn-2", Decimal::new(1550, 2))
        .await?;

    let now = Utc::now().naive_utc();
    let service = PayoutService::new(&test.state.db);
    let payout = service
        .create_payout(ctx.partner.id, "pm_test", now - Duration::days(30), now)
        .await?;

    assert_eq!(payout.status, PayoutStatus::Pending);
    assert_eq!(payout.amount, Decimal::new(3550, 2));
    assert_eq!(payout.partner_id, ctx.partner.id);
    assert_eq!(payout.currency, trackwire_test_utils::constant::TEST_CURRENCY);

    Ok(())
}

/// Expect NothingToPayOut when no eligible conversions exist in the period
#[tokio::test]
async fn fails_with_empty_period() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::Payout,
        entity::prelude::PayoutEvent
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;

    let now = Utc::now().naive_utc();
    let service = PayoutService::new(&test.state.db);
    let result = service
        .create_payout(ctx.partner.id, "pm_test", now - Duration::days(30), now)
        .await;

    assert!(matches!(
        result,
        Err(trackwire::error::Error::PayoutError(
            trackwire::error::payout::PayoutError::NothingToPayOut(_)
        ))
    ));

    Ok(())
}

/// Expect a second payout over the same period to find nothing left: no
/// conversion is ever allocated twice
#[tokio::test]
async fn no_double_allocation_across_payouts() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::Payout,
        entity::prelude::PayoutEvent
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;

    let conversion = test
        .tracking()
        .insert_mock_approved_conversion(&ctx, "txn-1", Decimal::new(2000, 2))
        .await?;

    let now = Utc::now().naive_utc();
    let service = PayoutService::new(&test.state.db);

    service
        .create_payout(ctx.partner.id, "pm_test", now - Duration::days(30), now)
        .await?;

    // Same period again: the only conversion is already allocated
    let second = service
        .create_payout(ctx.partner.id, "pm_test", now - Duration::days(30), now)
        .await;
    assert!(matches!(
        second,
        Err(trackwire::error::Error::PayoutError(
            trackwire::error::payout::PayoutError::NothingToPayOut(_)
        ))
    ));

    // The allocation row for the conversion exists exactly once
    let allocation_count = entity::prelude::PayoutEvent::find()
        .filter(entity::payout_event::Column::ConversionEventId.eq(conversion.id))
        .count(&test.state.db)
        .await?;
    assert_eq!(allocation_count, 1);

    Ok(())
}

/// Expect pending and rejected conversions to be excluded from allocation
#[tokio::test]
async fn only_approved_conversions_are_allocated() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::Payout,
        entity::prelude::PayoutEvent
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;

    let approved = test
        .tracking()
        .insert_mock_approved_conversion(&ctx, "txn-approved", Decimal::new(2000, 2))
        .await?;
    let pending = test
        .tracking()
        .insert_mock_approved_conversion(&ctx, "txn-pending", Decimal::new(999, 2))
        .await?;

    // Demote the second conversion back to pending
    use trackwire::data::conversion::ConversionRepository;
    let conversion_repo = ConversionRepository::new(&test.state.db);
    conversion_repo
        .set_status(pending.id, entity::conversion_event::ConversionStatus::Pending)
        .await?;

    let now = Utc::now().naive_utc();
    let service = PayoutService::new(&test.state.db);
    let payout = service
        .create_payout(ctx.partner.id, "pm_test", now - Duration::days(30), now)
        .await?;

    assert_eq!(payout.amount, Decimal::new(2000, 2));

    let allocations = entity::prelude::PayoutEvent::find()
        .filter(entity::payout_event::Column::PayoutId.eq(payout.id))
        .all(&test.state.db)
        .await?;
    assert_eq!(allocations.len(), 1);
    assert_eq!(allocations[0].conversion_event_id, approved.id);

    Ok(())
}

/// Expect conversions outside [period_start, period_end) to be left alone
#[tokio::test]
async fn period_bounds_are_half_open() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::Payout,
        entity::prelude::PayoutEvent
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;

    test.tracking()
        .insert_mock_approved_conversion(&ctx, "txn-1", Decimal::new(2000, 2))
        .await?;

    // The fixture stamps the conversion one hour ago; a period ending two
    // hours ago excludes it
    let now = Utc::now().naive_utc();
    let service = PayoutService::new(&test.state.db);
    let result = service
        .create_payout(
            ctx.partner.id,
            "pm_test",
            now - Duration::days(30),
            now - Duration::hours(2),
        )
        .await;

    assert!(matches!(
        result,
        Err(trackwire::error::Error::PayoutError(
            trackwire::error::payout::PayoutError::NothingToPayOut(_)
        ))
    ));

    Ok(())
}
