//! Tests for display counter reconciliation.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use trackwire::{
    data::campaign_partner::CampaignPartnerRepository,
    service::reconcile::ReconciliationService,
};
use trackwire_test_utils::prelude::*;

/// Expect drifted counters to be rebuilt from the click and conversion
/// source-of-truth tables
#[tokio::test]
async fn repairs_drifted_counters() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(entity::prelude::ConversionEvent)?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let now = Utc::now().naive_utc();

    // Source of truth: two clicks, one commissioned conversion
    test.tracking()
        .insert_mock_click(ctx.link.id, None, now - Duration::hours(2))
        .await?;
    test.tracking()
        .insert_mock_click(ctx.link.id, None, now - Duration::hours(1))
        .await?;
    test.tracking()
        .insert_mock_approved_conversion(&ctx, "txn-1", Decimal::new(2000, 2))
        .await?;

    // Drift the display counters away from reality
    let enrollment_repo = CampaignPartnerRepository::new(&test.state.db);
    enrollment_repo
        .set_counters(ctx.enrollment.id, 99, 99, Decimal::new(1, 0), Decimal::new(1, 0), None)
        .await?;

    let service = ReconciliationService::new(&test.state.db);
    let reconciled = service.reconcile_counters().await?;
    assert_eq!(reconciled, 1);

    let enrollment = enrollment_repo.get(ctx.enrollment.id).await?.unwrap();
    assert_eq!(enrollment.total_clicks, 2);
    assert_eq!(enrollment.total_conversions, 1);
    assert_eq!(enrollment.total_revenue, Decimal::new(10000, 2));
    assert_eq!(enrollment.total_commission, Decimal::new(2000, 2));
    assert_eq!(enrollment.last_click_at, Some(now - Duration::hours(1)));

    Ok(())
}

/// Expect reconciliation over an empty enrollment to zero the counters
#[tokio::test]
async fn zeroes_counters_with_no_activity() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(entity::prelude::ConversionEvent)?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;

    let enrollment_repo = CampaignPartnerRepository::new(&test.state.db);
    enrollment_repo
        .set_counters(
            ctx.enrollment.id,
            5,
            5,
            Decimal::new(100, 0),
            Decimal::new(100, 0),
            None,
        )
        .await?;

    let service = ReconciliationService::new(&test.state.db);
    service.reconcile_counters().await?;

    let enrollment = enrollment_repo.get(ctx.enrollment.id).await?.unwrap();
    assert_eq!(enrollment.total_clicks, 0);
    assert_eq!(enrollment.total_conversions, 0);
    assert_eq!(enrollment.total_revenue, Decimal::ZERO);

    Ok(())
}
