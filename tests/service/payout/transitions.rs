//! Tests for the payout state machine.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use trackwire::service::payout::PayoutService;
use trackwire_test_utils::prelude::*;

use entity::payout::PayoutStatus;

async fn pending_payout(
    test: &TestSetup,
    ctx: &TrackingContext,
) -> Result<entity::payout::Model, TestError> {
    test.tracking()
        .insert_mock_approved_conversion(ctx, "txn-1", Decimal::new(2000, 2))
        .await?;

    let now = Utc::now().naive_utc();
    let service = PayoutService::new(&test.state.db);
    let payout = service
        .create_payout(ctx.partner.id, "pm_test", now - Duration::days(30), now)
        .await?;

    Ok(payout)
}

/// Expect pending -> processing to submit a disbursement to the provider
#[tokio::test]
async fn processing_submits_disbursement() -> Result<(), TestError> {
    let mut test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::Payout,
        entity::prelude::PayoutEvent
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let payout = pending_payout(&test, &ctx).await?;

    let mock = test.with_disbursement_endpoint("prov_txn_1", 1);

    let service = PayoutService::new(&test.state.db);
    let payout = service
        .mark_processing(payout.id, &test.state.provider)
        .await?;

    assert_eq!(payout.status, PayoutStatus::Processing);

    // The disbursement call is fire-and-forget; give the spawned task a
    // moment before asserting the endpoint was hit
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    mock.assert();

    Ok(())
}

/// Expect processing -> completed to record the provider transaction id
#[tokio::test]
async fn completes_from_processing() -> Result<(), TestError> {
    let mut test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::Payout,
        entity::prelude::PayoutEvent
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let payout = pending_payout(&test, &ctx).await?;
    let _mock = test.with_disbursement_endpoint("prov_txn_1", 1);

    let service = PayoutService::new(&test.state.db);
    service
        .mark_processing(payout.id, &test.state.provider)
        .await?;

    let payout = service.mark_completed(payout.id, "prov_txn_1").await?;

    assert_eq!(payout.status, PayoutStatus::Completed);
    assert_eq!(payout.provider_txn_id.as_deref(), Some("prov_txn_1"));

    Ok(())
}

/// Expect completing a pending payout to fail with InvalidStateTransition
#[tokio::test]
async fn cannot_complete_from_pending() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::Payout,
        entity::prelude::PayoutEvent
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let payout = pending_payout(&test, &ctx).await?;

    let service = PayoutService::new(&test.state.db);
    let result = service.mark_completed(payout.id, "prov_txn_1").await;

    assert!(matches!(
        result,
        Err(trackwire::error::Error::PayoutError(
            trackwire::error::payout::PayoutError::InvalidStateTransition {
                from: PayoutStatus::Pending,
                to: PayoutStatus::Completed,
                ..
            }
        ))
    ));

    Ok(())
}

/// Expect completed to be terminal: no transition leaves it
#[tokio::test]
async fn completed_is_terminal() -> Result<(), TestError> {
    let mut test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::Payout,
        entity::prelude::PayoutEvent
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let payout = pending_payout(&test, &ctx).await?;
    let _mock = test.with_disbursement_endpoint("prov_txn_1", 1);

    let service = PayoutService::new(&test.state.db);
    service
        .mark_processing(payout.id, &test.state.provider)
        .await?;
    service.mark_completed(payout.id, "prov_txn_1").await?;

    let reprocess = service
        .mark_processing(payout.id, &test.state.provider)
        .await;
    assert!(reprocess.is_err());

    let retry = service.retry(payout.id).await;
    assert!(retry.is_err());

    Ok(())
}

/// Expect failed -> pending on manual retry, then a fresh processing run
#[tokio::test]
async fn failed_payout_can_retry() -> Result<(), TestError> {
    let mut test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::Payout,
        entity::prelude::PayoutEvent
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let payout = pending_payout(&test, &ctx).await?;
    let _mock = test.with_disbursement_endpoint("prov_txn_1", 2);

    let service = PayoutService::new(&test.state.db);
    service
        .mark_processing(payout.id, &test.state.provider)
        .await?;

    let payout = service
        .mark_failed(payout.id, "destination account closed")
        .await?;
    assert_eq!(payout.status, PayoutStatus::Failed);
    assert_eq!(
        payout.failure_reason.as_deref(),
        Some("destination account closed")
    );

    let payout = service.retry(payout.id).await?;
    assert_eq!(payout.status, PayoutStatus::Pending);

    let payout = service
        .mark_processing(payout.id, &test.state.provider)
        .await?;
    assert_eq!(payout.status, PayoutStatus::Processing);

    Ok(())
}

/// Expect a rejected disbursement call to leave the payout in processing;
/// the failure is recorded later through the manual fail transition
#[tokio::test]
async fn rejected_disbursement_does_not_move_state() -> Result<(), TestError> {
    let mut test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::Payout,
        entity::prelude::PayoutEvent
    )?;
    let ctx = test.tracking().insert_mock_tracking_context().await?;
    let payout = pending_payout(&test, &ctx).await?;
    let _mock = test.with_failing_disbursement_endpoint(502);

    let service = PayoutService::new(&test.state.db);
    let payout = service
        .mark_processing(payout.id, &test.state.provider)
        .await?;

    assert_eq!(payout.status, PayoutStatus::Processing);

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    let service = PayoutService::new(&test.state.db);
    let payout = service
        .mark_failed(payout.id, "provider rejected disbursement")
        .await?;
    assert_eq!(payout.status, PayoutStatus::Failed);

    Ok(())
}

/// Expect NotFound when transitioning a payout that does not exist
#[tokio::test]
async fn unknown_payout_is_not_found() -> Result<(), TestError> {
    let test = test_setup_with_tracking_tables!(
        entity::prelude::ConversionEvent,
        entity::prelude::Payout,
        entity::prelude::PayoutEvent
    )?;

    let service = PayoutService::new(&test.state.db);
    let result = service.mark_completed(4242, "prov_txn_1").await;

    assert!(matches!(
        result,
        Err(trackwire::error::Error::PayoutError(
            trackwire::error::payout::PayoutError::NotFound(4242)
        ))
    ));

    Ok(())
}
