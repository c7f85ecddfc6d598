//! Tests for CookieResolverService::resolve.

use chrono::{Duration, Utc};
use trackwire::{data::cookie::CookieRepository, service::tracking::resolver::CookieResolverService};
use trackwire_test_utils::prelude::*;

/// Expect a fresh cookie with the campaign's window when none is presented
#[tokio::test]
async fn mints_fresh_cookie() -> Result<(), TestError> {
    let test = test_setup_with_tables!(entity::prelude::VisitorCookie)?;
    let now = Utc::now().naive_utc();

    let resolver = CookieResolverService::new(&test.state.db);
    let (cookie, created) = resolver.resolve(None, 30, now).await?;

    assert!(created);
    assert_eq!(cookie.expires_at, now + Duration::days(30));
    assert_eq!(cookie.first_click_id, None);

    Ok(())
}

/// Expect a live cookie to be returned and touched
#[tokio::test]
async fn returns_live_cookie() -> Result<(), TestError> {
    let test = test_setup_with_tables!(entity::prelude::VisitorCookie)?;
    let now = Utc::now().naive_utc();
    let existing = test
        .tracking()
        .insert_mock_cookie(now + Duration::days(10))
        .await?;

    let resolver = CookieResolverService::new(&test.state.db);
    let (cookie, created) = resolver.resolve(Some(existing.id), 30, now).await?;

    assert!(!created);
    assert_eq!(cookie.id, existing.id);

    // The touch pushed the expiry out to the full 30-day window
    let cookie_repo = CookieRepository::new(&test.state.db);
    let stored = cookie_repo.get(existing.id).await?.unwrap();
    assert_eq!(stored.expires_at, now + Duration::days(30));

    Ok(())
}

/// Expect an unknown cookie id to fall back to a fresh cookie
#[tokio::test]
async fn unknown_id_falls_back_to_fresh() -> Result<(), TestError> {
    let test = test_setup_with_tables!(entity::prelude::VisitorCookie)?;
    let now = Utc::now().naive_utc();

    let resolver = CookieResolverService::new(&test.state.db);
    let (cookie, created) = resolver
        .resolve(Some(uuid::Uuid::new_v4()), 30, now)
        .await?;

    assert!(created);
    assert!(cookie.expires_at > now);

    Ok(())
}
