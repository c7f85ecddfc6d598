//! Visitor cookie resolution.

use chrono::{Duration, NaiveDateTime};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    data::cookie::CookieRepository,
    error::{tracking::TrackingError, Error},
};

pub struct CookieResolverService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CookieResolverService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the live cookie for `request_cookie_id`, or mints a fresh one.
    ///
    /// An unknown or expired id falls back to a fresh cookie rather than
    /// failing: a stale browser cookie must never break the redirect. The
    /// returned flag is true when a new cookie was created.
    pub async fn resolve(
        &self,
        request_cookie_id: Option<Uuid>,
        cookie_duration_days: i32,
        now: NaiveDateTime,
    ) -> Result<(entity::visitor_cookie::Model, bool), Error> {
        let cookie_repo = CookieRepository::new(self.db);
        let expires_at = now + Duration::days(cookie_duration_days as i64);

        if let Some(id) = request_cookie_id {
            if let Some(cookie) = cookie_repo.find_live(id, now).await? {
                cookie_repo.touch(cookie.id, now, expires_at).await?;

                return Ok((cookie, false));
            }

            // Unknown or expired ids never abort the redirect; the lookup
            // failure is noted and a fresh identity takes over
            tracing::debug!("{}; minting fresh cookie", TrackingError::UnknownCookie(id));
        }

        let cookie = cookie_repo.create(Uuid::new_v4(), now, expires_at).await?;

        Ok((cookie, true))
    }
}
