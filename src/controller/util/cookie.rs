//! Tracking cookie helpers for the redirect path.

use axum::http::{header, HeaderMap};
use chrono::NaiveDateTime;
use uuid::Uuid;

/// Extracts the tracking cookie's visitor id from the request, if present
/// and well formed. A malformed value is treated as absent; the resolver
/// will mint a fresh identity.
pub fn tracking_cookie_id(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;

        if name == cookie_name {
            Uuid::parse_str(value).ok()
        } else {
            None
        }
    })
}

/// Builds the `Set-Cookie` value re-issuing the tracking cookie with its
/// current expiry.
pub fn build_tracking_cookie(cookie_name: &str, id: Uuid, expires_at: NaiveDateTime) -> String {
    format!(
        "{}={}; Path=/; Expires={}; SameSite=Lax",
        cookie_name,
        id,
        expires_at.and_utc().format("%a, %d %b %Y %H:%M:%S GMT")
    )
}
