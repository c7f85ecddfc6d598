//! Click recording behind the short-code redirect.
//!
//! The redirect is the user-facing contract: once the link resolves, the
//! visitor is redirected even when click persistence ultimately fails. A
//! tracking gap is preferred over a broken redirect.

use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    data::{
        campaign::CampaignRepository, campaign_partner::CampaignPartnerRepository,
        click::ClickRepository, cookie::CookieRepository, partner_link::PartnerLinkRepository,
    },
    error::{tracking::TrackingError, Error},
    model::tracking::RequestMeta,
};

/// Attempts for the click write before giving up on tracking.
static CLICK_WRITE_ATTEMPTS: u32 = 3;
/// Base backoff between click write attempts.
static CLICK_WRITE_BACKOFF_MS: u64 = 50;

/// Outcome of a tracked redirect. `click` is `None` when the click write
/// failed after retries; the redirect still proceeds.
pub struct ClickOutcome {
    pub destination_url: String,
    pub cookie: entity::visitor_cookie::Model,
    pub click: Option<entity::click::Model>,
}

pub struct ClickService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ClickService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a click for the link behind `short_code` and returns the
    /// destination to redirect to.
    pub async fn record(
        &self,
        short_code: &str,
        request_cookie_id: Option<Uuid>,
        meta: &RequestMeta,
        now: NaiveDateTime,
    ) -> Result<ClickOutcome, Error> {
        let link_repo = PartnerLinkRepository::new(self.db);
        let enrollment_repo = CampaignPartnerRepository::new(self.db);
        let campaign_repo = CampaignRepository::new(self.db);

        let link = link_repo
            .find_by_short_code(short_code)
            .await?
            .ok_or_else(|| TrackingError::UnknownLink(short_code.to_string()))?;

        let enrollment = enrollment_repo
            .get(link.campaign_partner_id)
            .await?
            .ok_or(TrackingError::OrphanedLink(link.id, link.campaign_partner_id))?;

        let campaign = campaign_repo
            .get(enrollment.campaign_id)
            .await?
            .ok_or(TrackingError::OrphanedLink(link.id, link.campaign_partner_id))?;

        let resolver = super::resolver::CookieResolverService::new(self.db);
        let (cookie, _) = resolver
            .resolve(request_cookie_id, campaign.cookie_duration_days, now)
            .await?;

        let destination_url = build_destination(&campaign, &enrollment, &link);

        let click = self.write_click_with_retry(link.id, cookie.id, meta, now).await;

        if let Some(click) = &click {
            self.update_touch_pointers(&cookie, click, &enrollment, now)
                .await;

            // Display counters are best-effort; a lost increment is repaired
            // by the reconciliation job.
            if let Err(err) = enrollment_repo
                .increment_click_counters(enrollment.id, now)
                .await
            {
                tracing::warn!(
                    enrollment_id = enrollment.id,
                    "Failed to increment click counters: {err}"
                );
            }
        }

        Ok(ClickOutcome {
            destination_url,
            cookie,
            click,
        })
    }

    /// Retries the click write with backoff; returns `None` once the
    /// attempts are exhausted so the caller can still redirect.
    async fn write_click_with_retry(
        &self,
        partner_link_id: i32,
        cookie_id: Uuid,
        meta: &RequestMeta,
        now: NaiveDateTime,
    ) -> Option<entity::click::Model> {
        let click_repo = ClickRepository::new(self.db);

        for attempt in 0..CLICK_WRITE_ATTEMPTS {
            match click_repo
                .create(partner_link_id, Some(cookie_id), meta, now)
                .await
            {
                Ok(click) => return Some(click),
                Err(err) => {
                    tracing::warn!(
                        partner_link_id,
                        attempt,
                        "Click write failed: {err}"
                    );

                    if attempt + 1 < CLICK_WRITE_ATTEMPTS {
                        let backoff = CLICK_WRITE_BACKOFF_MS * 2u64.pow(attempt);
                        tokio::time::sleep(std::time::Duration::from_millis(backoff)).await;
                    }
                }
            }
        }

        tracing::error!(partner_link_id, "Giving up on click write; redirect proceeds untracked");

        None
    }

    /// First-touch pointers are compare-and-set; last-touch pointers are
    /// latest-wins by click timestamp. Both are best-effort on this path.
    async fn update_touch_pointers(
        &self,
        cookie: &entity::visitor_cookie::Model,
        click: &entity::click::Model,
        enrollment: &entity::campaign_partner::Model,
        occurred_at: NaiveDateTime,
    ) {
        let cookie_repo = CookieRepository::new(self.db);

        if let Err(err) = cookie_repo
            .set_first_touch(
                cookie.id,
                click.id,
                enrollment.partner_id,
                enrollment.campaign_id,
            )
            .await
        {
            tracing::warn!(cookie_id = %cookie.id, "Failed to set first-touch pointers: {err}");
        }

        if let Err(err) = cookie_repo
            .set_last_touch(
                cookie.id,
                click.id,
                enrollment.partner_id,
                enrollment.campaign_id,
                occurred_at,
            )
            .await
        {
            tracing::warn!(cookie_id = %cookie.id, "Failed to set last-touch pointers: {err}");
        }
    }
}

/// Substitutes the `{partner_id}` placeholder and appends the link's custom
/// parameters to the destination query string. A destination that fails to
/// parse is passed through with only the placeholder substituted.
fn build_destination(
    campaign: &entity::campaign::Model,
    enrollment: &entity::campaign_partner::Model,
    link: &entity::partner_link::Model,
) -> String {
    let destination = campaign
        .destination_url
        .replace("{partner_id}", &enrollment.partner_id.to_string());

    let Some(serde_json::Value::Object(params)) = &link.custom_params else {
        return destination;
    };

    let Ok(mut url) = url::Url::parse(&destination) else {
        tracing::warn!(
            campaign_id = campaign.id,
            "Destination URL is not parseable; skipping custom params"
        );
        return destination;
    };

    for (key, value) in params {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        url.query_pairs_mut().append_pair(key, &value);
    }

    url.to_string()
}
