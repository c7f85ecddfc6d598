//! Conversion attribution.
//!
//! Every inbound conversion is persisted exactly once, keyed by its dedupe
//! key; replays return the stored result. Conversions that cannot be tied
//! to a live cookie are recorded as unattributed with commission withheld,
//! never dropped.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use entity::{
    campaign::AttributionPolicy,
    conversion_event::{AttributionConfidence, AttributionType},
};

use crate::{
    data::{
        campaign::CampaignRepository, campaign_partner::CampaignPartnerRepository,
        click::ClickRepository, conversion::{ConversionRepository, NewConversion},
        cookie::CookieRepository, event_type::EventTypeRepository,
    },
    error::{
        attribution::{AttributionError, UnattributedReason},
        Error,
    },
    service::commission::CommissionService,
};

/// A conversion as delivered by the ingestion webhook, before attribution.
pub struct ConversionInput {
    pub dedupe_key: String,
    pub vendor_id: i32,
    pub event_type_key: String,
    pub cookie_id: Option<Uuid>,
    pub click_id: Option<i64>,
    pub event_value: Option<Decimal>,
    pub occurred_at: NaiveDateTime,
}

/// The attribution decision for one conversion.
struct Attribution {
    cookie_id: Uuid,
    partner_id: i32,
    campaign_id: i32,
    click_id: Option<i64>,
    attribution_type: AttributionType,
    confidence: AttributionConfidence,
}

pub struct AttributionService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AttributionService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attributes and prices a conversion, persisting it exactly once.
    ///
    /// Replaying a dedupe key returns the originally stored row, so the
    /// ingestion pipeline may deliver at-least-once.
    pub async fn attribute(
        &self,
        input: ConversionInput,
        now: NaiveDateTime,
    ) -> Result<entity::conversion_event::Model, Error> {
        let conversion_repo = ConversionRepository::new(self.db);

        if let Some(stored) = conversion_repo.find_by_dedupe_key(&input.dedupe_key).await? {
            return Ok(stored);
        }

        let event_type_repo = EventTypeRepository::new(self.db);
        let event_type = event_type_repo
            .find_by_key(input.vendor_id, &input.event_type_key)
            .await?
            .ok_or_else(|| {
                AttributionError::UnknownEventType(
                    input.dedupe_key.clone(),
                    input.event_type_key.clone(),
                )
            })?;

        let decision = self.decide(&input, now).await?;

        let new = match decision {
            Ok(attribution) => {
                self.build_attributed(&input, &event_type, attribution, now)
                    .await?
            }
            Err(reason) => {
                tracing::info!(
                    dedupe_key = %input.dedupe_key,
                    "Recording conversion without commission: {}",
                    AttributionError::Unattributed(reason)
                );

                NewConversion {
                    dedupe_key: input.dedupe_key.clone(),
                    event_type_id: event_type.id,
                    cookie_id: input.cookie_id,
                    click_id: input.click_id,
                    partner_id: None,
                    campaign_id: None,
                    attribution_type: AttributionType::Unattributed,
                    attribution_confidence: AttributionConfidence::Low,
                    event_value: input.event_value,
                    commission_type: None,
                    commission_value: None,
                    commission_amount: None,
                    needs_review: true,
                    occurred_at: input.occurred_at,
                }
            }
        };

        let (model, created) = conversion_repo.insert_first_write_wins(new).await?;

        if created {
            self.bump_display_counters(&model).await;
        }

        Ok(model)
    }

    /// Resolves the cookie and applies the campaign's attribution policy.
    /// Returns the unattributed reason instead of an error so the caller can
    /// record the conversion either way.
    async fn decide(
        &self,
        input: &ConversionInput,
        now: NaiveDateTime,
    ) -> Result<Result<Attribution, UnattributedReason>, Error> {
        let cookie_repo = CookieRepository::new(self.db);
        let click_repo = ClickRepository::new(self.db);
        let campaign_repo = CampaignRepository::new(self.db);

        let cookie_id = match (input.cookie_id, input.click_id) {
            (Some(cookie_id), _) => Some(cookie_id),
            (None, Some(click_id)) => click_repo
                .get(click_id)
                .await?
                .and_then(|click| click.cookie_id),
            (None, None) => return Ok(Err(UnattributedReason::NoIdentity)),
        };

        let Some(cookie_id) = cookie_id else {
            return Ok(Err(UnattributedReason::UnknownIdentity));
        };
        let Some(cookie) = cookie_repo.get(cookie_id).await? else {
            return Ok(Err(UnattributedReason::UnknownIdentity));
        };

        // The most recent touch's campaign governs the attribution policy.
        let Some(policy_campaign_id) = cookie.last_campaign_id.or(cookie.first_campaign_id) else {
            return Ok(Err(UnattributedReason::NoTouchRecorded));
        };
        let Some(policy_campaign) = campaign_repo.get(policy_campaign_id).await? else {
            return Ok(Err(UnattributedReason::UnknownIdentity));
        };

        let expired = now > cookie.expires_at;

        let attribution = match policy_campaign.attribution_policy {
            AttributionPolicy::LastClick => {
                if expired {
                    return Ok(Err(UnattributedReason::CookieExpired));
                }

                let (Some(partner_id), Some(campaign_id)) =
                    (cookie.last_partner_id, cookie.last_campaign_id)
                else {
                    return Ok(Err(UnattributedReason::NoTouchRecorded));
                };

                Attribution {
                    cookie_id: cookie.id,
                    partner_id,
                    campaign_id,
                    click_id: cookie.last_click_id,
                    attribution_type: AttributionType::LastClick,
                    confidence: AttributionConfidence::High,
                }
            }
            AttributionPolicy::FirstClick => {
                let (Some(partner_id), Some(campaign_id)) =
                    (cookie.first_partner_id, cookie.first_campaign_id)
                else {
                    return Ok(Err(UnattributedReason::NoTouchRecorded));
                };

                // Past nominal expiry, first-click attribution is honored
                // only when no competing touch followed the first one, at
                // reduced confidence.
                let confidence = if !expired {
                    AttributionConfidence::High
                } else if cookie.first_click_id == cookie.last_click_id {
                    AttributionConfidence::Medium
                } else {
                    return Ok(Err(UnattributedReason::CookieExpired));
                };

                Attribution {
                    cookie_id: cookie.id,
                    partner_id,
                    campaign_id,
                    click_id: cookie.first_click_id,
                    attribution_type: AttributionType::FirstClick,
                    confidence,
                }
            }
        };

        // Clock skew or replay: a conversion stamped before its click is
        // still attributed, at low confidence, and logged for review.
        let attribution = match attribution.click_id {
            Some(click_id) => {
                let click = click_repo.get(click_id).await?;

                match click {
                    Some(click) if input.occurred_at < click.occurred_at => {
                        tracing::warn!(
                            dedupe_key = %input.dedupe_key,
                            click_id,
                            "Conversion precedes its attributed click; downgrading confidence"
                        );

                        Attribution {
                            confidence: AttributionConfidence::Low,
                            ..attribution
                        }
                    }
                    _ => attribution,
                }
            }
            None => attribution,
        };

        Ok(Ok(attribution))
    }

    /// Builds the stored row for an attributed conversion, pricing it when
    /// the event type is commissionable. Commission input errors mark the
    /// row for review instead of dropping the conversion.
    async fn build_attributed(
        &self,
        input: &ConversionInput,
        event_type: &entity::event_type::Model,
        attribution: Attribution,
        now: NaiveDateTime,
    ) -> Result<NewConversion, Error> {
        let campaign_repo = CampaignRepository::new(self.db);
        let commission_service = CommissionService::new(self.db);

        let mut new = NewConversion {
            dedupe_key: input.dedupe_key.clone(),
            event_type_id: event_type.id,
            cookie_id: Some(attribution.cookie_id),
            click_id: attribution.click_id.or(input.click_id),
            partner_id: Some(attribution.partner_id),
            campaign_id: Some(attribution.campaign_id),
            attribution_type: attribution.attribution_type,
            attribution_confidence: attribution.confidence,
            event_value: input.event_value,
            commission_type: None,
            commission_value: None,
            commission_amount: None,
            needs_review: false,
            occurred_at: input.occurred_at,
        };

        if !event_type.commissionable {
            return Ok(new);
        }

        let Some(campaign) = campaign_repo.get(attribution.campaign_id).await? else {
            new.needs_review = true;
            return Ok(new);
        };

        match commission_service
            .compute(
                attribution.partner_id,
                &campaign,
                event_type,
                input.event_value,
                input.occurred_at,
                now,
            )
            .await
        {
            Ok(computed) => {
                new.commission_type = Some(computed.commission_type);
                new.commission_value = Some(computed.value);
                new.commission_amount = Some(computed.amount);
                new.needs_review = computed.needs_review;
            }
            Err(Error::CommissionError(err)) => {
                tracing::warn!(
                    dedupe_key = %input.dedupe_key,
                    "Commission computation rejected, conversion held for review: {err}"
                );

                new.needs_review = true;
            }
            Err(err) => return Err(err),
        }

        Ok(new)
    }

    /// Best-effort conversion counter bump for the attributed enrollment.
    async fn bump_display_counters(&self, model: &entity::conversion_event::Model) {
        let (Some(partner_id), Some(campaign_id)) = (model.partner_id, model.campaign_id) else {
            return;
        };

        let enrollment_repo = CampaignPartnerRepository::new(self.db);

        let enrollment = match enrollment_repo.find_pair(campaign_id, partner_id).await {
            Ok(Some(enrollment)) => enrollment,
            Ok(None) => return,
            Err(err) => {
                tracing::warn!("Failed to load enrollment for counter bump: {err}");
                return;
            }
        };

        if let Err(err) = enrollment_repo
            .increment_conversion_counters(
                enrollment.id,
                model.event_value.unwrap_or(Decimal::ZERO),
                model.commission_amount.unwrap_or(Decimal::ZERO),
            )
            .await
        {
            tracing::warn!(
                enrollment_id = enrollment.id,
                "Failed to increment conversion counters: {err}"
            );
        }
    }
}
