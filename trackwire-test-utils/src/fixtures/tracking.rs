//! Insert helpers for the tracking domain.
//!
//! These write directly through entity ActiveModels so tests can arrange
//! state without going through the code under test.

use chrono::{Duration, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection};
use uuid::Uuid;

use entity::{
    campaign::{AttributionPolicy, CampaignStatus},
    campaign_partner::EnrollmentStatus,
    conversion_event::{AttributionConfidence, AttributionType, CommissionType, ConversionStatus},
    partner::{PartnerStatus, PartnerTier},
};

use crate::{error::TestError, setup::TestSetup};

/// A fully wired tracking arrangement: vendor, active partner, active
/// campaign (20% default rule, last-click), approved enrollment, a
/// commissionable terminal `purchase` event type, and one partner link.
pub struct TrackingContext {
    pub vendor: entity::vendor::Model,
    pub partner: entity::partner::Model,
    pub campaign: entity::campaign::Model,
    pub enrollment: entity::campaign_partner::Model,
    pub event_type: entity::event_type::Model,
    pub link: entity::partner_link::Model,
}

pub struct TrackingFixtures<'a> {
    db: &'a DatabaseConnection,
}

impl TestSetup {
    pub fn tracking(&self) -> TrackingFixtures<'_> {
        TrackingFixtures {
            db: &self.state.db,
        }
    }
}

impl TrackingFixtures<'_> {
    pub async fn insert_mock_vendor(&self) -> Result<entity::vendor::Model, TestError> {
        let vendor = entity::vendor::ActiveModel {
            name: ActiveValue::Set("Acme Outfitters".to_string()),
            contact_email: ActiveValue::Set("ops@acme.example.com".to_string()),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        Ok(vendor.insert(self.db).await?)
    }

    pub async fn insert_mock_partner(&self) -> Result<entity::partner::Model, TestError> {
        let now = Utc::now().naive_utc();

        let partner = entity::partner::ActiveModel {
            name: ActiveValue::Set("Creator Collective".to_string()),
            email: ActiveValue::Set("payouts@creators.example.com".to_string()),
            status: ActiveValue::Set(PartnerStatus::Active),
            tier: ActiveValue::Set(PartnerTier::Standard),
            payment_method: ActiveValue::Set(Some("pm_test".to_string())),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(partner.insert(self.db).await?)
    }

    pub async fn insert_mock_campaign(
        &self,
        vendor_id: i32,
        commission_rule: serde_json::Value,
        attribution_policy: AttributionPolicy,
    ) -> Result<entity::campaign::Model, TestError> {
        let now = Utc::now().naive_utc();

        let campaign = entity::campaign::ActiveModel {
            vendor_id: ActiveValue::Set(vendor_id),
            name: ActiveValue::Set("Spring launch".to_string()),
            version: ActiveValue::Set(1),
            destination_url: ActiveValue::Set(
                "https://shop.example.com/?ref={partner_id}".to_string(),
            ),
            commission_rule: ActiveValue::Set(commission_rule),
            attribution_policy: ActiveValue::Set(attribution_policy),
            cookie_duration_days: ActiveValue::Set(30),
            approval_required: ActiveValue::Set(true),
            is_public: ActiveValue::Set(true),
            status: ActiveValue::Set(CampaignStatus::Active),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(campaign.insert(self.db).await?)
    }

    pub async fn insert_mock_enrollment(
        &self,
        campaign_id: i32,
        partner_id: i32,
    ) -> Result<entity::campaign_partner::Model, TestError> {
        let now = Utc::now().naive_utc();

        let enrollment = entity::campaign_partner::ActiveModel {
            campaign_id: ActiveValue::Set(campaign_id),
            partner_id: ActiveValue::Set(partner_id),
            status: ActiveValue::Set(EnrollmentStatus::Approved),
            total_clicks: ActiveValue::Set(0),
            total_conversions: ActiveValue::Set(0),
            total_revenue: ActiveValue::Set(Decimal::ZERO),
            total_commission: ActiveValue::Set(Decimal::ZERO),
            last_click_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(enrollment.insert(self.db).await?)
    }

    pub async fn insert_mock_event_type(
        &self,
        vendor_id: i32,
        key: &str,
        commissionable: bool,
        default_rule: Option<serde_json::Value>,
        is_terminal: bool,
    ) -> Result<entity::event_type::Model, TestError> {
        let event_type = entity::event_type::ActiveModel {
            vendor_id: ActiveValue::Set(vendor_id),
            key: ActiveValue::Set(key.to_string()),
            name: ActiveValue::Set(key.to_string()),
            commissionable: ActiveValue::Set(commissionable),
            default_rule: ActiveValue::Set(default_rule),
            is_terminal: ActiveValue::Set(is_terminal),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        Ok(event_type.insert(self.db).await?)
    }

    pub async fn insert_mock_link(
        &self,
        campaign_partner_id: i32,
        short_code: &str,
    ) -> Result<entity::partner_link::Model, TestError> {
        let link = entity::partner_link::ActiveModel {
            short_code: ActiveValue::Set(short_code.to_string()),
            campaign_partner_id: ActiveValue::Set(campaign_partner_id),
            custom_params: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        Ok(link.insert(self.db).await?)
    }

    /// Wires the standard arrangement most tracking tests start from.
    pub async fn insert_mock_tracking_context(&self) -> Result<TrackingContext, TestError> {
        let vendor = self.insert_mock_vendor().await?;
        let partner = self.insert_mock_partner().await?;
        let campaign = self
            .insert_mock_campaign(
                vendor.id,
                serde_json::json!({"type": "percentage", "value": "20"}),
                AttributionPolicy::LastClick,
            )
            .await?;
        let enrollment = self.insert_mock_enrollment(campaign.id, partner.id).await?;
        let event_type = self
            .insert_mock_event_type(vendor.id, "purchase", true, None, true)
            .await?;
        let link = self.insert_mock_link(enrollment.id, "spr1ng42").await?;

        Ok(TrackingContext {
            vendor,
            partner,
            campaign,
            enrollment,
            event_type,
            link,
        })
    }

    pub async fn insert_mock_cookie(
        &self,
        expires_at: NaiveDateTime,
    ) -> Result<entity::visitor_cookie::Model, TestError> {
        let now = Utc::now().naive_utc();

        let cookie = entity::visitor_cookie::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            first_click_id: ActiveValue::Set(None),
            first_partner_id: ActiveValue::Set(None),
            first_campaign_id: ActiveValue::Set(None),
            last_click_id: ActiveValue::Set(None),
            last_partner_id: ActiveValue::Set(None),
            last_campaign_id: ActiveValue::Set(None),
            last_touch_at: ActiveValue::Set(None),
            expires_at: ActiveValue::Set(expires_at),
            last_seen_at: ActiveValue::Set(now),
            created_at: ActiveValue::Set(now),
        };

        Ok(cookie.insert(self.db).await?)
    }

    pub async fn insert_mock_click(
        &self,
        partner_link_id: i32,
        cookie_id: Option<Uuid>,
        occurred_at: NaiveDateTime,
    ) -> Result<entity::click::Model, TestError> {
        let click = entity::click::ActiveModel {
            partner_link_id: ActiveValue::Set(partner_link_id),
            cookie_id: ActiveValue::Set(cookie_id),
            occurred_at: ActiveValue::Set(occurred_at),
            utm_source: ActiveValue::Set(None),
            utm_medium: ActiveValue::Set(None),
            utm_campaign: ActiveValue::Set(None),
            referrer: ActiveValue::Set(None),
            ip_address: ActiveValue::Set(None),
            user_agent: ActiveValue::Set(None),
            ..Default::default()
        };

        Ok(click.insert(self.db).await?)
    }

    /// A cookie whose first and last touch both point at the given click,
    /// i.e. a single-touch journey under `ctx`'s partner and campaign.
    pub async fn insert_mock_touched_cookie(
        &self,
        ctx: &TrackingContext,
        expires_at: NaiveDateTime,
    ) -> Result<(entity::visitor_cookie::Model, entity::click::Model), TestError> {
        use sea_orm::IntoActiveModel;

        let cookie = self.insert_mock_cookie(expires_at).await?;
        let occurred_at = Utc::now().naive_utc() - Duration::hours(1);
        let click = self
            .insert_mock_click(ctx.link.id, Some(cookie.id), occurred_at)
            .await?;

        let mut touched = cookie.clone().into_active_model();
        touched.first_click_id = ActiveValue::Set(Some(click.id));
        touched.first_partner_id = ActiveValue::Set(Some(ctx.partner.id));
        touched.first_campaign_id = ActiveValue::Set(Some(ctx.campaign.id));
        touched.last_click_id = ActiveValue::Set(Some(click.id));
        touched.last_partner_id = ActiveValue::Set(Some(ctx.partner.id));
        touched.last_campaign_id = ActiveValue::Set(Some(ctx.campaign.id));
        touched.last_touch_at = ActiveValue::Set(Some(occurred_at));
        let cookie = touched.update(self.db).await?;

        Ok((cookie, click))
    }

    /// An approved, commissioned conversion attributed to `ctx`'s pair,
    /// ready for payout allocation.
    pub async fn insert_mock_approved_conversion(
        &self,
        ctx: &TrackingContext,
        dedupe_key: &str,
        commission_amount: Decimal,
    ) -> Result<entity::conversion_event::Model, TestError> {
        let now = Utc::now().naive_utc();

        let conversion = entity::conversion_event::ActiveModel {
            dedupe_key: ActiveValue::Set(dedupe_key.to_string()),
            event_type_id: ActiveValue::Set(ctx.event_type.id),
            cookie_id: ActiveValue::Set(None),
            click_id: ActiveValue::Set(None),
            partner_id: ActiveValue::Set(Some(ctx.partner.id)),
            campaign_id: ActiveValue::Set(Some(ctx.campaign.id)),
            attribution_type: ActiveValue::Set(AttributionType::LastClick),
            attribution_confidence: ActiveValue::Set(AttributionConfidence::High),
            event_value: ActiveValue::Set(Some(commission_amount * Decimal::new(5, 0))),
            commission_type: ActiveValue::Set(Some(CommissionType::Percentage)),
            commission_value: ActiveValue::Set(Some(Decimal::new(20, 0))),
            commission_amount: ActiveValue::Set(Some(commission_amount)),
            status: ActiveValue::Set(ConversionStatus::Approved),
            needs_review: ActiveValue::Set(false),
            occurred_at: ActiveValue::Set(now - Duration::hours(1)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(conversion.insert(self.db).await?)
    }
}
