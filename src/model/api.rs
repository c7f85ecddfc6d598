//! Request and response DTOs for the HTTP API.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use entity::{
    campaign::{AttributionPolicy, CampaignStatus},
    campaign_partner::EnrollmentStatus,
    conversion_event::{AttributionConfidence, AttributionType, ConversionStatus},
    partner::{PartnerStatus, PartnerTier},
    payout::PayoutStatus,
};

use crate::model::commission::CommissionRule;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    pub error: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCampaignDto {
    pub vendor_id: i32,
    pub name: String,
    pub destination_url: String,
    #[schema(value_type = Object)]
    pub commission_rule: CommissionRule,
    #[schema(value_type = String)]
    pub attribution_policy: Option<AttributionPolicy>,
    pub cookie_duration_days: i32,
    pub approval_required: bool,
    pub is_public: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCampaignDto {
    pub name: Option<String>,
    pub destination_url: Option<String>,
    #[schema(value_type = Object)]
    pub commission_rule: Option<CommissionRule>,
    #[schema(value_type = String)]
    pub attribution_policy: Option<AttributionPolicy>,
    pub cookie_duration_days: Option<i32>,
    pub approval_required: Option<bool>,
    pub is_public: Option<bool>,
    #[schema(value_type = String)]
    pub status: Option<CampaignStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CampaignDto {
    pub id: i32,
    pub vendor_id: i32,
    pub name: String,
    pub version: i32,
    pub destination_url: String,
    #[schema(value_type = Object)]
    pub commission_rule: CommissionRule,
    #[schema(value_type = String)]
    pub attribution_policy: AttributionPolicy,
    pub cookie_duration_days: i32,
    pub approval_required: bool,
    pub is_public: bool,
    #[schema(value_type = String)]
    pub status: CampaignStatus,
}

impl From<entity::campaign::Model> for CampaignDto {
    fn from(model: entity::campaign::Model) -> Self {
        let commission_rule =
            CommissionRule::from_json(&model.commission_rule).unwrap_or(CommissionRule::Flat {
                value: Decimal::ZERO,
            });

        Self {
            id: model.id,
            vendor_id: model.vendor_id,
            name: model.name,
            version: model.version,
            destination_url: model.destination_url,
            commission_rule,
            attribution_policy: model.attribution_policy,
            cookie_duration_days: model.cookie_duration_days,
            approval_required: model.approval_required,
            is_public: model.is_public,
            status: model.status,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLinkDto {
    pub campaign_partner_id: i32,
    #[schema(value_type = Object)]
    pub custom_params: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkDto {
    pub id: i32,
    pub short_code: String,
    pub campaign_partner_id: i32,
}

impl From<entity::partner_link::Model> for LinkDto {
    fn from(model: entity::partner_link::Model) -> Self {
        Self {
            id: model.id,
            short_code: model.short_code,
            campaign_partner_id: model.campaign_partner_id,
        }
    }
}

/// Vendor-originated conversion event. Either `transaction_id` or
/// `idempotency_key` must be present; replays of the same key return the
/// originally stored result.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConversionWebhookDto {
    pub vendor_id: i32,
    pub event_type: String,
    pub transaction_id: Option<String>,
    pub idempotency_key: Option<String>,
    pub cookie_id: Option<Uuid>,
    pub click_id: Option<i64>,
    #[schema(value_type = String, nullable)]
    pub event_value: Option<Decimal>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversionResultDto {
    pub id: i64,
    pub dedupe_key: String,
    #[schema(value_type = String)]
    pub attribution_type: AttributionType,
    #[schema(value_type = String)]
    pub attribution_confidence: AttributionConfidence,
    pub partner_id: Option<i32>,
    pub campaign_id: Option<i32>,
    #[schema(value_type = String, nullable)]
    pub commission_amount: Option<Decimal>,
    #[schema(value_type = String)]
    pub status: ConversionStatus,
    pub needs_review: bool,
}

impl From<entity::conversion_event::Model> for ConversionResultDto {
    fn from(model: entity::conversion_event::Model) -> Self {
        Self {
            id: model.id,
            dedupe_key: model.dedupe_key,
            attribution_type: model.attribution_type,
            attribution_confidence: model.attribution_confidence,
            partner_id: model.partner_id,
            campaign_id: model.campaign_id,
            commission_amount: model.commission_amount,
            status: model.status,
            needs_review: model.needs_review,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVendorDto {
    pub name: String,
    pub contact_email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorDto {
    pub id: i32,
    pub name: String,
    pub contact_email: String,
}

impl From<entity::vendor::Model> for VendorDto {
    fn from(model: entity::vendor::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            contact_email: model.contact_email,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventTypeDto {
    pub vendor_id: i32,
    pub key: String,
    pub name: String,
    pub commissionable: bool,
    #[schema(value_type = Object, nullable)]
    pub default_rule: Option<CommissionRule>,
    pub is_terminal: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventTypeDto {
    pub id: i32,
    pub vendor_id: i32,
    pub key: String,
    pub name: String,
    pub commissionable: bool,
    pub is_terminal: bool,
}

impl From<entity::event_type::Model> for EventTypeDto {
    fn from(model: entity::event_type::Model) -> Self {
        Self {
            id: model.id,
            vendor_id: model.vendor_id,
            key: model.key,
            name: model.name,
            commissionable: model.commissionable,
            is_terminal: model.is_terminal,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOverrideDto {
    pub partner_id: i32,
    pub campaign_id: i32,
    pub event_type_id: i32,
    #[schema(value_type = Object)]
    pub rule: CommissionRule,
    #[schema(value_type = String)]
    pub valid_from: NaiveDateTime,
    #[schema(value_type = String, nullable)]
    pub valid_until: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OverrideDto {
    pub id: i32,
    pub partner_id: i32,
    pub campaign_id: i32,
    pub event_type_id: i32,
}

impl From<entity::commission_override::Model> for OverrideDto {
    fn from(model: entity::commission_override::Model) -> Self {
        Self {
            id: model.id,
            partner_id: model.partner_id,
            campaign_id: model.campaign_id,
            event_type_id: model.event_type_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePartnerDto {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PartnerStatusDto {
    #[schema(value_type = String)]
    pub status: PartnerStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartnerDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[schema(value_type = String)]
    pub status: PartnerStatus,
    #[schema(value_type = String)]
    pub tier: PartnerTier,
}

impl From<entity::partner::Model> for PartnerDto {
    fn from(model: entity::partner::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            status: model.status,
            tier: model.tier,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEnrollmentDto {
    pub campaign_id: i32,
    pub partner_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentDto {
    pub id: i32,
    pub campaign_id: i32,
    pub partner_id: i32,
    #[schema(value_type = String)]
    pub status: EnrollmentStatus,
}

impl From<entity::campaign_partner::Model> for EnrollmentDto {
    fn from(model: entity::campaign_partner::Model) -> Self {
        Self {
            id: model.id,
            campaign_id: model.campaign_id,
            partner_id: model.partner_id,
            status: model.status,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePayoutDto {
    pub partner_id: i32,
    pub payment_method: String,
    #[schema(value_type = String)]
    pub period_start: NaiveDateTime,
    #[schema(value_type = String)]
    pub period_end: NaiveDateTime,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompletePayoutDto {
    pub provider_txn_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FailPayoutDto {
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PayoutDto {
    pub id: i32,
    pub partner_id: i32,
    pub payment_method: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub currency: String,
    #[schema(value_type = String)]
    pub status: PayoutStatus,
    pub provider_txn_id: Option<String>,
    pub failure_reason: Option<String>,
}

impl From<entity::payout::Model> for PayoutDto {
    fn from(model: entity::payout::Model) -> Self {
        Self {
            id: model.id,
            partner_id: model.partner_id,
            payment_method: model.payment_method,
            amount: model.amount,
            currency: model.currency,
            status: model.status,
            provider_txn_id: model.provider_txn_id,
            failure_reason: model.failure_reason,
        }
    }
}
