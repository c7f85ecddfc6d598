//! Campaign configuration.
//!
//! Commission rules are validated here, at write time, so the calculator
//! never sees a malformed rule. Updates archive the replaced values into
//! `campaign_revision` and bump the campaign version.

use sea_orm::{ActiveValue, DatabaseConnection};

use entity::campaign::AttributionPolicy;

use crate::{
    data::campaign::{CampaignRepository, NewCampaign},
    error::Error,
    model::{
        api::{CreateCampaignDto, UpdateCampaignDto},
        commission::CommissionRule,
    },
    service::commission::tiers::validate_tiers,
};

pub struct CampaignService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CampaignService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_campaign(
        &self,
        dto: CreateCampaignDto,
    ) -> Result<entity::campaign::Model, Error> {
        validate_rule(&dto.commission_rule)?;

        let campaign_repo = CampaignRepository::new(self.db);

        let campaign = campaign_repo
            .create(NewCampaign {
                vendor_id: dto.vendor_id,
                name: dto.name,
                destination_url: dto.destination_url,
                commission_rule: dto.commission_rule.to_json(),
                attribution_policy: dto.attribution_policy.unwrap_or(AttributionPolicy::LastClick),
                cookie_duration_days: dto.cookie_duration_days,
                approval_required: dto.approval_required,
                is_public: dto.is_public,
            })
            .await?;

        Ok(campaign)
    }

    /// Applies a partial update, archiving the replaced version. Returns
    /// `None` when the campaign does not exist.
    pub async fn update_campaign(
        &self,
        campaign_id: i32,
        dto: UpdateCampaignDto,
    ) -> Result<Option<entity::campaign::Model>, Error> {
        if let Some(rule) = &dto.commission_rule {
            validate_rule(rule)?;
        }

        let campaign_repo = CampaignRepository::new(self.db);

        let Some(current) = campaign_repo.get(campaign_id).await? else {
            return Ok(None);
        };

        let mut updated: entity::campaign::ActiveModel = current.clone().into();
        if let Some(name) = dto.name {
            updated.name = ActiveValue::Set(name);
        }
        if let Some(destination_url) = dto.destination_url {
            updated.destination_url = ActiveValue::Set(destination_url);
        }
        if let Some(rule) = dto.commission_rule {
            updated.commission_rule = ActiveValue::Set(rule.to_json());
        }
        if let Some(policy) = dto.attribution_policy {
            updated.attribution_policy = ActiveValue::Set(policy);
        }
        if let Some(days) = dto.cookie_duration_days {
            updated.cookie_duration_days = ActiveValue::Set(days);
        }
        if let Some(approval_required) = dto.approval_required {
            updated.approval_required = ActiveValue::Set(approval_required);
        }
        if let Some(is_public) = dto.is_public {
            updated.is_public = ActiveValue::Set(is_public);
        }
        if let Some(status) = dto.status {
            updated.status = ActiveValue::Set(status);
        }

        let model = campaign_repo.update_with_revision(current, updated).await?;

        Ok(Some(model))
    }

    pub async fn get_campaign(
        &self,
        campaign_id: i32,
    ) -> Result<Option<entity::campaign::Model>, Error> {
        let campaign_repo = CampaignRepository::new(self.db);

        Ok(campaign_repo.get(campaign_id).await?)
    }

    pub async fn list_campaigns(
        &self,
        vendor_id: i32,
    ) -> Result<Vec<entity::campaign::Model>, Error> {
        let campaign_repo = CampaignRepository::new(self.db);

        Ok(campaign_repo.list_by_vendor(vendor_id).await?)
    }
}

/// Write-time validation of a commission rule.
pub fn validate_rule(rule: &CommissionRule) -> Result<(), Error> {
    match rule {
        CommissionRule::Flat { value } | CommissionRule::Percentage { value } => {
            if value.is_sign_negative() {
                return Err(
                    crate::error::commission::CommissionError::NegativeRate(*value).into(),
                );
            }
        }
        CommissionRule::Tiered { tiers, .. } => validate_tiers(tiers)?,
    }

    Ok(())
}
