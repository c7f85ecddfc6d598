//! Partner accounts and campaign enrollment.

use sea_orm::DatabaseConnection;

use entity::{campaign_partner::EnrollmentStatus, partner::PartnerStatus};

use crate::{
    data::{campaign::CampaignRepository, campaign_partner::CampaignPartnerRepository, partner::PartnerRepository},
    error::Error,
};

pub struct PartnerService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PartnerService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a partner; accounts start pending until vendor approval.
    pub async fn register_partner(
        &self,
        name: &str,
        email: &str,
    ) -> Result<entity::partner::Model, Error> {
        let partner_repo = PartnerRepository::new(self.db);

        Ok(partner_repo.create(name, email).await?)
    }

    /// Vendor approval path for partner accounts. Returns `None` when the
    /// partner does not exist.
    pub async fn set_partner_status(
        &self,
        partner_id: i32,
        status: PartnerStatus,
    ) -> Result<Option<entity::partner::Model>, Error> {
        let partner_repo = PartnerRepository::new(self.db);

        if partner_repo.set_status(partner_id, status).await? == 0 {
            return Ok(None);
        }

        Ok(partner_repo.get(partner_id).await?)
    }

    /// Enrolls a partner into a campaign. Enrollment starts pending when the
    /// campaign requires approval and approved otherwise. Returns `None`
    /// when the campaign does not exist.
    pub async fn enroll(
        &self,
        campaign_id: i32,
        partner_id: i32,
    ) -> Result<Option<entity::campaign_partner::Model>, Error> {
        let campaign_repo = CampaignRepository::new(self.db);
        let enrollment_repo = CampaignPartnerRepository::new(self.db);

        let Some(campaign) = campaign_repo.get(campaign_id).await? else {
            return Ok(None);
        };

        let status = if campaign.approval_required {
            EnrollmentStatus::Pending
        } else {
            EnrollmentStatus::Approved
        };

        let enrollment = enrollment_repo
            .create(campaign_id, partner_id, status)
            .await?;

        Ok(Some(enrollment))
    }

    /// Vendor review of a pending enrollment. Returns `None` when the
    /// enrollment does not exist.
    pub async fn review_enrollment(
        &self,
        enrollment_id: i32,
        status: EnrollmentStatus,
    ) -> Result<Option<entity::campaign_partner::Model>, Error> {
        let enrollment_repo = CampaignPartnerRepository::new(self.db);

        if enrollment_repo.set_status(enrollment_id, status).await? == 0 {
            return Ok(None);
        }

        Ok(enrollment_repo.get(enrollment_id).await?)
    }
}
