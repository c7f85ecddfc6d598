//! Display counter reconciliation.
//!
//! The rolling totals on campaign enrollments are maintained by best-effort
//! increments on the hot path; this job periodically recomputes them from
//! the click and conversion source-of-truth tables to bound drift.

use sea_orm::DatabaseConnection;

use crate::{
    data::{
        campaign_partner::CampaignPartnerRepository, click::ClickRepository,
        conversion::ConversionRepository,
    },
    error::Error,
};

pub struct ReconciliationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReconciliationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Recomputes the counters of every enrollment. Returns the number of
    /// enrollments reconciled.
    pub async fn reconcile_counters(&self) -> Result<u64, Error> {
        let enrollment_repo = CampaignPartnerRepository::new(self.db);
        let click_repo = ClickRepository::new(self.db);
        let conversion_repo = ConversionRepository::new(self.db);

        let enrollments = enrollment_repo.list_all().await?;
        let mut reconciled = 0;

        for enrollment in enrollments {
            let total_clicks = click_repo.count_for_enrollment(enrollment.id).await?;
            let last_click_at = click_repo
                .last_click_at_for_enrollment(enrollment.id)
                .await?;
            let (total_conversions, total_revenue, total_commission) = conversion_repo
                .totals_for_pair(enrollment.partner_id, enrollment.campaign_id)
                .await?;

            enrollment_repo
                .set_counters(
                    enrollment.id,
                    total_clicks as i64,
                    total_conversions as i64,
                    total_revenue,
                    total_commission,
                    last_click_at,
                )
                .await?;

            reconciled += 1;
        }

        tracing::info!("Reconciled display counters for {reconciled} enrollments");

        Ok(reconciled)
    }
}
