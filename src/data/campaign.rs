use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

use entity::campaign::{AttributionPolicy, CampaignStatus};

pub struct NewCampaign {
    pub vendor_id: i32,
    pub name: String,
    pub destination_url: String,
    pub commission_rule: sea_orm::JsonValue,
    pub attribution_policy: AttributionPolicy,
    pub cookie_duration_days: i32,
    pub approval_required: bool,
    pub is_public: bool,
}

pub struct CampaignRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CampaignRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a campaign at version 1 in `draft` status.
    pub async fn create(&self, new: NewCampaign) -> Result<entity::campaign::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let campaign = entity::campaign::ActiveModel {
            vendor_id: ActiveValue::Set(new.vendor_id),
            name: ActiveValue::Set(new.name),
            version: ActiveValue::Set(1),
            destination_url: ActiveValue::Set(new.destination_url),
            commission_rule: ActiveValue::Set(new.commission_rule),
            attribution_policy: ActiveValue::Set(new.attribution_policy),
            cookie_duration_days: ActiveValue::Set(new.cookie_duration_days),
            approval_required: ActiveValue::Set(new.approval_required),
            is_public: ActiveValue::Set(new.is_public),
            status: ActiveValue::Set(CampaignStatus::Draft),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        campaign.insert(self.db).await
    }

    pub async fn get(&self, campaign_id: i32) -> Result<Option<entity::campaign::Model>, DbErr> {
        entity::prelude::Campaign::find_by_id(campaign_id).one(self.db).await
    }

    pub async fn list_by_vendor(
        &self,
        vendor_id: i32,
    ) -> Result<Vec<entity::campaign::Model>, DbErr> {
        entity::prelude::Campaign::find()
            .filter(entity::campaign::Column::VendorId.eq(vendor_id))
            .order_by_asc(entity::campaign::Column::Id)
            .all(self.db)
            .await
    }

    /// Applies an updated campaign model, archiving the replaced values as a
    /// `campaign_revision` row and bumping the version. Archive and update
    /// commit together or not at all.
    pub async fn update_with_revision(
        &self,
        current: entity::campaign::Model,
        updated: entity::campaign::ActiveModel,
    ) -> Result<entity::campaign::Model, DbErr> {
        let txn = self.db.begin().await?;

        let revision = entity::campaign_revision::ActiveModel {
            campaign_id: ActiveValue::Set(current.id),
            version: ActiveValue::Set(current.version),
            name: ActiveValue::Set(current.name),
            destination_url: ActiveValue::Set(current.destination_url),
            commission_rule: ActiveValue::Set(current.commission_rule),
            attribution_policy: ActiveValue::Set(current.attribution_policy),
            cookie_duration_days: ActiveValue::Set(current.cookie_duration_days),
            approval_required: ActiveValue::Set(current.approval_required),
            is_public: ActiveValue::Set(current.is_public),
            status: ActiveValue::Set(current.status),
            archived_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        revision.insert(&txn).await?;

        let mut updated = updated;
        updated.id = ActiveValue::Unchanged(current.id);
        updated.version = ActiveValue::Set(current.version + 1);
        updated.updated_at = ActiveValue::Set(Utc::now().naive_utc());
        let model = updated.update(&txn).await?;

        txn.commit().await?;

        Ok(model)
    }

    pub async fn list_revisions(
        &self,
        campaign_id: i32,
    ) -> Result<Vec<entity::campaign_revision::Model>, DbErr> {
        entity::prelude::CampaignRevision::find()
            .filter(entity::campaign_revision::Column::CampaignId.eq(campaign_id))
            .order_by_asc(entity::campaign_revision::Column::Version)
            .all(self.db)
            .await
    }
}
