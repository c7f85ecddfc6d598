use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260807_000003_campaign::Campaign;

static IDX_CAMPAIGN_REVISION_CAMPAIGN_VERSION: &str = "idx-campaign_revision-campaign_id-version";
static FK_CAMPAIGN_REVISION_CAMPAIGN_ID: &str = "fk-campaign_revision-campaign_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CampaignRevision::Table)
                    .if_not_exists()
                    .col(pk_auto(CampaignRevision::Id))
                    .col(integer(CampaignRevision::CampaignId))
                    .col(integer(CampaignRevision::Version))
                    .col(string(CampaignRevision::Name))
                    .col(text(CampaignRevision::DestinationUrl))
                    .col(json_binary(CampaignRevision::CommissionRule))
                    .col(string(CampaignRevision::AttributionPolicy))
                    .col(integer(CampaignRevision::CookieDurationDays))
                    .col(boolean(CampaignRevision::ApprovalRequired))
                    .col(boolean(CampaignRevision::IsPublic))
                    .col(string(CampaignRevision::Status))
                    .col(timestamp(CampaignRevision::ArchivedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CAMPAIGN_REVISION_CAMPAIGN_VERSION)
                    .table(CampaignRevision::Table)
                    .col(CampaignRevision::CampaignId)
                    .col(CampaignRevision::Version)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CAMPAIGN_REVISION_CAMPAIGN_ID)
                    .from_tbl(CampaignRevision::Table)
                    .from_col(CampaignRevision::CampaignId)
                    .to_tbl(Campaign::Table)
                    .to_col(Campaign::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CampaignRevision::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum CampaignRevision {
    Table,
    Id,
    CampaignId,
    Version,
    Name,
    DestinationUrl,
    CommissionRule,
    AttributionPolicy,
    CookieDurationDays,
    ApprovalRequired,
    IsPublic,
    Status,
    ArchivedAt,
}
