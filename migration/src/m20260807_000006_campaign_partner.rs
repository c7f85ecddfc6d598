use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20260807_000002_partner::Partner, m20260807_000003_campaign::Campaign};

static IDX_CAMPAIGN_PARTNER_UNIQUE: &str = "idx-campaign_partner-campaign_id-partner_id";
static FK_CAMPAIGN_PARTNER_CAMPAIGN_ID: &str = "fk-campaign_partner-campaign_id";
static FK_CAMPAIGN_PARTNER_PARTNER_ID: &str = "fk-campaign_partner-partner_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CampaignPartner::Table)
                    .if_not_exists()
                    .col(pk_auto(CampaignPartner::Id))
                    .col(integer(CampaignPartner::CampaignId))
                    .col(integer(CampaignPartner::PartnerId))
                    .col(string(CampaignPartner::Status))
                    .col(big_integer(CampaignPartner::TotalClicks))
                    .col(big_integer(CampaignPartner::TotalConversions))
                    .col(decimal_len(CampaignPartner::TotalRevenue, 16, 2))
                    .col(decimal_len(CampaignPartner::TotalCommission, 16, 2))
                    .col(timestamp_null(CampaignPartner::LastClickAt))
                    .col(timestamp(CampaignPartner::CreatedAt))
                    .col(timestamp(CampaignPartner::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CAMPAIGN_PARTNER_UNIQUE)
                    .table(CampaignPartner::Table)
                    .col(CampaignPartner::CampaignId)
                    .col(CampaignPartner::PartnerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CAMPAIGN_PARTNER_CAMPAIGN_ID)
                    .from_tbl(CampaignPartner::Table)
                    .from_col(CampaignPartner::CampaignId)
                    .to_tbl(Campaign::Table)
                    .to_col(Campaign::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CAMPAIGN_PARTNER_PARTNER_ID)
                    .from_tbl(CampaignPartner::Table)
                    .from_col(CampaignPartner::PartnerId)
                    .to_tbl(Partner::Table)
                    .to_col(Partner::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CampaignPartner::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum CampaignPartner {
    Table,
    Id,
    CampaignId,
    PartnerId,
    Status,
    TotalClicks,
    TotalConversions,
    TotalRevenue,
    TotalCommission,
    LastClickAt,
    CreatedAt,
    UpdatedAt,
}
