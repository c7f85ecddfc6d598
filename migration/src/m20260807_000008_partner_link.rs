use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260807_000006_campaign_partner::CampaignPartner;

static FK_PARTNER_LINK_CAMPAIGN_PARTNER_ID: &str = "fk-partner_link-campaign_partner_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PartnerLink::Table)
                    .if_not_exists()
                    .col(pk_auto(PartnerLink::Id))
                    .col(string_uniq(PartnerLink::ShortCode))
                    .col(integer(PartnerLink::CampaignPartnerId))
                    .col(json_binary_null(PartnerLink::CustomParams))
                    .col(timestamp(PartnerLink::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PARTNER_LINK_CAMPAIGN_PARTNER_ID)
                    .from_tbl(PartnerLink::Table)
                    .from_col(PartnerLink::CampaignPartnerId)
                    .to_tbl(CampaignPartner::Table)
                    .to_col(CampaignPartner::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PartnerLink::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum PartnerLink {
    Table,
    Id,
    ShortCode,
    CampaignPartnerId,
    CustomParams,
    CreatedAt,
}
