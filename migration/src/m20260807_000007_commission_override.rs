use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260807_000002_partner::Partner, m20260807_000003_campaign::Campaign,
    m20260807_000005_event_type::EventType,
};

static IDX_COMMISSION_OVERRIDE_SCOPE: &str =
    "idx-commission_override-partner_id-campaign_id-event_type_id";
static FK_COMMISSION_OVERRIDE_PARTNER_ID: &str = "fk-commission_override-partner_id";
static FK_COMMISSION_OVERRIDE_CAMPAIGN_ID: &str = "fk-commission_override-campaign_id";
static FK_COMMISSION_OVERRIDE_EVENT_TYPE_ID: &str = "fk-commission_override-event_type_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommissionOverride::Table)
                    .if_not_exists()
                    .col(pk_auto(CommissionOverride::Id))
                    .col(integer(CommissionOverride::PartnerId))
                    .col(integer(CommissionOverride::CampaignId))
                    .col(integer(CommissionOverride::EventTypeId))
                    .col(json_binary(CommissionOverride::Rule))
                    .col(timestamp(CommissionOverride::ValidFrom))
                    .col(timestamp_null(CommissionOverride::ValidUntil))
                    .col(timestamp(CommissionOverride::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_COMMISSION_OVERRIDE_SCOPE)
                    .table(CommissionOverride::Table)
                    .col(CommissionOverride::PartnerId)
                    .col(CommissionOverride::CampaignId)
                    .col(CommissionOverride::EventTypeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_COMMISSION_OVERRIDE_PARTNER_ID)
                    .from_tbl(CommissionOverride::Table)
                    .from_col(CommissionOverride::PartnerId)
                    .to_tbl(Partner::Table)
                    .to_col(Partner::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_COMMISSION_OVERRIDE_CAMPAIGN_ID)
                    .from_tbl(CommissionOverride::Table)
                    .from_col(CommissionOverride::CampaignId)
                    .to_tbl(Campaign::Table)
                    .to_col(Campaign::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_COMMISSION_OVERRIDE_EVENT_TYPE_ID)
                    .from_tbl(CommissionOverride::Table)
                    .from_col(CommissionOverride::EventTypeId)
                    .to_tbl(EventType::Table)
                    .to_col(EventType::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommissionOverride::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum CommissionOverride {
    Table,
    Id,
    PartnerId,
    CampaignId,
    EventTypeId,
    Rule,
    ValidFrom,
    ValidUntil,
    CreatedAt,
}
