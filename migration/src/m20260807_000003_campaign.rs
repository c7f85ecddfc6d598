use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260807_000001_vendor::Vendor;

static IDX_CAMPAIGN_VENDOR_ID: &str = "idx-campaign-vendor_id";
static FK_CAMPAIGN_VENDOR_ID: &str = "fk-campaign-vendor_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaign::Table)
                    .if_not_exists()
                    .col(pk_auto(Campaign::Id))
                    .col(integer(Campaign::VendorId))
                    .col(string(Campaign::Name))
                    .col(integer(Campaign::Version))
                    .col(text(Campaign::DestinationUrl))
                    .col(json_binary(Campaign::CommissionRule))
                    .col(string(Campaign::AttributionPolicy))
                    .col(integer(Campaign::CookieDurationDays))
                    .col(boolean(Campaign::ApprovalRequired))
                    .col(boolean(Campaign::IsPublic))
                    .col(string(Campaign::Status))
                    .col(timestamp(Campaign::CreatedAt))
                    .col(timestamp(Campaign::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CAMPAIGN_VENDOR_ID)
                    .table(Campaign::Table)
                    .col(Campaign::VendorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CAMPAIGN_VENDOR_ID)
                    .from_tbl(Campaign::Table)
                    .from_col(Campaign::VendorId)
                    .to_tbl(Vendor::Table)
                    .to_col(Vendor::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Campaign::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Campaign {
    Table,
    Id,
    VendorId,
    Name,
    Version,
    DestinationUrl,
    CommissionRule,
    AttributionPolicy,
    CookieDurationDays,
    ApprovalRequired,
    IsPublic,
    Status,
    CreatedAt,
    UpdatedAt,
}
