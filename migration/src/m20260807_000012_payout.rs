use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260807_000002_partner::Partner;

static IDX_PAYOUT_PARTNER_ID: &str = "idx-payout-partner_id";
static FK_PAYOUT_PARTNER_ID: &str = "fk-payout-partner_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payout::Table)
                    .if_not_exists()
                    .col(pk_auto(Payout::Id))
                    .col(integer(Payout::PartnerId))
                    .col(string(Payout::PaymentMethod))
                    .col(timestamp(Payout::PeriodStart))
                    .col(timestamp(Payout::PeriodEnd))
                    .col(decimal_len(Payout::Amount, 16, 2))
                    .col(string(Payout::Currency))
                    .col(string(Payout::Status))
                    .col(string_null(Payout::ProviderTxnId))
                    .col(text_null(Payout::FailureReason))
                    .col(timestamp(Payout::CreatedAt))
                    .col(timestamp(Payout::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PAYOUT_PARTNER_ID)
                    .table(Payout::Table)
                    .col(Payout::PartnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PAYOUT_PARTNER_ID)
                    .from_tbl(Payout::Table)
                    .from_col(Payout::PartnerId)
                    .to_tbl(Partner::Table)
                    .to_col(Partner::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payout::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Payout {
    Table,
    Id,
    PartnerId,
    PaymentMethod,
    PeriodStart,
    PeriodEnd,
    Amount,
    Currency,
    Status,
    ProviderTxnId,
    FailureReason,
    CreatedAt,
    UpdatedAt,
}
