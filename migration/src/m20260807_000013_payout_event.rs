use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260807_000011_conversion_event::ConversionEvent, m20260807_000012_payout::Payout,
};

static IDX_PAYOUT_EVENT_CONVERSION_EVENT_ID: &str = "idx-payout_event-conversion_event_id";
static IDX_PAYOUT_EVENT_PAYOUT_ID: &str = "idx-payout_event-payout_id";
static FK_PAYOUT_EVENT_PAYOUT_ID: &str = "fk-payout_event-payout_id";
static FK_PAYOUT_EVENT_CONVERSION_EVENT_ID: &str = "fk-payout_event-conversion_event_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PayoutEvent::Table)
                    .if_not_exists()
                    .col(pk_auto(PayoutEvent::Id))
                    .col(integer(PayoutEvent::PayoutId))
                    .col(big_integer(PayoutEvent::ConversionEventId))
                    .col(decimal_len(PayoutEvent::Amount, 16, 2))
                    .col(timestamp(PayoutEvent::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Backstop for the no-double-allocation invariant: one allocation row
        // per conversion event across all payouts, ever.
        manager
            .create_index(
                Index::create()
                    .name(IDX_PAYOUT_EVENT_CONVERSION_EVENT_ID)
                    .table(PayoutEvent::Table)
                    .col(PayoutEvent::ConversionEventId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PAYOUT_EVENT_PAYOUT_ID)
                    .table(PayoutEvent::Table)
                    .col(PayoutEvent::PayoutId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PAYOUT_EVENT_PAYOUT_ID)
                    .from_tbl(PayoutEvent::Table)
                    .from_col(PayoutEvent::PayoutId)
                    .to_tbl(Payout::Table)
                    .to_col(Payout::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PAYOUT_EVENT_CONVERSION_EVENT_ID)
                    .from_tbl(PayoutEvent::Table)
                    .from_col(PayoutEvent::ConversionEventId)
                    .to_tbl(ConversionEvent::Table)
                    .to_col(ConversionEvent::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PayoutEvent::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum PayoutEvent {
    Table,
    Id,
    PayoutId,
    ConversionEventId,
    Amount,
    CreatedAt,
}
