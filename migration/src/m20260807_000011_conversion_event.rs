use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260807_000005_event_type::EventType, m20260807_000009_visitor_cookie::VisitorCookie,
};

static IDX_CONVERSION_EVENT_PARTNER_STATUS: &str = "idx-conversion_event-partner_id-status";
static IDX_CONVERSION_EVENT_COOKIE_ID: &str = "idx-conversion_event-cookie_id";
static FK_CONVERSION_EVENT_EVENT_TYPE_ID: &str = "fk-conversion_event-event_type_id";
static FK_CONVERSION_EVENT_COOKIE_ID: &str = "fk-conversion_event-cookie_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ConversionEvent::Table)
                    .if_not_exists()
                    .col(big_pk_auto(ConversionEvent::Id))
                    .col(string_uniq(ConversionEvent::DedupeKey))
                    .col(integer(ConversionEvent::EventTypeId))
                    .col(uuid_null(ConversionEvent::CookieId))
                    .col(big_integer_null(ConversionEvent::ClickId))
                    .col(integer_null(ConversionEvent::PartnerId))
                    .col(integer_null(ConversionEvent::CampaignId))
                    .col(string(ConversionEvent::AttributionType))
                    .col(string(ConversionEvent::AttributionConfidence))
                    .col(decimal_len_null(ConversionEvent::EventValue, 16, 2))
                    .col(string_null(ConversionEvent::CommissionType))
                    .col(decimal_len_null(ConversionEvent::CommissionValue, 16, 4))
                    .col(decimal_len_null(ConversionEvent::CommissionAmount, 16, 2))
                    .col(string(ConversionEvent::Status))
                    .col(boolean(ConversionEvent::NeedsReview))
                    .col(timestamp(ConversionEvent::OccurredAt))
                    .col(timestamp(ConversionEvent::CreatedAt))
                    .col(timestamp(ConversionEvent::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CONVERSION_EVENT_PARTNER_STATUS)
                    .table(ConversionEvent::Table)
                    .col(ConversionEvent::PartnerId)
                    .col(ConversionEvent::Status)
                    .col(ConversionEvent::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CONVERSION_EVENT_COOKIE_ID)
                    .table(ConversionEvent::Table)
                    .col(ConversionEvent::CookieId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CONVERSION_EVENT_EVENT_TYPE_ID)
                    .from_tbl(ConversionEvent::Table)
                    .from_col(ConversionEvent::EventTypeId)
                    .to_tbl(EventType::Table)
                    .to_col(EventType::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CONVERSION_EVENT_COOKIE_ID)
                    .from_tbl(ConversionEvent::Table)
                    .from_col(ConversionEvent::CookieId)
                    .to_tbl(VisitorCookie::Table)
                    .to_col(VisitorCookie::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ConversionEvent::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ConversionEvent {
    Table,
    Id,
    DedupeKey,
    EventTypeId,
    CookieId,
    ClickId,
    PartnerId,
    CampaignId,
    AttributionType,
    AttributionConfidence,
    EventValue,
    CommissionType,
    CommissionValue,
    CommissionAmount,
    Status,
    NeedsReview,
    OccurredAt,
    CreatedAt,
    UpdatedAt,
}
