use sea_orm_migration::{prelude::*, schema::*};

static IDX_VISITOR_COOKIE_EXPIRES_AT: &str = "idx-visitor_cookie-expires_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VisitorCookie::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(VisitorCookie::Id).uuid().not_null().primary_key())
                    .col(big_integer_null(VisitorCookie::FirstClickId))
                    .col(integer_null(VisitorCookie::FirstPartnerId))
                    .col(integer_null(VisitorCookie::FirstCampaignId))
                    .col(big_integer_null(VisitorCookie::LastClickId))
                    .col(integer_null(VisitorCookie::LastPartnerId))
                    .col(integer_null(VisitorCookie::LastCampaignId))
                    .col(timestamp_null(VisitorCookie::LastTouchAt))
                    .col(timestamp(VisitorCookie::ExpiresAt))
                    .col(timestamp(VisitorCookie::LastSeenAt))
                    .col(timestamp(VisitorCookie::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_VISITOR_COOKIE_EXPIRES_AT)
                    .table(VisitorCookie::Table)
                    .col(VisitorCookie::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VisitorCookie::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum VisitorCookie {
    Table,
    Id,
    FirstClickId,
    FirstPartnerId,
    FirstCampaignId,
    LastClickId,
    LastPartnerId,
    LastCampaignId,
    LastTouchAt,
    ExpiresAt,
    LastSeenAt,
    CreatedAt,
}
