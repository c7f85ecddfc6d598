use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260807_000008_partner_link::PartnerLink, m20260807_000009_visitor_cookie::VisitorCookie,
};

static IDX_CLICK_PARTNER_LINK_ID: &str = "idx-click-partner_link_id";
static IDX_CLICK_COOKIE_ID: &str = "idx-click-cookie_id";
static FK_CLICK_PARTNER_LINK_ID: &str = "fk-click-partner_link_id";
static FK_CLICK_COOKIE_ID: &str = "fk-click-cookie_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Click::Table)
                    .if_not_exists()
                    .col(big_pk_auto(Click::Id))
                    .col(integer(Click::PartnerLinkId))
                    .col(uuid_null(Click::CookieId))
                    .col(timestamp(Click::OccurredAt))
                    .col(string_null(Click::UtmSource))
                    .col(string_null(Click::UtmMedium))
                    .col(string_null(Click::UtmCampaign))
                    .col(text_null(Click::Referrer))
                    .col(string_null(Click::IpAddress))
                    .col(text_null(Click::UserAgent))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CLICK_PARTNER_LINK_ID)
                    .table(Click::Table)
                    .col(Click::PartnerLinkId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CLICK_COOKIE_ID)
                    .table(Click::Table)
                    .col(Click::CookieId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CLICK_PARTNER_LINK_ID)
                    .from_tbl(Click::Table)
                    .from_col(Click::PartnerLinkId)
                    .to_tbl(PartnerLink::Table)
                    .to_col(PartnerLink::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CLICK_COOKIE_ID)
                    .from_tbl(Click::Table)
                    .from_col(Click::CookieId)
                    .to_tbl(VisitorCookie::Table)
                    .to_col(VisitorCookie::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Click::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Click {
    Table,
    Id,
    PartnerLinkId,
    CookieId,
    OccurredAt,
    UtmSource,
    UtmMedium,
    UtmCampaign,
    Referrer,
    IpAddress,
    UserAgent,
}
