use sea_orm_migration::{prelude::*, schema::*};

static IDX_FUNNEL_JOURNEY_KEY: &str = "idx-funnel_journey-cookie_id-partner_id-campaign_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FunnelJourney::Table)
                    .if_not_exists()
                    .col(pk_auto(FunnelJourney::Id))
                    .col(uuid(FunnelJourney::CookieId))
                    .col(integer(FunnelJourney::PartnerId))
                    .col(integer(FunnelJourney::CampaignId))
                    .col(timestamp(FunnelJourney::JourneyStartedAt))
                    .col(timestamp(FunnelJourney::LastEventAt))
                    .col(big_integer(FunnelJourney::TotalEvents))
                    .col(decimal_len(FunnelJourney::TotalCommission, 16, 2))
                    .col(boolean(FunnelJourney::IsConverted))
                    .col(timestamp(FunnelJourney::RecomputedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_FUNNEL_JOURNEY_KEY)
                    .table(FunnelJourney::Table)
                    .col(FunnelJourney::CookieId)
                    .col(FunnelJourney::PartnerId)
                    .col(FunnelJourney::CampaignId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FunnelJourney::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum FunnelJourney {
    Table,
    Id,
    CookieId,
    PartnerId,
    CampaignId,
    JourneyStartedAt,
    LastEventAt,
    TotalEvents,
    TotalCommission,
    IsConverted,
    RecomputedAt,
}
