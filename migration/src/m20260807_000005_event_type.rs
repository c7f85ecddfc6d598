use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260807_000001_vendor::Vendor;

static IDX_EVENT_TYPE_VENDOR_KEY: &str = "idx-event_type-vendor_id-key";
static FK_EVENT_TYPE_VENDOR_ID: &str = "fk-event_type-vendor_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventType::Table)
                    .if_not_exists()
                    .col(pk_auto(EventType::Id))
                    .col(integer(EventType::VendorId))
                    .col(string(EventType::Key))
                    .col(string(EventType::Name))
                    .col(boolean(EventType::Commissionable))
                    .col(json_binary_null(EventType::DefaultRule))
                    .col(boolean(EventType::IsTerminal))
                    .col(timestamp(EventType::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_EVENT_TYPE_VENDOR_KEY)
                    .table(EventType::Table)
                    .col(EventType::VendorId)
                    .col(EventType::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_EVENT_TYPE_VENDOR_ID)
                    .from_tbl(EventType::Table)
                    .from_col(EventType::VendorId)
                    .to_tbl(Vendor::Table)
                    .to_col(Vendor::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventType::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum EventType {
    Table,
    Id,
    VendorId,
    Key,
    Name,
    Commissionable,
    DefaultRule,
    IsTerminal,
    CreatedAt,
}
