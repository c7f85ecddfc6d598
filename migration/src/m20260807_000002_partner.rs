use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Partner::Table)
                    .if_not_exists()
                    .col(pk_auto(Partner::Id))
                    .col(string(Partner::Name))
                    .col(string(Partner::Email))
                    .col(string(Partner::Status))
                    .col(string(Partner::Tier))
                    .col(string_null(Partner::PaymentMethod))
                    .col(timestamp(Partner::CreatedAt))
                    .col(timestamp(Partner::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Partner::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Partner {
    Table,
    Id,
    Name,
    Email,
    Status,
    Tier,
    PaymentMethod,
    CreatedAt,
    UpdatedAt,
}
