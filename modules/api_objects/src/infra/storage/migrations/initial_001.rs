use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApiObjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApiObjects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApiObjects::Name).string().not_null())
                    .col(ColumnDef::new(ApiObjects::Data).text().null())
                    .col(
                        ColumnDef::new(ApiObjects::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ApiObjects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApiObjects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApiObjects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ApiObjects {
    Table,
    Id,
    Name,
    Data,
    Version,
    CreatedAt,
    UpdatedAt,
}
