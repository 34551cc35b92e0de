use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // domain_id = 0 保留给平台自身的虚拟主机，因此不加外键
        manager
            .create_table(
                Table::create()
                    .table(DomainSslSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DomainSslSettings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DomainSslSettings::DomainId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DomainSslSettings::SslCertFile).text())
                    .col(ColumnDef::new(DomainSslSettings::SslKeyFile).text())
                    .col(ColumnDef::new(DomainSslSettings::SslCaFile).text())
                    .col(ColumnDef::new(DomainSslSettings::SslCertChainfile).text())
                    .col(ColumnDef::new(DomainSslSettings::SslCsrFile).text())
                    .col(ColumnDef::new(DomainSslSettings::SslFullchainFile).text())
                    .col(ColumnDef::new(DomainSslSettings::ExpirationDate).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DomainSslSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DomainSslSettings {
    Table,
    Id,
    DomainId,
    SslCertFile,
    SslKeyFile,
    SslCaFile,
    SslCertChainfile,
    SslCsrFile,
    SslFullchainFile,
    ExpirationDate,
}
