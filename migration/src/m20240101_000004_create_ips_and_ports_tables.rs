use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IpsAndPorts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IpsAndPorts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IpsAndPorts::Ip).string_len(39).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DomainToIp::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DomainToIp::DomainId).integer().not_null())
                    .col(ColumnDef::new(DomainToIp::IpId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(DomainToIp::DomainId)
                            .col(DomainToIp::IpId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_domain_to_ip_domain_id")
                            .from(DomainToIp::Table, DomainToIp::DomainId)
                            .to(Domains::Table, Domains::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_domain_to_ip_ip_id")
                            .from(DomainToIp::Table, DomainToIp::IpId)
                            .to(IpsAndPorts::Table, IpsAndPorts::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DomainToIp::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IpsAndPorts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum IpsAndPorts {
    Table,
    Id,
    Ip,
}

#[derive(DeriveIden)]
enum DomainToIp {
    Table,
    DomainId,
    IpId,
}

#[derive(DeriveIden)]
enum Domains {
    Table,
    Id,
}
