use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Domains::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Domains::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Domains::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Domains::Domain).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Domains::DocumentRoot)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Domains::WwwServerAlias)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Domains::Letsencrypt)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Domains::IsWildcardDomain)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Domains::AliasDomain).integer())
                    .col(
                        ColumnDef::new(Domains::SslRedirect)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_domains_customer_id")
                            .from(Domains::Table, Domains::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_domains_alias_domain")
                    .table(Domains::Table)
                    .col(Domains::AliasDomain)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_domains_customer_id")
                    .table(Domains::Table)
                    .col(Domains::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Domains::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Domains {
    Table,
    Id,
    CustomerId,
    Domain,
    DocumentRoot,
    WwwServerAlias,
    Letsencrypt,
    IsWildcardDomain,
    AliasDomain,
    SslRedirect,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
}
