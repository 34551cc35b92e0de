pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_customers_table;
mod m20240101_000002_create_domains_table;
mod m20240101_000003_create_domain_ssl_settings_table;
mod m20240101_000004_create_ips_and_ports_tables;
mod m20240101_000005_create_tasks_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_customers_table::Migration),
            Box::new(m20240101_000002_create_domains_table::Migration),
            Box::new(m20240101_000003_create_domain_ssl_settings_table::Migration),
            Box::new(m20240101_000004_create_ips_and_ports_tables::Migration),
            Box::new(m20240101_000005_create_tasks_table::Migration),
        ]
    }
}
