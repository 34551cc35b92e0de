//! # Entity 模块
//!
//! 包含所有 Sea-ORM 实体定义

pub mod customers;
pub mod domain_ssl_settings;
pub mod domain_to_ip;
pub mod domains;
pub mod ips_and_ports;
pub mod tasks;

pub use customers::Entity as Customers;
pub use domain_ssl_settings::Entity as DomainSslSettings;
pub use domain_to_ip::Entity as DomainToIp;
pub use domains::Entity as Domains;
pub use ips_and_ports::Entity as IpsAndPorts;
pub use tasks::Entity as Tasks;
