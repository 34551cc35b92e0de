//! # 域名实体定义
//!
//! 租户域名表的 Sea-ORM 实体模型。证书编排只读写其中的自动化、
//! 跳转、别名与通配符相关字段。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 域名实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "domains")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: i32,
    pub domain: String,
    pub document_root: String,
    /// 是否附带 `www.` 别名
    pub www_server_alias: bool,
    /// 是否启用自动证书管理
    pub letsencrypt: bool,
    pub is_wildcard_domain: bool,
    /// 指向父域名；非空时本域名只为父域名提供 SAN
    pub alias_domain: Option<i32>,
    /// 跳转策略：0 关闭，1 启用，2 禁止签发，3 签发后启用
    pub ssl_redirect: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Customer,
    #[sea_orm(has_one = "super::domain_ssl_settings::Entity")]
    SslSettings,
    #[sea_orm(has_many = "super::domain_to_ip::Entity")]
    DomainToIp,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::domain_ssl_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SslSettings.def()
    }
}

impl Related<super::domain_to_ip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DomainToIp.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
