//! # 证书记录实体
//!
//! 每个域名 ID 一行（0 为平台自身的管理虚拟主机），保存 PEM 内容与过期时间

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "domain_ssl_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub domain_id: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub ssl_cert_file: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ssl_key_file: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ssl_ca_file: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ssl_cert_chainfile: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ssl_csr_file: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ssl_fullchain_file: Option<String>,
    pub expiration_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::domains::Entity",
        from = "Column::DomainId",
        to = "super::domains::Column::Id"
    )]
    Domain,
}

impl Related<super::domains::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Domain.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
