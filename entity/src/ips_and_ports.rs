//! # 平台 IP 实体
//!
//! 平台已知的 IP 地址，DNS 预校验以此为准

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ips_and_ports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub ip: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::domain_to_ip::Entity")]
    DomainToIp,
}

impl Related<super::domain_to_ip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DomainToIp.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
