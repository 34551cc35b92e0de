//! # 域名与 IP 关联实体

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "domain_to_ip")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub domain_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub ip_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::domains::Entity",
        from = "Column::DomainId",
        to = "super::domains::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Domain,
    #[sea_orm(
        belongs_to = "super::ips_and_ports::Entity",
        from = "Column::IpId",
        to = "super::ips_and_ports::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    IpAndPort,
}

impl Related<super::domains::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Domain.def()
    }
}

impl Related<super::ips_and_ports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IpAndPort.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
