//! # 证书持久化状态
//!
//! 候选查询与证书记录、域名标记的修改。所有语句都通过 sea-orm 查询构建器生成。

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use entity::{customers, domain_ssl_settings, domain_to_ip, domains, ips_and_ports};
use indexmap::IndexSet;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

use super::locator::CertificateArtifacts;
use crate::error::Result;
use crate::{ldebug, logging::{LogComponent, LogStage}};

/// 候选查询返回的一行（域名 + 所属租户 + 可能存在的证书记录）
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CandidateRow {
    /// 证书记录 ID
    pub record_id: Option<i32>,
    /// 已记录的过期时间
    pub expiration_date: Option<DateTime<Utc>>,
    /// 已有证书内容
    pub ssl_cert_file: Option<String>,
    /// 域名 ID
    pub domain_id: i32,
    /// 域名
    pub domain: String,
    /// 文档根目录
    pub document_root: String,
    /// 是否附带 `www.` 别名
    pub www_server_alias: bool,
    /// 跳转策略
    pub ssl_redirect: i32,
    /// 租户登录名
    pub loginname: String,
}

/// 作为 SAN 贡献给父域名的别名域名
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct AliasDomain {
    /// 域名
    pub domain: String,
    /// 是否附带 `www.` 别名
    pub www_server_alias: bool,
}

/// 按是否已有过期时间筛选候选
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationFilter {
    /// 无记录或过期时间为空（首次签发）
    Missing,
    /// 已有过期时间（续期检查）
    Present,
}

/// 证书状态存储，每次运行构建一次
#[derive(Debug, Clone)]
pub struct CertificateStore {
    db: DatabaseConnection,
}

impl CertificateStore {
    /// 创建存储句柄
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 底层连接
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 查询启用自动化、非别名、非通配符且租户未停用的域名
    pub async fn candidate_rows(&self, filter: ExpirationFilter) -> Result<Vec<CandidateRow>> {
        let expiration = match filter {
            ExpirationFilter::Missing => domain_ssl_settings::Column::ExpirationDate.is_null(),
            ExpirationFilter::Present => domain_ssl_settings::Column::ExpirationDate.is_not_null(),
        };

        let rows = domains::Entity::find()
            .select_only()
            .column_as(domain_ssl_settings::Column::Id, "record_id")
            .column(domain_ssl_settings::Column::ExpirationDate)
            .column(domain_ssl_settings::Column::SslCertFile)
            .column_as(domains::Column::Id, "domain_id")
            .column(domains::Column::Domain)
            .column(domains::Column::DocumentRoot)
            .column(domains::Column::WwwServerAlias)
            .column(domains::Column::SslRedirect)
            .column(customers::Column::Loginname)
            .join(JoinType::InnerJoin, domains::Relation::Customer.def())
            .join(JoinType::LeftJoin, domains::Relation::SslSettings.def())
            .filter(customers::Column::Deactivated.eq(false))
            .filter(domains::Column::Letsencrypt.eq(true))
            .filter(domains::Column::AliasDomain.is_null())
            .filter(domains::Column::IsWildcardDomain.eq(false))
            .filter(expiration)
            .order_by_asc(domains::Column::Id)
            .into_model::<CandidateRow>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// 按域名 ID 查询证书记录
    pub async fn find_record(&self, domain_id: i32) -> Result<Option<domain_ssl_settings::Model>> {
        Ok(domain_ssl_settings::Entity::find()
            .filter(domain_ssl_settings::Column::DomainId.eq(domain_id))
            .one(&self.db)
            .await?)
    }

    /// 指向 `parent_id` 且启用自动化的非通配符别名域名
    pub async fn alias_domains(&self, parent_id: i32) -> Result<Vec<AliasDomain>> {
        Ok(domains::Entity::find()
            .select_only()
            .column(domains::Column::Domain)
            .column(domains::Column::WwwServerAlias)
            .filter(domains::Column::AliasDomain.eq(parent_id))
            .filter(domains::Column::Letsencrypt.eq(true))
            .filter(domains::Column::IsWildcardDomain.eq(false))
            .order_by_asc(domains::Column::Id)
            .into_model::<AliasDomain>()
            .all(&self.db)
            .await?)
    }

    /// 平台已知的 IP；域名 ID 为 0 时返回全部 IP，否则返回分配给该域名的 IP
    pub async fn known_ips(&self, domain_id: i32) -> Result<IndexSet<IpAddr>> {
        let mut query = ips_and_ports::Entity::find()
            .select_only()
            .column(ips_and_ports::Column::Ip)
            .order_by_asc(ips_and_ports::Column::Id);

        if domain_id != super::PLATFORM_DOMAIN_ID {
            query = query
                .join(JoinType::InnerJoin, ips_and_ports::Relation::DomainToIp.def())
                .filter(domain_to_ip::Column::DomainId.eq(domain_id));
        }

        let raw: Vec<String> = query.into_tuple().all(&self.db).await?;

        Ok(raw
            .into_iter()
            .filter_map(|ip| match ip.trim().trim_matches(['[', ']']).parse::<IpAddr>() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    ldebug!(
                        "system",
                        LogStage::Issuance,
                        LogComponent::DnsValidator,
                        "skip_ip",
                        "忽略无法解析的 IP",
                        ip = %ip
                    );
                    None
                }
            })
            .collect())
    }

    /// 关闭域名的自动证书管理；仅当当前为开启状态时才写入，返回是否发生变化
    pub async fn disable_automation(&self, domain_id: i32) -> Result<bool> {
        let result = domains::Entity::update_many()
            .col_expr(domains::Column::Letsencrypt, Expr::value(false))
            .filter(domains::Column::Id.eq(domain_id))
            .filter(domains::Column::Letsencrypt.eq(true))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// 以域名 ID 为键原子地写入或替换证书记录
    pub async fn upsert_certificate(
        &self,
        domain_id: i32,
        artifacts: &CertificateArtifacts,
        expiration: DateTime<Utc>,
    ) -> Result<()> {
        let record = domain_ssl_settings::ActiveModel {
            domain_id: Set(domain_id),
            ssl_cert_file: Set(artifacts.certificate.clone()),
            ssl_key_file: Set(artifacts.key.clone()),
            ssl_ca_file: Set(artifacts.chain.clone()),
            ssl_cert_chainfile: Set(artifacts.chain.clone()),
            ssl_csr_file: Set(artifacts.csr.clone()),
            ssl_fullchain_file: Set(artifacts.fullchain.clone()),
            expiration_date: Set(Some(expiration)),
            ..Default::default()
        };

        domain_ssl_settings::Entity::insert(record)
            .on_conflict(
                OnConflict::column(domain_ssl_settings::Column::DomainId)
                    .update_columns([
                        domain_ssl_settings::Column::SslCertFile,
                        domain_ssl_settings::Column::SslKeyFile,
                        domain_ssl_settings::Column::SslCaFile,
                        domain_ssl_settings::Column::SslCertChainfile,
                        domain_ssl_settings::Column::SslCsrFile,
                        domain_ssl_settings::Column::SslFullchainFile,
                        domain_ssl_settings::Column::ExpirationDate,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    /// 将域名的跳转策略置为已启用
    pub async fn enable_redirect(&self, domain_id: i32) -> Result<()> {
        domains::Entity::update_many()
            .col_expr(
                domains::Column::SslRedirect,
                Expr::value(super::SslRedirect::Enabled.code()),
            )
            .filter(domains::Column::Id.eq(domain_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CustomerFixture, DomainFixture, assign_ip, create_test_db, insert_certificate_record, insert_ip};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_candidate_rows_split_by_expiration() {
        let db = create_test_db().await.unwrap();
        let customer = CustomerFixture::new("web1").insert(&db).await;
        DomainFixture::new(customer.id, "fresh.example.com").insert(&db).await;
        let issued = DomainFixture::new(customer.id, "issued.example.com").insert(&db).await;
        let pending = DomainFixture::new(customer.id, "pending.example.com").insert(&db).await;
        insert_certificate_record(&db, issued.id, Some("CERT"), Some(Utc::now() + Duration::days(30))).await;
        insert_certificate_record(&db, pending.id, Some("CERT"), None).await;

        let store = CertificateStore::new(db);
        let missing: Vec<_> = store
            .candidate_rows(ExpirationFilter::Missing)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.domain)
            .collect();
        let present: Vec<_> = store
            .candidate_rows(ExpirationFilter::Present)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.domain)
            .collect();

        assert_eq!(missing, vec!["fresh.example.com", "pending.example.com"]);
        assert_eq!(present, vec!["issued.example.com"]);
    }

    #[tokio::test]
    async fn test_candidate_rows_exclude_alias_wildcard_disabled_and_deactivated() {
        let db = create_test_db().await.unwrap();
        let active = CustomerFixture::new("web1").insert(&db).await;
        let inactive = CustomerFixture::new("web2").deactivated().insert(&db).await;

        let parent = DomainFixture::new(active.id, "example.com").insert(&db).await;
        DomainFixture::new(active.id, "alias.example.net").alias_of(parent.id).insert(&db).await;
        DomainFixture::new(active.id, "wild.example.com").wildcard().insert(&db).await;
        DomainFixture::new(active.id, "manual.example.com").automation(false).insert(&db).await;
        DomainFixture::new(inactive.id, "gone.example.com").insert(&db).await;

        let rows = CertificateStore::new(db)
            .candidate_rows(ExpirationFilter::Missing)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].domain, "example.com");
        assert_eq!(rows[0].loginname, "web1");
        assert_eq!(rows[0].record_id, None);
    }

    #[tokio::test]
    async fn test_present_expiration_rows_exclude_alias_and_wildcard() {
        let db = create_test_db().await.unwrap();
        let customer = CustomerFixture::new("web1").insert(&db).await;
        let parent = DomainFixture::new(customer.id, "example.com").insert(&db).await;
        let alias = DomainFixture::new(customer.id, "alias.example.net").alias_of(parent.id).insert(&db).await;
        let wild = DomainFixture::new(customer.id, "wild.example.com").wildcard().insert(&db).await;

        let expires = Utc::now() + Duration::days(30);
        for id in [parent.id, alias.id, wild.id] {
            insert_certificate_record(&db, id, Some("CERT"), Some(expires)).await;
        }

        let rows = CertificateStore::new(db)
            .candidate_rows(ExpirationFilter::Present)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].domain_id, parent.id);
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let db = create_test_db().await.unwrap();
        let store = CertificateStore::new(db);
        let first = CertificateArtifacts {
            certificate: Some("CERT1".to_string()),
            chain: Some("CA1".to_string()),
            ..CertificateArtifacts::default()
        };
        let second = CertificateArtifacts {
            certificate: Some("CERT2".to_string()),
            chain: Some("CA2".to_string()),
            ..CertificateArtifacts::default()
        };
        let expires = DateTime::<Utc>::from_timestamp(2_000_000_000, 0).unwrap();

        store.upsert_certificate(0, &first, expires).await.unwrap();
        let original = store.find_record(0).await.unwrap().unwrap();

        store.upsert_certificate(0, &second, expires).await.unwrap();
        let replaced = store.find_record(0).await.unwrap().unwrap();

        assert_eq!(original.id, replaced.id);
        assert_eq!(replaced.ssl_cert_file.as_deref(), Some("CERT2"));
        assert_eq!(replaced.ssl_ca_file.as_deref(), Some("CA2"));
        assert_eq!(replaced.ssl_cert_chainfile.as_deref(), Some("CA2"));
        assert_eq!(replaced.expiration_date, Some(expires));
        assert_eq!(domain_ssl_settings::Entity::find().all(store.connection()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_disable_automation_only_once() {
        let db = create_test_db().await.unwrap();
        let customer = CustomerFixture::new("web1").insert(&db).await;
        let domain = DomainFixture::new(customer.id, "example.com").insert(&db).await;
        let store = CertificateStore::new(db);

        assert!(store.disable_automation(domain.id).await.unwrap());
        assert!(!store.disable_automation(domain.id).await.unwrap());
        assert!(!store.disable_automation(0).await.unwrap());
    }

    #[tokio::test]
    async fn test_known_ips() {
        let db = create_test_db().await.unwrap();
        let customer = CustomerFixture::new("web1").insert(&db).await;
        let domain = DomainFixture::new(customer.id, "example.com").insert(&db).await;
        let v4 = insert_ip(&db, "203.0.113.10").await;
        insert_ip(&db, "2001:db8::1").await;
        insert_ip(&db, "not-an-ip").await;
        assign_ip(&db, domain.id, v4.id).await;

        let store = CertificateStore::new(db);
        let assigned = store.known_ips(domain.id).await.unwrap();
        let all = store.known_ips(0).await.unwrap();

        assert_eq!(assigned.into_iter().collect::<Vec<_>>(), vec!["203.0.113.10".parse::<IpAddr>().unwrap()]);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_alias_domains_and_redirect() {
        let db = create_test_db().await.unwrap();
        let customer = CustomerFixture::new("web1").insert(&db).await;
        let parent = DomainFixture::new(customer.id, "example.com").redirect(3).insert(&db).await;
        DomainFixture::new(customer.id, "example.net").alias_of(parent.id).www().insert(&db).await;
        DomainFixture::new(customer.id, "off.example.net").alias_of(parent.id).automation(false).insert(&db).await;
        DomainFixture::new(customer.id, "wild.example.net").alias_of(parent.id).wildcard().insert(&db).await;

        let store = CertificateStore::new(db.clone());
        let aliases = store.alias_domains(parent.id).await.unwrap();
        assert_eq!(
            aliases,
            vec![AliasDomain {
                domain: "example.net".to_string(),
                www_server_alias: true
            }]
        );

        store.enable_redirect(parent.id).await.unwrap();
        let reloaded = domains::Entity::find_by_id(parent.id).one(&db).await.unwrap().unwrap();
        assert_eq!(reloaded.ssl_redirect, 1);
    }
}
