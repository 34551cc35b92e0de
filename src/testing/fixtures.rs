//! # 测试数据 Fixtures

use chrono::{DateTime, Utc};
use entity::{customers, domain_ssl_settings, domain_to_ip, domains, ips_and_ports};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::acme::{CertificateRequest, SslRedirect};

/// 租户 fixture
#[derive(Debug, Clone)]
pub struct CustomerFixture {
    /// 登录名
    pub loginname: String,
    /// 是否已停用
    pub deactivated: bool,
}

impl CustomerFixture {
    /// 创建新的租户 fixture
    pub fn new(loginname: &str) -> Self {
        Self {
            loginname: loginname.to_string(),
            deactivated: false,
        }
    }

    /// 设置为停用
    pub fn deactivated(mut self) -> Self {
        self.deactivated = true;
        self
    }

    /// 转换为 ActiveModel
    pub fn to_active_model(self) -> customers::ActiveModel {
        customers::ActiveModel {
            loginname: Set(self.loginname),
            deactivated: Set(self.deactivated),
            ..Default::default()
        }
    }

    /// 写入数据库
    pub async fn insert(self, db: &DatabaseConnection) -> customers::Model {
        self.to_active_model().insert(db).await.expect("插入租户失败")
    }
}

/// 域名 fixture，默认启用自动化、非通配符、无别名
#[derive(Debug, Clone)]
pub struct DomainFixture {
    /// 所属租户 ID
    pub customer_id: i32,
    /// 域名
    pub domain: String,
    /// 是否附带 `www.` 别名
    pub www_server_alias: bool,
    /// 是否启用证书自动化
    pub letsencrypt: bool,
    /// 是否为通配符域名
    pub is_wildcard_domain: bool,
    /// 别名指向的父域名 ID
    pub alias_domain: Option<i32>,
    /// 重定向标记
    pub ssl_redirect: i32,
}

impl DomainFixture {
    /// 创建新的域名 fixture
    pub fn new(customer_id: i32, domain: &str) -> Self {
        Self {
            customer_id,
            domain: domain.to_string(),
            www_server_alias: false,
            letsencrypt: true,
            is_wildcard_domain: false,
            alias_domain: None,
            ssl_redirect: 0,
        }
    }

    /// 附带 `www.` 别名
    pub fn www(mut self) -> Self {
        self.www_server_alias = true;
        self
    }

    /// 设置自动化开关
    pub fn automation(mut self, enabled: bool) -> Self {
        self.letsencrypt = enabled;
        self
    }

    /// 通配符域名
    pub fn wildcard(mut self) -> Self {
        self.is_wildcard_domain = true;
        self
    }

    /// 作为另一个域名的别名
    pub fn alias_of(mut self, parent_id: i32) -> Self {
        self.alias_domain = Some(parent_id);
        self
    }

    /// 跳转策略
    pub fn redirect(mut self, code: i32) -> Self {
        self.ssl_redirect = code;
        self
    }

    /// 转换为 ActiveModel
    pub fn to_active_model(self) -> domains::ActiveModel {
        domains::ActiveModel {
            customer_id: Set(self.customer_id),
            document_root: Set(format!("/var/customers/webs/{}", self.domain)),
            domain: Set(self.domain),
            www_server_alias: Set(self.www_server_alias),
            letsencrypt: Set(self.letsencrypt),
            is_wildcard_domain: Set(self.is_wildcard_domain),
            alias_domain: Set(self.alias_domain),
            ssl_redirect: Set(self.ssl_redirect),
            ..Default::default()
        }
    }

    /// 写入数据库
    pub async fn insert(self, db: &DatabaseConnection) -> domains::Model {
        self.to_active_model().insert(db).await.expect("插入域名失败")
    }
}

/// 写入一个平台 IP
pub async fn insert_ip(db: &DatabaseConnection, ip: &str) -> ips_and_ports::Model {
    ips_and_ports::ActiveModel {
        ip: Set(ip.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("插入 IP 失败")
}

/// 将 IP 分配给域名
pub async fn assign_ip(db: &DatabaseConnection, domain_id: i32, ip_id: i32) {
    domain_to_ip::Entity::insert(domain_to_ip::ActiveModel {
        domain_id: Set(domain_id),
        ip_id: Set(ip_id),
    })
    .exec_without_returning(db)
    .await
    .expect("分配 IP 失败");
}

/// 写入证书记录
pub async fn insert_certificate_record(
    db: &DatabaseConnection,
    domain_id: i32,
    certificate: Option<&str>,
    expiration: Option<DateTime<Utc>>,
) -> domain_ssl_settings::Model {
    domain_ssl_settings::ActiveModel {
        domain_id: Set(domain_id),
        ssl_cert_file: Set(certificate.map(ToString::to_string)),
        ssl_key_file: Set(None),
        ssl_ca_file: Set(None),
        ssl_cert_chainfile: Set(None),
        ssl_csr_file: Set(None),
        ssl_fullchain_file: Set(None),
        expiration_date: Set(expiration),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("插入证书记录失败")
}

/// 租户 `web1` 的最简证书请求
pub fn tenant_request(domain_id: i32, domain: &str) -> CertificateRequest {
    CertificateRequest {
        login: "web1".to_string(),
        domain: domain.to_string(),
        domain_id,
        document_root: format!("/var/customers/webs/{domain}"),
        www_alias: false,
        existing_cert: None,
        ssl_redirect: SslRedirect::Off,
        expiration: None,
        record_id: None,
    }
}
