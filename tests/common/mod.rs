//! # 集成测试公共工具
//!
//! 模拟 acme.sh 的进程执行器、空 DNS 解析器和数据填充

#![allow(dead_code)]

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use acme_orchestrator::acme::{CommandOutput, CommandRunner, HostResolver};
use acme_orchestrator::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use entity::{customers, domains};
use rcgen::{CertificateParams, KeyPair};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use time::OffsetDateTime;

/// 把签发的证书写到 `base_dir/<domain>/` 下的执行器
#[derive(Debug)]
pub struct ScriptedAcme {
    base_dir: PathBuf,
    issued: Mutex<Vec<String>>,
}

impl ScriptedAcme {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            issued: Mutex::new(Vec::new()),
        }
    }

    /// 已签发的主域名，按调用顺序
    pub fn issued(&self) -> Vec<String> {
        self.issued.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedAcme {
    async fn run(&self, _program: &Path, args: &[String]) -> Result<CommandOutput> {
        if args.iter().any(|a| a == "--issue") {
            if let Some(domain) = args.windows(2).find(|w| w[0] == "-d").map(|w| w[1].clone()) {
                write_certificate(&self.base_dir.join(&domain), &domain, Utc::now() + Duration::days(90));
                self.issued.lock().unwrap().push(domain);
            }
        }
        Ok(CommandOutput {
            success: true,
            lines: vec!["Cert success.".to_string()],
        })
    }
}

/// 所有主机都解析为空
#[derive(Debug, Default)]
pub struct NoDns;

#[async_trait]
impl HostResolver for NoDns {
    async fn resolve(&self, _host: &str) -> Vec<IpAddr> {
        Vec::new()
    }
}

/// 写入一套自签名证书文件
pub fn write_certificate(dir: &Path, domain: &str, not_after: DateTime<Utc>) {
    let mut params = CertificateParams::new(vec![domain.to_string()]).unwrap();
    params.not_before = OffsetDateTime::from_unix_timestamp(not_after.timestamp() - 90 * 86_400).unwrap();
    params.not_after = OffsetDateTime::from_unix_timestamp(not_after.timestamp()).unwrap();
    let key = KeyPair::generate().unwrap();
    let cert = params.self_signed(&key).unwrap();

    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(format!("{domain}.cer")), cert.pem()).unwrap();
    fs::write(dir.join(format!("{domain}.key")), key.serialize_pem()).unwrap();
    fs::write(dir.join("ca.cer"), cert.pem()).unwrap();
    fs::write(dir.join("fullchain.cer"), cert.pem()).unwrap();
}

/// 写入一个租户及其一个开启自动化的域名
pub async fn seed_domain(db: &DatabaseConnection, login: &str, domain: &str, www: bool) -> domains::Model {
    let customer = customers::ActiveModel {
        loginname: Set(login.to_string()),
        deactivated: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    domains::ActiveModel {
        customer_id: Set(customer.id),
        domain: Set(domain.to_string()),
        document_root: Set(format!("/var/customers/webs/{login}/{domain}")),
        www_server_alias: Set(www),
        letsencrypt: Set(true),
        is_wildcard_domain: Set(false),
        alias_domain: Set(None),
        ssl_redirect: Set(0),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
