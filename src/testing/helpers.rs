//! # 测试辅助函数
//!
//! 内存数据库与真实证书生成

use std::fs;
use std::path::Path;
use std::sync::Once;

use chrono::{DateTime, Utc};
use rcgen::{CertificateParams, KeyPair};
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use time::OffsetDateTime;
use tracing::Level;

static INIT: Once = Once::new();

/// 初始化测试日志
pub fn init_test_env() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 创建已迁移的内存数据库连接
pub async fn create_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// 生成的自签名证书
#[derive(Debug, Clone)]
pub struct MintedCertificate {
    /// PEM 证书
    pub certificate: String,
    /// PEM 私钥
    pub key: String,
}

/// 生成指定 `notAfter` 的自签名证书
pub fn mint_certificate(domain: &str, not_after: DateTime<Utc>) -> MintedCertificate {
    let mut params = CertificateParams::new(vec![domain.to_string()]).expect("证书参数无效");
    let not_after_ts = not_after.timestamp();
    params.not_before =
        OffsetDateTime::from_unix_timestamp(not_after_ts - 90 * 86_400).expect("notBefore 超出范围");
    params.not_after = OffsetDateTime::from_unix_timestamp(not_after_ts).expect("notAfter 超出范围");

    let key = KeyPair::generate().expect("生成密钥失败");
    let cert = params.self_signed(&key).expect("自签名失败");

    MintedCertificate {
        certificate: cert.pem(),
        key: key.serialize_pem(),
    }
}

/// 按 acme.sh 的布局在 `dir` 下写入一套证书文件
pub fn write_certificate_files(dir: &Path, domain: &str, not_after: DateTime<Utc>) -> MintedCertificate {
    fs::create_dir_all(dir).expect("创建证书目录失败");
    let minted = mint_certificate(domain, not_after);

    fs::write(dir.join(format!("{domain}.cer")), &minted.certificate).expect("写入证书失败");
    fs::write(dir.join(format!("{domain}.key")), &minted.key).expect("写入私钥失败");
    fs::write(dir.join("ca.cer"), &minted.certificate).expect("写入 CA 失败");
    fs::write(
        dir.join("fullchain.cer"),
        format!("{}{}", minted.certificate, minted.certificate),
    )
    .expect("写入完整链失败");
    fs::write(dir.join(format!("{domain}.csr")), "-----BEGIN CERTIFICATE REQUEST-----\n")
        .expect("写入 CSR 失败");

    minted
}
