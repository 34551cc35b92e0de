//! # 文件系统证书定位
//!
//! 解析 acme.sh 的工作目录，检查其中的证书文件并提取过期时间。
//! 工作目录布局为 `<LE_WORKING_DIR>/<domain>[_ecc]/`。

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use x509_parser::pem::parse_x509_pem;

use crate::config::AcmeConfig;
use crate::error::{OrchestratorError, Result};
use crate::{ldebug, lerror, logging::{LogComponent, LogStage}, lwarn};

/// acme.sh 安装目录下记录工作目录的环境文件
const ENV_FILE_NAME: &str = "acme.sh.env";
const WORKING_DIR_KEY: &str = "LE_WORKING_DIR";
const ECC_SUFFIX: &str = "_ecc";

/// 一次签发产生的证书文件内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateArtifacts {
    /// 叶子证书 `<domain>.cer`
    pub certificate: Option<String>,
    /// 私钥 `<domain>.key`
    pub key: Option<String>,
    /// CA 链 `ca.cer`
    pub chain: Option<String>,
    /// 完整链 `fullchain.cer`
    pub fullchain: Option<String>,
    /// 证书签名请求 `<domain>.csr`
    pub csr: Option<String>,
}

impl CertificateArtifacts {
    /// 叶子证书是否非空
    #[must_use]
    pub fn has_certificate(&self) -> bool {
        self.certificate.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

/// 证书定位器，每次运行构建一次
#[derive(Debug, Clone)]
pub struct CertificateLocator {
    base_dir: PathBuf,
    ecc: bool,
}

impl CertificateLocator {
    /// 根据 acme.sh 路径解析工作目录基准
    #[must_use]
    pub fn new(acme: &AcmeConfig) -> Self {
        Self {
            base_dir: resolve_base_dir(&acme.acme_sh_path),
            ecc: acme.uses_ecc(),
        }
    }

    /// 工作目录基准
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 域名对应的工作目录
    #[must_use]
    pub fn resolve_working_dir(&self, domain: &str, prefer_ecc: bool) -> PathBuf {
        let mut name = domain.to_lowercase();
        if prefer_ecc && self.ecc {
            name.push_str(ECC_SUFFIX);
        }
        self.base_dir.join(name)
    }

    /// 证书所在目录：优先 ECC 目录，不存在时回退到非 ECC 目录
    #[must_use]
    pub fn certificate_dir(&self, domain: &str) -> PathBuf {
        let preferred = self.resolve_working_dir(domain, true);
        if self.ecc && !preferred.is_dir() {
            let fallback = self.resolve_working_dir(domain, false);
            if fallback.is_dir() {
                return fallback;
            }
        }
        preferred
    }

    /// 文件系统上叶子证书的过期时间；文件缺失或无法解析时返回 `None`
    #[must_use]
    pub fn filesystem_expiration(&self, domain: &str) -> Option<DateTime<Utc>> {
        let domain = domain.to_lowercase();
        let cert_file = self.certificate_dir(&domain).join(format!("{domain}.cer"));
        let pem = fs::read_to_string(&cert_file).ok()?;

        match parse_not_after(&pem) {
            Ok(not_after) => Some(not_after),
            Err(e) => {
                ldebug!(
                    "system",
                    LogStage::Selection,
                    LogComponent::Locator,
                    "parse_certificate",
                    "无法解析文件系统上的证书",
                    file = %cert_file.display(),
                    error = %e
                );
                None
            }
        }
    }

    /// 文件系统证书是否比 `reference` 更新（`None` 视为纪元时间）
    #[must_use]
    pub fn is_filesystem_cert_newer(&self, domain: &str, reference: Option<DateTime<Utc>>) -> bool {
        let reference = reference.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        self.filesystem_expiration(domain)
            .is_some_and(|not_after| not_after > reference)
    }

    /// 读取域名的证书产物
    ///
    /// ECC 模式下逐个文件回退到非 ECC 目录；两个目录都不存在时返回 `None`。
    #[must_use]
    pub fn read_artifacts(&self, login: &str, domain: &str) -> Option<CertificateArtifacts> {
        let domain = domain.to_lowercase();
        let preferred = self.resolve_working_dir(&domain, true);
        let fallback = self.ecc.then(|| self.resolve_working_dir(&domain, false));

        if !preferred.is_dir() && !fallback.as_ref().is_some_and(|d| d.is_dir()) {
            lerror!(
                login,
                LogStage::Issuance,
                LogComponent::Locator,
                "certificate_dir_missing",
                &format!("Could not find certificate-folder '{}'", preferred.display())
            );
            return None;
        }

        let read = |file_name: String| -> Option<String> {
            if let Ok(content) = fs::read_to_string(preferred.join(&file_name)) {
                return Some(content);
            }
            if let Some(fallback) = &fallback {
                if let Ok(content) = fs::read_to_string(fallback.join(&file_name)) {
                    lwarn!(
                        login,
                        LogStage::Issuance,
                        LogComponent::Locator,
                        "ecc_fallback",
                        "ECC certificates activated but found only non-ecc file",
                        file = %file_name
                    );
                    return Some(content);
                }
            }
            lerror!(
                login,
                LogStage::Issuance,
                LogComponent::Locator,
                "artifact_missing",
                &format!("Could not find file '{file_name}' in '{}'", preferred.display())
            );
            None
        };

        Some(CertificateArtifacts {
            certificate: read(format!("{domain}.cer")),
            key: read(format!("{domain}.key")),
            chain: read("ca.cer".to_string()),
            fullchain: read("fullchain.cer".to_string()),
            csr: read(format!("{domain}.csr")),
        })
    }
}

/// 解析 PEM 证书的 `notAfter`
pub fn parse_not_after(pem: &str) -> Result<DateTime<Utc>> {
    let (_, pem) = parse_x509_pem(pem.as_bytes())
        .map_err(|e| OrchestratorError::certificate(format!("PEM 解析失败: {e}")))?;
    let cert = pem
        .parse_x509()
        .map_err(|e| OrchestratorError::certificate(format!("X.509 解析失败: {e}")))?;

    let timestamp = cert.validity().not_after.timestamp();
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or_else(|| OrchestratorError::certificate(format!("证书过期时间超出范围: {timestamp}")))
}

/// 从 `acme.sh.env` 读取 `LE_WORKING_DIR`，否则使用 acme.sh 所在目录
fn resolve_base_dir(acme_sh_path: &Path) -> PathBuf {
    let install_dir = acme_sh_path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    fs::read_to_string(install_dir.join(ENV_FILE_NAME))
        .ok()
        .and_then(|content| working_dir_from_env(&content))
        .unwrap_or(install_dir)
}

/// 取第一行包含 `LE_WORKING_DIR` 的内容中第一对双引号之间的文本
fn working_dir_from_env(content: &str) -> Option<PathBuf> {
    let line = content.lines().find(|line| line.contains(WORKING_DIR_KEY))?;
    let value = line.split('"').nth(1)?.trim();
    (!value.is_empty()).then(|| PathBuf::from(value))
}
