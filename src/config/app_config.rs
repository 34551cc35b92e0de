//! # 应用配置结构定义

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::acme::provider::AcmeProvider;

/// 应用主配置结构
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// 数据库配置
    pub database: super::DatabaseConfig,
    /// 外部 ACME 客户端配置
    #[serde(default)]
    pub acme: AcmeConfig,
    /// 平台自身设置
    #[serde(default)]
    pub platform: PlatformConfig,
}

/// acme.sh 相关配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcmeConfig {
    /// acme.sh 可执行文件路径
    pub acme_sh_path: PathBuf,
    /// CA 提供方（见 [`AcmeProvider`]）
    pub provider: String,
    /// HTTP-01 challenge 的 webroot
    pub challenge_path: PathBuf,
    /// ECC 曲线长度，0 表示使用 RSA
    pub ecc_key_size: u32,
    /// RSA 密钥长度
    pub rsa_key_size: u32,
    /// 续期时是否复用旧私钥
    pub reuse_private_key: bool,
    /// acme.sh 缺失时执行的安装命令（经 `sh -c` 执行）
    pub install_command: String,
}

impl Default for AcmeConfig {
    fn default() -> Self {
        Self {
            acme_sh_path: PathBuf::from("/root/.acme.sh/acme.sh"),
            provider: "letsencrypt".to_string(),
            challenge_path: PathBuf::from("/var/www/html/acme"),
            ecc_key_size: 0,
            rsa_key_size: 4096,
            reuse_private_key: false,
            install_command: "wget -O - https://get.acme.sh | sh".to_string(),
        }
    }
}

impl AcmeConfig {
    /// 是否使用 ECC 密钥
    #[must_use]
    pub const fn uses_ecc(&self) -> bool {
        self.ecc_key_size > 0
    }

    /// 解析配置的 CA 提供方
    pub fn provider(&self) -> crate::error::Result<AcmeProvider> {
        self.provider.parse()
    }
}

/// 平台管理虚拟主机及全局开关
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// 平台主机名
    pub hostname: String,
    /// 平台安装目录（管理虚拟主机的文档根）
    pub install_dir: String,
    /// 是否为平台自身申请证书
    pub vhost_enabled: bool,
    /// 平台虚拟主机的跳转策略
    pub vhost_redirect: i32,
    /// 平台虚拟主机的额外别名
    pub aliases: Vec<String>,
    /// 是否在签发前校验 DNS
    pub dns_check: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            install_dir: "/var/www/panel".to_string(),
            vhost_enabled: false,
            vhost_redirect: 0,
            aliases: Vec::new(),
            dns_check: false,
        }
    }
}

impl AppConfig {
    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }

        if self.acme.acme_sh_path.as_os_str().is_empty() {
            return Err("acme.acme_sh_path cannot be empty".to_string());
        }
        if self.acme.challenge_path.as_os_str().is_empty() {
            return Err("acme.challenge_path cannot be empty".to_string());
        }
        if let Err(e) = self.acme.provider() {
            return Err(e.to_string());
        }
        if !matches!(self.acme.ecc_key_size, 0 | 256 | 384) {
            return Err(format!(
                "acme.ecc_key_size must be 0, 256 or 384, got {}",
                self.acme.ecc_key_size
            ));
        }
        if self.acme.rsa_key_size < 2048 {
            return Err(format!(
                "acme.rsa_key_size must be at least 2048, got {}",
                self.acme.rsa_key_size
            ));
        }

        if self.platform.vhost_enabled && self.platform.hostname.trim().is_empty() {
            return Err("platform.hostname is required when platform.vhost_enabled = true".to_string());
        }

        Ok(())
    }
}
