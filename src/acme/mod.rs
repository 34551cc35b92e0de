//! # 证书生命周期编排模块
//!
//! 驱动外部 acme.sh 客户端为租户域名及平台管理虚拟主机签发、续期证书：
//!
//! - [`selector`] 决定本次运行需要首次签发与续期检查的候选
//! - [`san`] 与 [`dns`] 构建 SAN 列表并做 DNS 预校验
//! - [`command`] 与 [`client`] 构建并执行外部客户端命令
//! - [`materializer`] 读取产物、解析过期时间并落库
//! - [`coordinator`] 串联以上阶段并在有变更时投递重建任务

pub mod client;
pub mod command;
pub mod coordinator;
pub mod dns;
pub mod locator;
pub mod materializer;
pub mod provider;
pub mod san;
pub mod selector;
pub mod store;

pub use client::AcmeClient;
pub use command::{AcmeArg, AcmeCommand, CommandOutput, CommandRunner, SystemCommandRunner};
pub use coordinator::{CheckReport, Orchestrator, RunOptions, RunReport, RunState};
pub use dns::{DnsValidator, HostResolver, SystemResolver};
pub use locator::{CertificateArtifacts, CertificateLocator};
pub use materializer::{CertificateMaterializer, MaterializeOutcome};
pub use provider::AcmeProvider;
pub use san::SanBuilder;
pub use selector::CandidateSelector;
pub use store::CertificateStore;

use chrono::{DateTime, Utc};

/// 平台管理虚拟主机使用的域名 ID
pub const PLATFORM_DOMAIN_ID: i32 = 0;

/// 平台管理虚拟主机在日志中使用的登录名
pub const PLATFORM_LOGIN: &str = "platform.panel";

/// 域名的 HTTPS 跳转策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SslRedirect {
    /// 不跳转
    #[default]
    Off,
    /// 已启用跳转
    Enabled,
    /// 跳转配置损坏，不签发证书
    Suppressed,
    /// 证书签发成功后启用跳转
    EnableOnIssue,
}

impl SslRedirect {
    /// 由持久化值解析，未知值视为关闭
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Enabled,
            2 => Self::Suppressed,
            3 => Self::EnableOnIssue,
            _ => Self::Off,
        }
    }

    /// 持久化值
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Off => 0,
            Self::Enabled => 1,
            Self::Suppressed => 2,
            Self::EnableOnIssue => 3,
        }
    }
}

/// 一次运行内的单个证书请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    /// 租户登录名（平台为 [`PLATFORM_LOGIN`]）
    pub login: String,
    /// 主域名
    pub domain: String,
    /// 域名 ID，0 为平台管理虚拟主机
    pub domain_id: i32,
    /// 文档根目录
    pub document_root: String,
    /// 是否附带 `www.` 别名
    pub www_alias: bool,
    /// 已有证书内容
    pub existing_cert: Option<String>,
    /// 跳转策略
    pub ssl_redirect: SslRedirect,
    /// 已记录的过期时间
    pub expiration: Option<DateTime<Utc>>,
    /// 已有证书记录 ID
    pub record_id: Option<i32>,
}

impl CertificateRequest {
    /// 是否为平台管理虚拟主机
    #[must_use]
    pub const fn is_platform(&self) -> bool {
        self.domain_id == PLATFORM_DOMAIN_ID
    }

    /// 已有证书但过期时间被清空（例如 SAN 发生变化）时需要强制重新签发
    #[must_use]
    pub fn needs_force_reissue(&self) -> bool {
        self.existing_cert.as_deref().is_some_and(|c| !c.trim().is_empty()) && self.expiration.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CertificateRequest {
        CertificateRequest {
            login: "web1".to_string(),
            domain: "example.com".to_string(),
            domain_id: 7,
            document_root: "/var/customers/webs/web1".to_string(),
            www_alias: true,
            existing_cert: None,
            ssl_redirect: SslRedirect::Off,
            expiration: None,
            record_id: None,
        }
    }

    #[test]
    fn test_ssl_redirect_codes() {
        for code in 0..=3 {
            assert_eq!(SslRedirect::from_code(code).code(), code);
        }
        assert_eq!(SslRedirect::from_code(42), SslRedirect::Off);
        assert_eq!(SslRedirect::from_code(-1), SslRedirect::Off);
    }

    #[test]
    fn test_force_reissue_requires_content_and_null_expiration() {
        let mut req = request();
        assert!(!req.needs_force_reissue());

        req.existing_cert = Some("   ".to_string());
        assert!(!req.needs_force_reissue());

        req.existing_cert = Some("-----BEGIN CERTIFICATE-----".to_string());
        assert!(req.needs_force_reissue());

        req.expiration = Some(Utc::now());
        assert!(!req.needs_force_reissue());
    }

    #[test]
    fn test_is_platform() {
        let mut req = request();
        assert!(!req.is_platform());
        req.domain_id = PLATFORM_DOMAIN_ID;
        assert!(req.is_platform());
    }
}
