//! # DNS 预校验
//!
//! 签发前确认每个 SAN 的 A/AAAA 记录指向平台已知的 IP，避免注定失败的 ACME 请求。
//! 校验失败的 SAN 会被移除，同时永久关闭该域名的自动证书管理。

use std::collections::HashSet;
use std::net::IpAddr;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{LookupIpStrategy, ResolverConfig, ResolverOpts};
use hickory_resolver::system_conf::read_system_conf;
use indexmap::IndexSet;

use super::CertificateRequest;
use super::store::CertificateStore;
use crate::error::Result;
use crate::{ldebug, linfo, logging::{LogComponent, LogStage}, lwarn};

/// 主机名解析
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// 解析主机名的全部 A/AAAA 地址；失败时返回空列表
    async fn resolve(&self, host: &str) -> Vec<IpAddr>;
}

/// 基于系统解析配置的解析器
#[derive(Clone)]
pub struct SystemResolver {
    resolver: TokioAsyncResolver,
}

impl std::fmt::Debug for SystemResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemResolver").finish_non_exhaustive()
    }
}

impl SystemResolver {
    /// 读取系统解析配置，失败时使用默认配置
    #[must_use]
    pub fn new() -> Self {
        match read_system_conf() {
            Ok((config, opts)) => Self::with_config(config, opts),
            Err(e) => {
                lwarn!(
                    "system",
                    LogStage::Startup,
                    LogComponent::DnsValidator,
                    "system_conf",
                    "无法读取系统 DNS 配置，使用默认解析器",
                    error = %e
                );
                Self::with_config(ResolverConfig::default(), ResolverOpts::default())
            }
        }
    }

    /// 使用指定的上游配置；始终同时查询 A 与 AAAA 记录
    #[must_use]
    pub fn with_config(config: ResolverConfig, mut opts: ResolverOpts) -> Self {
        // 默认策略在存在 A 记录时不会返回 AAAA
        opts.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;
        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve(&self, host: &str) -> Vec<IpAddr> {
        match self.resolver.lookup_ip(host).await {
            Ok(lookup) => lookup.iter().collect(),
            Err(e) => {
                ldebug!(
                    "system",
                    LogStage::Issuance,
                    LogComponent::DnsValidator,
                    "lookup_failed",
                    "DNS 查询失败",
                    host = %host,
                    error = %e
                );
                Vec::new()
            }
        }
    }
}

/// DNS 校验器
#[derive(Clone, Copy)]
pub struct DnsValidator<'a> {
    store: &'a CertificateStore,
    resolver: &'a dyn HostResolver,
    enabled: bool,
}

impl<'a> DnsValidator<'a> {
    /// 创建校验器；`enabled` 为 false 时不做任何检查
    #[must_use]
    pub fn new(store: &'a CertificateStore, resolver: &'a dyn HostResolver, enabled: bool) -> Self {
        Self {
            store,
            resolver,
            enabled,
        }
    }

    /// 移除没有指向平台已知 IP 的 SAN，返回是否关闭了域名的自动化
    ///
    /// 平台管理虚拟主机没有对应的域名行，只做移除和告警。
    pub async fn validate(&self, request: &CertificateRequest, sans: &mut IndexSet<String>) -> Result<bool> {
        if !self.enabled || sans.is_empty() {
            return Ok(false);
        }

        let login = request.login.as_str();
        let known: HashSet<IpAddr> = self.store.known_ips(request.domain_id).await?.into_iter().collect();
        let mut disabled = false;

        let names: Vec<String> = sans.iter().cloned().collect();
        for name in names {
            linfo!(
                login,
                LogStage::Issuance,
                LogComponent::DnsValidator,
                "validate_dns",
                &format!("Validating DNS of {name}")
            );

            let resolved = self.resolver.resolve(&name).await;
            if resolved.iter().any(|ip| known.contains(ip)) {
                continue;
            }

            lwarn!(
                login,
                LogStage::Issuance,
                LogComponent::DnsValidator,
                "dns_mismatch",
                &format!(
                    "Skipping Let's Encrypt generation for {name} due to no system known IP address via DNS check"
                ),
                resolved = ?resolved
            );
            sans.shift_remove(&name);

            if !request.is_platform() && self.store.disable_automation(request.domain_id).await? {
                disabled = true;
                lwarn!(
                    login,
                    LogStage::Issuance,
                    LogComponent::DnsValidator,
                    "automation_disabled",
                    &format!("Let's Encrypt deactivated for domain {}", request.domain)
                );
            }
        }

        Ok(disabled)
    }
}
