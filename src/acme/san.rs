//! # SAN 构建
//!
//! 将一个证书请求展开为有序、去重、小写的 SAN 列表

use indexmap::IndexSet;

use super::store::CertificateStore;
use super::{CertificateRequest, SslRedirect};
use crate::config::PlatformConfig;
use crate::error::Result;
use crate::validation::validate_domain;
use crate::{linfo, logging::{LogComponent, LogStage}, lwarn};

/// SAN 构建器
#[derive(Debug, Clone, Copy)]
pub struct SanBuilder<'a> {
    store: &'a CertificateStore,
    platform: &'a PlatformConfig,
}

impl<'a> SanBuilder<'a> {
    /// 创建 SAN 构建器
    #[must_use]
    pub const fn new(store: &'a CertificateStore, platform: &'a PlatformConfig) -> Self {
        Self { store, platform }
    }

    /// 构建 SAN 列表；跳转策略为 [`SslRedirect::Suppressed`] 时返回 `None`
    pub async fn build(&self, request: &CertificateRequest) -> Result<Option<IndexSet<String>>> {
        let login = request.login.as_str();

        if request.ssl_redirect == SslRedirect::Suppressed {
            lwarn!(
                login,
                LogStage::Issuance,
                LogComponent::SanBuilder,
                "skip_suppressed",
                &format!(
                    "Skipping Let's Encrypt generation for {} due to an enabled ssl_redirect",
                    request.domain
                )
            );
            return Ok(None);
        }

        let mut sans = IndexSet::new();
        linfo!(
            login,
            LogStage::Issuance,
            LogComponent::SanBuilder,
            "add_common_name",
            &format!("Adding common-name: {}", request.domain)
        );
        sans.insert(request.domain.to_lowercase());

        if request.www_alias {
            add_san(&mut sans, login, &format!("www.{}", request.domain));
        }

        if request.is_platform() {
            for alias in self.platform.aliases.iter().map(|a| a.trim()) {
                if validate_domain(alias) {
                    add_san(&mut sans, login, alias);
                } else if !alias.is_empty() {
                    lwarn!(
                        login,
                        LogStage::Issuance,
                        LogComponent::SanBuilder,
                        "invalid_alias",
                        "忽略语法无效的平台别名",
                        alias = %alias
                    );
                }
            }
        } else {
            for alias in self.store.alias_domains(request.domain_id).await? {
                add_san(&mut sans, login, &alias.domain);
                if alias.www_server_alias {
                    add_san(&mut sans, login, &format!("www.{}", alias.domain));
                }
            }
        }

        Ok(Some(sans))
    }
}

fn add_san(sans: &mut IndexSet<String>, login: &str, name: &str) {
    let name = name.to_lowercase();
    if sans.insert(name.clone()) {
        linfo!(
            login,
            LogStage::Issuance,
            LogComponent::SanBuilder,
            "add_san",
            &format!("Adding SAN entry: {name}")
        );
    }
}
