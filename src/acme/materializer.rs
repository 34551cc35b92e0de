//! # 证书落库
//!
//! 读取外部客户端写入工作目录的产物，解析叶子证书过期时间，
//! 以域名 ID 为键写入证书记录，必要时开启 HTTPS 跳转。

use chrono::{DateTime, Utc};

use super::locator::{CertificateLocator, parse_not_after};
use super::store::CertificateStore;
use super::{CertificateRequest, SslRedirect};
use crate::error::{Context, Result};
use crate::{lerror, linfo, logging::{LogComponent, LogStage}};

/// 落库结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// 证书记录已更新
    Changed {
        /// 新证书的过期时间
        expiration: DateTime<Utc>,
    },
    /// 没有可用的证书，未做任何存储操作
    Unchanged,
}

impl MaterializeOutcome {
    /// 是否发生了变化
    #[must_use]
    pub const fn is_changed(self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// 证书落库器
#[derive(Debug, Clone, Copy)]
pub struct CertificateMaterializer<'a> {
    store: &'a CertificateStore,
    locator: &'a CertificateLocator,
}

impl<'a> CertificateMaterializer<'a> {
    /// 创建落库器
    #[must_use]
    pub const fn new(store: &'a CertificateStore, locator: &'a CertificateLocator) -> Self {
        Self { store, locator }
    }

    /// 读取并保存请求对应的证书
    ///
    /// `stage` 区分首次签发与续期，只影响日志标签；`output` 为外部客户端的输出，仅用于失败日志。
    pub async fn materialize(
        &self,
        request: &CertificateRequest,
        stage: LogStage,
        output: &[String],
    ) -> Result<MaterializeOutcome> {
        let login = request.login.as_str();
        let artifacts = self
            .locator
            .read_artifacts(login, &request.domain)
            .unwrap_or_default();

        let certificate = match artifacts.certificate.as_deref() {
            Some(pem) if artifacts.has_certificate() => pem,
            _ => {
                lerror!(
                    login,
                    stage,
                    LogComponent::Materializer,
                    "certificate_missing",
                    &format!(
                        "Could not get Let's Encrypt certificate for {}:\n{}",
                        request.domain,
                        output.join("\n")
                    )
                );
                return Ok(MaterializeOutcome::Unchanged);
            }
        };

        let expiration = match parse_not_after(certificate) {
            Ok(expiration) => expiration,
            Err(e) => {
                lerror!(
                    login,
                    stage,
                    LogComponent::Materializer,
                    "certificate_invalid",
                    &format!(
                        "Got non-successful Let's Encrypt response for {}:\n{}",
                        request.domain,
                        output.join("\n")
                    ),
                    error = %e
                );
                return Ok(MaterializeOutcome::Unchanged);
            }
        };

        self.store
            .upsert_certificate(request.domain_id, &artifacts, expiration)
            .await
            .with_context(|| format!("保存 {} 的证书记录失败", request.domain))?;

        if request.ssl_redirect == SslRedirect::EnableOnIssue && !request.is_platform() {
            self.store.enable_redirect(request.domain_id).await?;
        }

        linfo!(
            login,
            stage,
            LogComponent::Materializer,
            "certificate_updated",
            &format!("Updated Let's Encrypt certificate for {}", request.domain),
            expiration = %expiration
        );

        Ok(MaterializeOutcome::Changed { expiration })
    }
}
