//! # 候选选择
//!
//! 每次运行重新查询，构建"首次签发"与"续期检查"两个互不相交的列表。
//! 选择阶段不考虑跳转策略，是否跳过由 SAN 构建阶段决定。

use chrono::Utc;
use entity::domain_ssl_settings;

use super::locator::CertificateLocator;
use super::store::{CandidateRow, CertificateStore, ExpirationFilter};
use super::{CertificateRequest, PLATFORM_DOMAIN_ID, PLATFORM_LOGIN, SslRedirect};
use crate::config::PlatformConfig;
use crate::error::Result;
use crate::{ldebug, logging::{LogComponent, LogStage}};

impl From<CandidateRow> for CertificateRequest {
    fn from(row: CandidateRow) -> Self {
        Self {
            login: row.loginname,
            domain: row.domain,
            domain_id: row.domain_id,
            document_root: row.document_root,
            www_alias: row.www_server_alias,
            existing_cert: row.ssl_cert_file,
            ssl_redirect: SslRedirect::from_code(row.ssl_redirect),
            expiration: row.expiration_date,
            record_id: row.record_id,
        }
    }
}

/// 候选选择器
#[derive(Debug, Clone, Copy)]
pub struct CandidateSelector<'a> {
    store: &'a CertificateStore,
    locator: &'a CertificateLocator,
    platform: &'a PlatformConfig,
}

impl<'a> CandidateSelector<'a> {
    /// 创建选择器
    #[must_use]
    pub const fn new(
        store: &'a CertificateStore,
        locator: &'a CertificateLocator,
        platform: &'a PlatformConfig,
    ) -> Self {
        Self {
            store,
            locator,
            platform,
        }
    }

    /// 平台管理虚拟主机是否需要首次签发
    pub async fn issue_platform(&self) -> Result<bool> {
        if !self.platform.vhost_enabled {
            return Ok(false);
        }
        if self.store.find_record(PLATFORM_DOMAIN_ID).await?.is_some() {
            return Ok(false);
        }
        // acme.sh 可能已经持有有效证书，此时交给续期流程
        Ok(!self
            .locator
            .is_filesystem_cert_newer(&self.platform.hostname, Some(Utc::now())))
    }

    /// 需要首次签发的租户域名，按域名 ID 排序
    pub async fn issue_domains(&self) -> Result<Vec<CertificateRequest>> {
        let requests: Vec<CertificateRequest> = self
            .store
            .candidate_rows(ExpirationFilter::Missing)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        ldebug!(
            "system",
            LogStage::Selection,
            LogComponent::Selector,
            "issue_domains",
            "首次签发候选",
            count = requests.len()
        );
        Ok(requests)
    }

    /// 平台证书记录存在且文件系统证书更新时返回该记录
    pub async fn renew_platform(&self) -> Result<Option<domain_ssl_settings::Model>> {
        if !self.platform.vhost_enabled {
            return Ok(None);
        }
        let Some(record) = self.store.find_record(PLATFORM_DOMAIN_ID).await? else {
            return Ok(None);
        };

        Ok(self
            .locator
            .is_filesystem_cert_newer(&self.platform.hostname, record.expiration_date)
            .then_some(record))
    }

    /// 已有过期时间、需要续期检查的租户域名
    pub async fn renew_domains(&self) -> Result<Vec<CertificateRequest>> {
        let requests: Vec<CertificateRequest> = self
            .store
            .candidate_rows(ExpirationFilter::Present)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        ldebug!(
            "system",
            LogStage::Selection,
            LogComponent::Selector,
            "renew_domains",
            "续期检查候选",
            count = requests.len()
        );
        Ok(requests)
    }

    /// 是否有任一续期候选的文件系统证书比记录更新
    pub async fn renew_domains_pending(&self) -> Result<bool> {
        Ok(self
            .renew_domains()
            .await?
            .iter()
            .any(|req| self.locator.is_filesystem_cert_newer(&req.domain, req.expiration)))
    }

    /// 构建平台管理虚拟主机的请求
    #[must_use]
    pub fn platform_request(
        &self,
        record: Option<&domain_ssl_settings::Model>,
    ) -> CertificateRequest {
        CertificateRequest {
            login: PLATFORM_LOGIN.to_string(),
            domain: self.platform.hostname.clone(),
            domain_id: PLATFORM_DOMAIN_ID,
            document_root: self.platform.install_dir.clone(),
            www_alias: false,
            existing_cert: record.and_then(|r| r.ssl_cert_file.clone()),
            ssl_redirect: SslRedirect::from_code(self.platform.vhost_redirect),
            expiration: record.and_then(|r| r.expiration_date),
            record_id: record.map(|r| r.id),
        }
    }
}
