//! # 运行协调
//!
//! 一次运行依次经过 `Idle → Selecting → Issuing → Renewing → Reconciling → Done`，
//! 严格串行，任何时候只有一个外部进程。单个域名失败只记录日志，批次继续。

use std::fmt;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::client::AcmeClient;
use super::command::CommandRunner;
use super::dns::{DnsValidator, HostResolver};
use super::locator::CertificateLocator;
use super::materializer::CertificateMaterializer;
use super::san::SanBuilder;
use super::selector::CandidateSelector;
use super::store::CertificateStore;
use super::CertificateRequest;
use crate::config::AppConfig;
use crate::error::{OrchestratorError, Result};
use crate::tasks::{EnqueueOutcome, TaskKind, TaskQueue};
use crate::{lerror, linfo, logging::{LogComponent, LogStage}};

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RunState {
    /// 初始状态
    Idle,
    /// 选择候选
    Selecting,
    /// 首次签发
    Issuing,
    /// 续期对账
    Renewing,
    /// 投递下游任务
    Reconciling,
    /// 完成
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Selecting => "selecting",
            Self::Issuing => "issuing",
            Self::Renewing => "renewing",
            Self::Reconciling => "reconciling",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// 运行选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// 强制落库全部续期候选
    pub force: bool,
    /// 向 acme.sh 传递 `--debug`
    pub debug: bool,
    /// 不投递下游重建任务
    pub suppress_task: bool,
}

/// 一次完整运行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// 最终状态
    pub final_state: RunState,
    /// 依次经过的状态
    pub visited: Vec<RunState>,
    /// 首次签发候选数（含平台）
    pub issue_candidates: usize,
    /// 首次签发成功数
    pub issued: usize,
    /// 续期候选数（含平台）
    pub renew_candidates: usize,
    /// 续期落库数
    pub renewed: usize,
    /// 失败的候选数
    pub failed: usize,
    /// 是否有证书或域名配置发生变化
    pub changed: bool,
    /// 下游任务投递结果
    pub task: Option<EnqueueOutcome>,
}

/// 仅检查模式的结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// 平台是否需要首次签发
    pub issue_platform: bool,
    /// 需要首次签发的租户域名数
    pub issue_domains: usize,
    /// 平台是否有待落库的续期证书
    pub renew_platform: bool,
    /// 是否有租户域名待落库续期证书
    pub renew_domains_pending: bool,
    /// 下游任务投递结果
    pub task: Option<EnqueueOutcome>,
}

impl CheckReport {
    /// 是否存在任何待处理工作
    #[must_use]
    pub const fn has_work(&self) -> bool {
        self.issue_platform || self.issue_domains > 0 || self.renew_platform || self.renew_domains_pending
    }
}

/// 状态机，只允许向前迁移
#[derive(Debug)]
struct RunMachine {
    state: RunState,
    visited: Vec<RunState>,
}

impl RunMachine {
    fn new() -> Self {
        Self {
            state: RunState::Idle,
            visited: vec![RunState::Idle],
        }
    }

    fn advance(&mut self, next: RunState) -> Result<()> {
        if next <= self.state {
            return Err(OrchestratorError::internal(format!(
                "非法的状态迁移: {} -> {next}",
                self.state
            )));
        }
        linfo!(
            "system",
            LogStage::Reconcile,
            LogComponent::Coordinator,
            "state",
            &format!("{} -> {next}", self.state)
        );
        self.state = next;
        self.visited.push(next);
        Ok(())
    }
}

/// 证书生命周期编排器
#[derive(Clone)]
pub struct Orchestrator {
    db: DatabaseConnection,
    config: AppConfig,
    runner: Arc<dyn CommandRunner>,
    resolver: Arc<dyn HostResolver>,
    tasks: Arc<dyn TaskQueue>,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// 创建编排器
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        config: AppConfig,
        runner: Arc<dyn CommandRunner>,
        resolver: Arc<dyn HostResolver>,
        tasks: Arc<dyn TaskQueue>,
    ) -> Self {
        Self {
            db,
            config,
            runner,
            resolver,
            tasks,
        }
    }

    /// 仅检查：有任何待处理工作时投递一个重建任务，由下游触发完整运行
    pub async fn check(&self) -> Result<CheckReport> {
        let store = CertificateStore::new(self.db.clone());
        let locator = CertificateLocator::new(&self.config.acme);
        let selector = CandidateSelector::new(&store, &locator, &self.config.platform);

        let mut report = CheckReport {
            issue_platform: selector.issue_platform().await?,
            issue_domains: selector.issue_domains().await?.len(),
            renew_platform: selector.renew_platform().await?.is_some(),
            renew_domains_pending: selector.renew_domains_pending().await?,
            task: None,
        };

        if report.has_work() {
            report.task = Some(self.tasks.enqueue(TaskKind::RebuildVhosts).await?);
        }

        linfo!(
            "system",
            LogStage::Selection,
            LogComponent::Coordinator,
            "check",
            if report.has_work() { "发现待处理的证书工作" } else { "没有待处理的证书工作" },
            issue_platform = report.issue_platform,
            issue_domains = report.issue_domains,
            renew_platform = report.renew_platform,
            renew_domains_pending = report.renew_domains_pending
        );
        Ok(report)
    }

    /// 完整运行
    pub async fn run(&self, options: RunOptions) -> Result<RunReport> {
        let mut machine = RunMachine::new();

        // 前置条件，失败直接中止
        let provider = self.config.acme.provider()?;
        let client = AcmeClient::new(self.runner.as_ref(), &self.config.acme, provider, options.debug);
        client.ensure_installed().await?;
        client.upgrade().await;

        let store = CertificateStore::new(self.db.clone());
        let locator = CertificateLocator::new(&self.config.acme);
        let selector = CandidateSelector::new(&store, &locator, &self.config.platform);
        let san_builder = SanBuilder::new(&store, &self.config.platform);
        let dns = DnsValidator::new(&store, self.resolver.as_ref(), self.config.platform.dns_check);
        let materializer = CertificateMaterializer::new(&store, &locator);

        machine.advance(RunState::Selecting)?;
        let mut issue_list = selector.issue_domains().await?;
        if selector.issue_platform().await? {
            issue_list.push(selector.platform_request(None));
        }

        let mut report = RunReport {
            final_state: RunState::Idle,
            visited: Vec::new(),
            issue_candidates: issue_list.len(),
            issued: 0,
            renew_candidates: 0,
            renewed: 0,
            failed: 0,
            changed: false,
            task: None,
        };

        if !issue_list.is_empty() {
            machine.advance(RunState::Issuing)?;
            linfo!(
                "system",
                LogStage::Issuance,
                LogComponent::Coordinator,
                "issue",
                &format!("Requesting {} new Let's Encrypt certificates", issue_list.len())
            );

            for request in &issue_list {
                let step = IssueStep {
                    client: &client,
                    san_builder: &san_builder,
                    dns: &dns,
                    materializer: &materializer,
                };
                match step.process(request).await? {
                    IssueResult::Issued => {
                        report.issued += 1;
                        report.changed = true;
                    }
                    IssueResult::NotIssued { automation_disabled } => {
                        report.failed += 1;
                        report.changed |= automation_disabled;
                    }
                    IssueResult::Skipped => {}
                }
            }
        }

        machine.advance(RunState::Renewing)?;
        let mut renew_list = selector.renew_domains().await?;
        if let Some(record) = selector.renew_platform().await? {
            renew_list.push(selector.platform_request(Some(&record)));
        }
        report.renew_candidates = renew_list.len();

        for request in &renew_list {
            if options.force || locator.is_filesystem_cert_newer(&request.domain, request.expiration) {
                if materializer.materialize(request, LogStage::Renewal, &[]).await?.is_changed() {
                    report.renewed += 1;
                    report.changed = true;
                } else {
                    report.failed += 1;
                }
            }
        }

        machine.advance(RunState::Reconciling)?;
        if report.changed {
            if options.suppress_task {
                linfo!(
                    "system",
                    LogStage::Reconcile,
                    LogComponent::Coordinator,
                    "task_suppressed",
                    "证书已更新，按要求不投递重建任务"
                );
            } else {
                report.task = Some(self.tasks.enqueue(TaskKind::RebuildVhosts).await?);
            }
            linfo!(
                "system",
                LogStage::Reconcile,
                LogComponent::Coordinator,
                "changed",
                "Let's Encrypt certificates have been updated"
            );
        } else {
            linfo!(
                "system",
                LogStage::Reconcile,
                LogComponent::Coordinator,
                "unchanged",
                "No new certificates or certificate updates found"
            );
        }

        machine.advance(RunState::Done)?;
        report.final_state = machine.state;
        report.visited = machine.visited;
        Ok(report)
    }
}

/// 单个首次签发候选的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IssueResult {
    /// 证书已落库
    Issued,
    /// 未得到证书
    NotIssued { automation_disabled: bool },
    /// 跳转策略禁止签发，或 DNS 校验后没有剩余 SAN
    Skipped,
}

struct IssueStep<'r, 'a> {
    client: &'r AcmeClient<'a>,
    san_builder: &'r SanBuilder<'a>,
    dns: &'r DnsValidator<'a>,
    materializer: &'r CertificateMaterializer<'a>,
}

impl IssueStep<'_, '_> {
    /// SAN 构建 → DNS 校验 → 外部调用 → 落库；存储错误向上传播
    async fn process(&self, request: &CertificateRequest) -> Result<IssueResult> {
        let login = request.login.as_str();

        let Some(mut sans) = self.san_builder.build(request).await? else {
            return Ok(IssueResult::Skipped);
        };

        let force = request.needs_force_reissue();
        let action = if force { "Re-creating" } else { "Creating" };
        linfo!(
            login,
            LogStage::Issuance,
            LogComponent::Coordinator,
            "issue",
            &format!("{action} certificate for {}", request.domain)
        );

        let automation_disabled = self.dns.validate(request, &mut sans).await?;
        if sans.is_empty() {
            return Ok(if automation_disabled {
                IssueResult::NotIssued { automation_disabled }
            } else {
                IssueResult::Skipped
            });
        }

        let output = match self.client.issue(login, &sans, force).await {
            Ok(output) => output,
            Err(e) => {
                lerror!(
                    login,
                    LogStage::ExternalProcess,
                    LogComponent::Coordinator,
                    "issue_failed",
                    &format!("Could not run acme.sh for {}", request.domain),
                    error = %e
                );
                return Ok(IssueResult::NotIssued { automation_disabled });
            }
        };

        let outcome = self
            .materializer
            .materialize(request, LogStage::Issuance, &output.lines)
            .await?;
        if outcome.is_changed() {
            Ok(IssueResult::Issued)
        } else {
            Ok(IssueResult::NotIssued { automation_disabled })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acme::{PLATFORM_DOMAIN_ID, SslRedirect};
    use crate::testing::{
        CustomerFixture, DomainFixture, FakeCommandRunner, RecordingTaskQueue, StaticResolver, assign_ip,
        create_test_db, init_test_env, insert_certificate_record, insert_ip, write_certificate_files,
    };
    use chrono::{DateTime, Duration, Utc};
    use entity::domains;
    use pretty_assertions::assert_eq;
    use sea_orm::EntityTrait;
    use tempfile::TempDir;

    struct Harness {
        tmp: TempDir,
        db: DatabaseConnection,
        config: AppConfig,
        locator: CertificateLocator,
        tasks: Arc<RecordingTaskQueue>,
    }

    impl Harness {
        async fn new(platform_enabled: bool) -> Self {
            init_test_env();
            let tmp = TempDir::new().unwrap();
            let acme_sh = tmp.path().join("acme.sh");
            std::fs::write(&acme_sh, "#!/bin/sh\n").unwrap();

            let mut config = AppConfig::default();
            config.acme.acme_sh_path = acme_sh;
            config.platform.hostname = "panel.example.com".to_string();
            config.platform.vhost_enabled = platform_enabled;

            Self {
                locator: CertificateLocator::new(&config.acme),
                db: create_test_db().await.unwrap(),
                config,
                tasks: Arc::new(RecordingTaskQueue::default()),
                tmp,
            }
        }

        fn orchestrator(&self, runner: &Arc<FakeCommandRunner>, resolver: StaticResolver) -> Orchestrator {
            Orchestrator::new(
                self.db.clone(),
                self.config.clone(),
                runner.clone(),
                Arc::new(resolver),
                self.tasks.clone(),
            )
        }

        fn issuing_runner(&self) -> Arc<FakeCommandRunner> {
            Arc::new(FakeCommandRunner::default().issues_into(self.locator.clone()))
        }
    }

    fn full() -> RunOptions {
        RunOptions {
            force: false,
            debug: false,
            suppress_task: false,
        }
    }

    #[tokio::test]
    async fn test_platform_vhost_first_issuance() {
        let h = Harness::new(true).await;
        let runner = h.issuing_runner();

        let report = h.orchestrator(&runner, StaticResolver::default()).run(full()).await.unwrap();

        assert_eq!(report.final_state, RunState::Done);
        assert_eq!(report.issue_candidates, 1);
        assert_eq!(report.issued, 1);
        assert!(report.changed);
        assert_eq!(report.task, Some(EnqueueOutcome::Enqueued));
        assert_eq!(h.tasks.enqueued(), vec![TaskKind::RebuildVhosts]);

        let record = CertificateStore::new(h.db.clone())
            .find_record(PLATFORM_DOMAIN_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            record.expiration_date,
            h.locator.filesystem_expiration("panel.example.com")
        );

        let issue_calls = runner.issue_calls();
        assert_eq!(issue_calls.len(), 1);
        assert_eq!(issue_calls[0].domains(), vec!["panel.example.com"]);
    }

    #[tokio::test]
    async fn test_platform_appended_after_tenant_domains() {
        let h = Harness::new(true).await;
        let customer = CustomerFixture::new("web1").insert(&h.db).await;
        DomainFixture::new(customer.id, "example.com").www().insert(&h.db).await;
        let runner = h.issuing_runner();

        let report = h.orchestrator(&runner, StaticResolver::default()).run(full()).await.unwrap();

        assert_eq!(report.issued, 2);
        let order: Vec<_> = runner
            .issue_calls()
            .iter()
            .map(|c| c.primary_domain().unwrap_or_default().to_string())
            .collect();
        assert_eq!(order, vec!["example.com", "panel.example.com"]);
        assert_eq!(runner.issue_calls()[0].domains(), vec!["example.com", "www.example.com"]);
        // 一次运行只投递一个任务
        assert_eq!(h.tasks.enqueued().len(), 1);
    }

    #[tokio::test]
    async fn test_issued_domain_moves_to_renew_list() {
        let h = Harness::new(false).await;
        let customer = CustomerFixture::new("web1").insert(&h.db).await;
        let domain = DomainFixture::new(customer.id, "example.com").redirect(3).insert(&h.db).await;
        insert_certificate_record(&h.db, domain.id, Some("OLD"), None).await;
        let runner = h.issuing_runner();
        let orchestrator = h.orchestrator(&runner, StaticResolver::default());

        let first = orchestrator.run(full()).await.unwrap();
        assert_eq!(first.issued, 1);
        // 已有证书但过期时间为空，强制重新签发
        assert!(runner.issue_calls()[0].args.contains(&"--force".to_string()));

        let reloaded = domains::Entity::find_by_id(domain.id).one(&h.db).await.unwrap().unwrap();
        assert_eq!(SslRedirect::from_code(reloaded.ssl_redirect), SslRedirect::Enabled);

        let second = orchestrator.run(full()).await.unwrap();
        assert_eq!(second.issue_candidates, 0);
        assert_eq!(second.renew_candidates, 1);
        assert_eq!(second.renewed, 0);
        assert!(!second.changed);
        assert_eq!(
            second.visited,
            vec![
                RunState::Idle,
                RunState::Selecting,
                RunState::Renewing,
                RunState::Reconciling,
                RunState::Done
            ]
        );
        assert_eq!(runner.issue_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_certificate_leaves_state_untouched() {
        let h = Harness::new(false).await;
        let customer = CustomerFixture::new("web1").insert(&h.db).await;
        let domain = DomainFixture::new(customer.id, "example.com").redirect(3).insert(&h.db).await;
        let runner = Arc::new(FakeCommandRunner::default().issues_empty(h.locator.clone()));

        let report = h.orchestrator(&runner, StaticResolver::default()).run(full()).await.unwrap();

        assert_eq!(report.failed, 1);
        assert!(!report.changed);
        assert_eq!(report.task, None);
        assert!(h.tasks.enqueued().is_empty());
        assert!(CertificateStore::new(h.db.clone()).find_record(domain.id).await.unwrap().is_none());
        let reloaded = domains::Entity::find_by_id(domain.id).one(&h.db).await.unwrap().unwrap();
        assert_eq!(reloaded.ssl_redirect, 3);
        assert!(reloaded.letsencrypt);
    }

    #[tokio::test]
    async fn test_dns_mismatch_disables_domain_without_calling_client() {
        let mut h = Harness::new(false).await;
        h.config.platform.dns_check = true;
        let customer = CustomerFixture::new("web1").insert(&h.db).await;
        let domain = DomainFixture::new(customer.id, "example.com").insert(&h.db).await;
        let ip = insert_ip(&h.db, "203.0.113.10").await;
        assign_ip(&h.db, domain.id, ip.id).await;
        let runner = h.issuing_runner();
        let resolver = StaticResolver::default().with("example.com", &["198.51.100.1"]);

        let report = h.orchestrator(&runner, resolver).run(full()).await.unwrap();

        assert!(runner.issue_calls().is_empty());
        let reloaded = domains::Entity::find_by_id(domain.id).one(&h.db).await.unwrap().unwrap();
        assert!(!reloaded.letsencrypt);
        assert!(report.changed);

        // 自动化已关闭，下一次运行不再是候选
        let again = h.orchestrator(&runner, StaticResolver::default()).run(full()).await.unwrap();
        assert_eq!(again.issue_candidates, 0);
    }

    #[tokio::test]
    async fn test_suppressed_redirect_is_skipped() {
        let h = Harness::new(false).await;
        let customer = CustomerFixture::new("web1").insert(&h.db).await;
        DomainFixture::new(customer.id, "example.com").redirect(2).insert(&h.db).await;
        let runner = h.issuing_runner();

        let report = h.orchestrator(&runner, StaticResolver::default()).run(full()).await.unwrap();

        assert_eq!(report.issue_candidates, 1);
        assert_eq!(report.issued, 0);
        assert_eq!(report.failed, 0);
        assert!(runner.issue_calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_client_aborts_before_candidates() {
        let mut h = Harness::new(true).await;
        h.config.acme.acme_sh_path = h.tmp.path().join("missing").join("acme.sh");
        let runner = h.issuing_runner();

        let err = h.orchestrator(&runner, StaticResolver::default()).run(full()).await.unwrap_err();

        assert!(err.is_prerequisite());
        assert!(runner.issue_calls().is_empty());
        assert!(h.tasks.enqueued().is_empty());
    }

    #[tokio::test]
    async fn test_spawn_failure_continues_batch() {
        let h = Harness::new(true).await;
        let customer = CustomerFixture::new("web1").insert(&h.db).await;
        DomainFixture::new(customer.id, "a.example.com").insert(&h.db).await;
        DomainFixture::new(customer.id, "b.example.com").insert(&h.db).await;
        let runner = Arc::new(FakeCommandRunner::default().failing_spawn());

        let report = h.orchestrator(&runner, StaticResolver::default()).run(full()).await.unwrap();

        assert_eq!(report.issue_candidates, 3);
        assert_eq!(report.failed, 3);
        assert_eq!(runner.issue_calls().len(), 3);
        assert_eq!(report.final_state, RunState::Done);
    }

    #[tokio::test]
    async fn test_renewal_materializes_newer_filesystem_certificate() {
        let h = Harness::new(false).await;
        let customer = CustomerFixture::new("web1").insert(&h.db).await;
        let renewed = DomainFixture::new(customer.id, "renewed.example.com").insert(&h.db).await;
        let stale = DomainFixture::new(customer.id, "stale.example.com").insert(&h.db).await;
        let recorded = DateTime::<Utc>::from_timestamp((Utc::now() + Duration::days(10)).timestamp(), 0).unwrap();
        insert_certificate_record(&h.db, renewed.id, Some("OLD"), Some(recorded)).await;
        insert_certificate_record(&h.db, stale.id, Some("OLD"), Some(recorded)).await;

        let new_expiry = recorded + Duration::days(80);
        write_certificate_files(
            &h.locator.resolve_working_dir("renewed.example.com", true),
            "renewed.example.com",
            new_expiry,
        );

        let runner = h.issuing_runner();
        let report = h.orchestrator(&runner, StaticResolver::default()).run(full()).await.unwrap();

        assert_eq!(report.renew_candidates, 2);
        assert_eq!(report.renewed, 1);
        assert!(report.changed);
        assert!(runner.issue_calls().is_empty());

        let store = CertificateStore::new(h.db.clone());
        assert_eq!(store.find_record(renewed.id).await.unwrap().unwrap().expiration_date, Some(new_expiry));
        assert_eq!(store.find_record(stale.id).await.unwrap().unwrap().expiration_date, Some(recorded));
    }

    #[tokio::test]
    async fn test_forced_renewal_and_suppressed_task() {
        let h = Harness::new(false).await;
        let customer = CustomerFixture::new("web1").insert(&h.db).await;
        let domain = DomainFixture::new(customer.id, "example.com").insert(&h.db).await;
        let expiry = Utc::now() + Duration::days(30);
        insert_certificate_record(&h.db, domain.id, Some("OLD"), Some(expiry + Duration::days(365))).await;
        write_certificate_files(&h.locator.resolve_working_dir("example.com", true), "example.com", expiry);

        let runner = h.issuing_runner();
        let report = h
            .orchestrator(&runner, StaticResolver::default())
            .run(RunOptions {
                force: true,
                debug: false,
                suppress_task: true,
            })
            .await
            .unwrap();

        assert_eq!(report.renewed, 1);
        assert!(report.changed);
        assert_eq!(report.task, None);
        assert!(h.tasks.enqueued().is_empty());
    }

    #[tokio::test]
    async fn test_check_enqueues_only_with_pending_work() {
        let h = Harness::new(false).await;
        let runner = h.issuing_runner();
        let orchestrator = h.orchestrator(&runner, StaticResolver::default());

        let idle = orchestrator.check().await.unwrap();
        assert!(!idle.has_work());
        assert!(h.tasks.enqueued().is_empty());

        let customer = CustomerFixture::new("web1").insert(&h.db).await;
        DomainFixture::new(customer.id, "example.com").insert(&h.db).await;

        let busy = orchestrator.check().await.unwrap();
        assert_eq!(busy.issue_domains, 1);
        assert_eq!(busy.task, Some(EnqueueOutcome::Enqueued));
        assert_eq!(h.tasks.enqueued(), vec![TaskKind::RebuildVhosts]);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_machine_moves_forward_only() {
        let mut machine = RunMachine::new();
        machine.advance(RunState::Selecting).unwrap();
        machine.advance(RunState::Renewing).unwrap();
        assert!(machine.advance(RunState::Issuing).is_err());
        assert!(machine.advance(RunState::Renewing).is_err());
        machine.advance(RunState::Reconciling).unwrap();
        machine.advance(RunState::Done).unwrap();

        assert_eq!(
            machine.visited,
            vec![
                RunState::Idle,
                RunState::Selecting,
                RunState::Renewing,
                RunState::Reconciling,
                RunState::Done
            ]
        );
    }

    #[test]
    fn test_check_report_has_work() {
        assert!(!CheckReport::default().has_work());
        assert!(CheckReport {
            renew_domains_pending: true,
            ..CheckReport::default()
        }
        .has_work());
    }
}
