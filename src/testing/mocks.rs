//! # 测试替身
//!
//! 外部进程、DNS 与任务队列的可控实现

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::helpers::write_certificate_files;
use crate::acme::{CertificateLocator, CommandOutput, CommandRunner, HostResolver};
use crate::error::{OrchestratorError, Result};
use crate::tasks::{EnqueueOutcome, TaskKind, TaskQueue};

/// 一次被记录的进程调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// 可执行文件
    pub program: PathBuf,
    /// 参数
    pub args: Vec<String>,
}

impl RecordedCall {
    /// 第一个 `-d` 参数
    pub fn primary_domain(&self) -> Option<&str> {
        self.args
            .windows(2)
            .find(|w| w[0] == "-d")
            .map(|w| w[1].as_str())
    }

    /// 全部 `-d` 参数
    pub fn domains(&self) -> Vec<&str> {
        self.args
            .windows(2)
            .filter(|w| w[0] == "-d")
            .map(|w| w[1].as_str())
            .collect()
    }
}

#[derive(Debug, Clone)]
enum IssueBehaviour {
    /// 不写任何文件
    Nothing,
    /// 按定位器布局写入有效证书
    Write {
        locator: CertificateLocator,
        not_after: DateTime<Utc>,
    },
    /// 写入空的叶子证书
    Empty { locator: CertificateLocator },
}

/// 模拟 acme.sh 的进程执行器
#[derive(Debug)]
pub struct FakeCommandRunner {
    calls: Mutex<Vec<RecordedCall>>,
    install_target: Option<PathBuf>,
    fail_spawn: bool,
    issue: IssueBehaviour,
}

impl Default for FakeCommandRunner {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            install_target: None,
            fail_spawn: false,
            issue: IssueBehaviour::Nothing,
        }
    }
}

impl FakeCommandRunner {
    /// 执行安装命令时创建 `path`
    pub fn installs(mut self, path: PathBuf) -> Self {
        self.install_target = Some(path);
        self
    }

    /// 每次调用都模拟启动失败
    pub fn failing_spawn(mut self) -> Self {
        self.fail_spawn = true;
        self
    }

    /// 签发时写入 90 天后过期的证书
    pub fn issues_into(self, locator: CertificateLocator) -> Self {
        self.issues_until(locator, Utc::now() + Duration::days(90))
    }

    /// 签发时写入指定过期时间的证书
    pub fn issues_until(mut self, locator: CertificateLocator, not_after: DateTime<Utc>) -> Self {
        self.issue = IssueBehaviour::Write { locator, not_after };
        self
    }

    /// 签发时只写入空的叶子证书
    pub fn issues_empty(mut self, locator: CertificateLocator) -> Self {
        self.issue = IssueBehaviour::Empty { locator };
        self
    }

    /// 全部调用记录
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("锁中毒").clone()
    }

    /// 签发调用记录
    pub fn issue_calls(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.args.iter().any(|a| a == "--issue"))
            .collect()
    }

    fn simulate_issue(&self, call: &RecordedCall) {
        let Some(domain) = call.primary_domain() else {
            return;
        };
        match &self.issue {
            IssueBehaviour::Nothing => {}
            IssueBehaviour::Write { locator, not_after } => {
                write_certificate_files(&locator.resolve_working_dir(domain, true), domain, *not_after);
            }
            IssueBehaviour::Empty { locator } => {
                let dir = locator.resolve_working_dir(domain, true);
                std::fs::create_dir_all(&dir).expect("创建证书目录失败");
                std::fs::write(dir.join(format!("{domain}.cer")), "").expect("写入证书失败");
            }
        }
    }
}

#[async_trait]
impl CommandRunner for FakeCommandRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput> {
        let call = RecordedCall {
            program: program.to_path_buf(),
            args: args.to_vec(),
        };
        self.calls.lock().expect("锁中毒").push(call.clone());

        if self.fail_spawn {
            return Err(OrchestratorError::process_with_source(
                format!("无法启动 {}", program.display()),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ));
        }

        if program == Path::new("sh") {
            if let Some(target) = &self.install_target {
                std::fs::write(target, "#!/bin/sh\n").expect("写入 acme.sh 失败");
            }
        } else if args.iter().any(|a| a == "--issue") {
            self.simulate_issue(&call);
        }

        Ok(CommandOutput {
            success: true,
            lines: vec![format!("[fake] {}", args.join(" "))],
        })
    }
}

/// 固定映射的 DNS 解析器，未配置的主机解析为空
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    records: HashMap<String, Vec<IpAddr>>,
}

impl StaticResolver {
    /// 添加主机记录
    pub fn with(mut self, host: &str, ips: &[&str]) -> Self {
        self.records.insert(
            host.to_string(),
            ips.iter().map(|ip| ip.parse().expect("无效的 IP")).collect(),
        );
        self
    }
}

#[async_trait]
impl HostResolver for StaticResolver {
    async fn resolve(&self, host: &str) -> Vec<IpAddr> {
        self.records.get(host).cloned().unwrap_or_default()
    }
}

/// 只记录投递的任务队列
#[derive(Debug, Default)]
pub struct RecordingTaskQueue {
    enqueued: Mutex<Vec<TaskKind>>,
}

impl RecordingTaskQueue {
    /// 已投递的任务
    pub fn enqueued(&self) -> Vec<TaskKind> {
        self.enqueued.lock().expect("锁中毒").clone()
    }
}

#[async_trait]
impl TaskQueue for RecordingTaskQueue {
    async fn enqueue(&self, kind: TaskKind) -> Result<EnqueueOutcome> {
        self.enqueued.lock().expect("锁中毒").push(kind);
        Ok(EnqueueOutcome::Enqueued)
    }
}
