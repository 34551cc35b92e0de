//! # 外部客户端命令
//!
//! 以白名单参数枚举构建 acme.sh 的参数向量，不经过 shell。

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use indexmap::IndexSet;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use super::provider::AcmeProvider;
use crate::config::AcmeConfig;
use crate::error::{OrchestratorError, Result};
use crate::validation::validate_domain;

/// 密钥类型与长度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLength {
    /// ECC 曲线长度
    Ec(u32),
    /// RSA 密钥长度
    Rsa(u32),
}

/// 允许传给 acme.sh 的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcmeArg {
    /// `--server <url>`
    Server(String),
    /// `--issue`
    Issue,
    /// `-d <san>`
    Domain(String),
    /// `-w <webroot>`
    Webroot(PathBuf),
    /// `--keylength ec-<n>` / `--keylength <n>`
    KeyLength(KeyLength),
    /// `--always-force-new-domain-key`
    AlwaysForceNewDomainKey,
    /// `--staging`
    Staging,
    /// `--force`
    Force,
    /// `--debug`
    Debug,
    /// `--upgrade`
    Upgrade,
    /// `--auto-upgrade <0|1>`
    AutoUpgrade(bool),
    /// `--install-cronjob`
    InstallCronjob,
}

impl AcmeArg {
    fn render(&self, argv: &mut Vec<String>) {
        match self {
            Self::Server(url) => argv.extend(["--server".to_string(), url.clone()]),
            Self::Issue => argv.push("--issue".to_string()),
            Self::Domain(san) => argv.extend(["-d".to_string(), san.clone()]),
            Self::Webroot(path) => argv.extend(["-w".to_string(), path.display().to_string()]),
            Self::KeyLength(KeyLength::Ec(size)) => {
                argv.extend(["--keylength".to_string(), format!("ec-{size}")]);
            }
            Self::KeyLength(KeyLength::Rsa(size)) => {
                argv.extend(["--keylength".to_string(), size.to_string()]);
            }
            Self::AlwaysForceNewDomainKey => argv.push("--always-force-new-domain-key".to_string()),
            Self::Staging => argv.push("--staging".to_string()),
            Self::Force => argv.push("--force".to_string()),
            Self::Debug => argv.push("--debug".to_string()),
            Self::Upgrade => argv.push("--upgrade".to_string()),
            Self::AutoUpgrade(on) => {
                argv.extend(["--auto-upgrade".to_string(), String::from(if *on { "1" } else { "0" })]);
            }
            Self::InstallCronjob => argv.push("--install-cronjob".to_string()),
        }
    }
}

/// acme.sh 调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcmeCommand {
    program: PathBuf,
    args: Vec<AcmeArg>,
}

impl AcmeCommand {
    /// 创建空命令
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// 追加参数；SAN 必须通过域名校验且不能以 `-` 开头
    pub fn arg(mut self, arg: AcmeArg) -> Result<Self> {
        if let AcmeArg::Domain(san) = &arg {
            if san.starts_with('-') || !validate_domain(san) {
                return Err(crate::validation_error!("拒绝无效的 SAN: {:?}", san));
            }
        }
        self.args.push(arg);
        Ok(self)
    }

    /// 签发命令
    pub fn issue(
        config: &AcmeConfig,
        provider: AcmeProvider,
        sans: &IndexSet<String>,
        force: bool,
        debug: bool,
    ) -> Result<Self> {
        let mut cmd = Self::new(&config.acme_sh_path)
            .arg(AcmeArg::Server(provider.directory_url().to_string()))?
            .arg(AcmeArg::Issue)?;

        for san in sans {
            cmd = cmd.arg(AcmeArg::Domain(san.clone()))?;
        }

        let key_length = if config.uses_ecc() {
            KeyLength::Ec(config.ecc_key_size)
        } else {
            KeyLength::Rsa(config.rsa_key_size)
        };
        cmd = cmd
            .arg(AcmeArg::Webroot(config.challenge_path.clone()))?
            .arg(AcmeArg::KeyLength(key_length))?;

        if !config.reuse_private_key {
            cmd = cmd.arg(AcmeArg::AlwaysForceNewDomainKey)?;
        }
        if provider.is_staging() {
            cmd = cmd.arg(AcmeArg::Staging)?;
        }
        if force {
            cmd = cmd.arg(AcmeArg::Force)?;
        }
        if debug {
            cmd = cmd.arg(AcmeArg::Debug)?;
        }
        Ok(cmd)
    }

    /// 可执行文件路径
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// 已添加的参数
    #[must_use]
    pub fn args(&self) -> &[AcmeArg] {
        &self.args
    }

    /// 渲染参数向量
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() * 2);
        for arg in &self.args {
            arg.render(&mut argv);
        }
        argv
    }

    /// 使用给定的执行器运行
    pub async fn run(&self, runner: &dyn CommandRunner) -> Result<CommandOutput> {
        runner.run(&self.program, &self.argv()).await
    }
}

/// 外部进程的输出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// 退出码是否为 0
    pub success: bool,
    /// stdout 与 stderr 按输出顺序合并的全部行
    pub lines: Vec<String>,
}

impl CommandOutput {
    /// 合并为单个字符串，用于日志
    #[must_use]
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

/// 外部进程执行器
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// 执行程序并等待完成，不设超时
    async fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput>;
}

/// 使用 `tokio::process` 的执行器
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                OrchestratorError::process_with_source(format!("无法启动 {}", program.display()), e)
            })?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(OrchestratorError::internal("子进程缺少 stdout/stderr 管道"));
        };

        // 两个管道并发读取，按到达顺序合并
        let mut stdout = BufReader::new(stdout).split(b'\n');
        let mut stderr = BufReader::new(stderr).split(b'\n');
        let mut lines = Vec::new();
        let (mut stdout_open, mut stderr_open) = (true, true);

        while stdout_open || stderr_open {
            tokio::select! {
                segment = stdout.next_segment(), if stdout_open => match segment? {
                    Some(bytes) => lines.push(decode_line(&bytes)),
                    None => stdout_open = false,
                },
                segment = stderr.next_segment(), if stderr_open => match segment? {
                    Some(bytes) => lines.push(decode_line(&bytes)),
                    None => stderr_open = false,
                },
            }
        }

        let status = child.wait().await.map_err(|e| {
            OrchestratorError::process_with_source(format!("等待 {} 退出失败", program.display()), e)
        })?;

        Ok(CommandOutput {
            success: status.success(),
            lines,
        })
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let line = String::from_utf8_lossy(bytes);
    line.strip_suffix('\r').unwrap_or(&line).to_string()
}
