//! # acme.sh 客户端
//!
//! 负责安装/升级前置条件以及签发调用。输出只用于审计日志，从不解析其成败。

use std::path::Path;

use indexmap::IndexSet;

use super::command::{AcmeArg, AcmeCommand, CommandOutput, CommandRunner};
use super::provider::AcmeProvider;
use crate::config::AcmeConfig;
use crate::error::{OrchestratorError, Result};
use crate::{ldebug, lerror, linfo, logging::{LogComponent, LogStage}, lwarn};

/// acme.sh 客户端，每次运行构建一次
#[derive(Clone, Copy)]
pub struct AcmeClient<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a AcmeConfig,
    provider: AcmeProvider,
    debug: bool,
}

impl<'a> AcmeClient<'a> {
    /// 创建客户端
    #[must_use]
    pub fn new(
        runner: &'a dyn CommandRunner,
        config: &'a AcmeConfig,
        provider: AcmeProvider,
        debug: bool,
    ) -> Self {
        Self {
            runner,
            config,
            provider,
            debug,
        }
    }

    /// acme.sh 是否已安装
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.config.acme_sh_path.is_file()
    }

    /// 缺失时执行安装命令并复查一次；仍缺失则返回致命的前置条件错误
    pub async fn ensure_installed(&self) -> Result<()> {
        if self.is_installed() {
            return Ok(());
        }

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::AcmeClient,
            "install",
            &format!(
                "Could not find acme.sh - installing it to {}",
                self.install_dir().display()
            )
        );

        let args = ["-c".to_string(), self.config.install_command.clone()];
        match self.runner.run(Path::new("sh"), &args).await {
            Ok(output) => ldebug!(
                "system",
                LogStage::ExternalProcess,
                LogComponent::AcmeClient,
                "install_output",
                &output.joined(),
                success = output.success
            ),
            Err(e) => lwarn!(
                "system",
                LogStage::ExternalProcess,
                LogComponent::AcmeClient,
                "install_failed",
                "安装命令执行失败",
                error = %e
            ),
        }

        if self.is_installed() {
            return Ok(());
        }

        let message = format!(
            "Download/installation of acme.sh seems to have failed. Re-run to try again or install manually to '{}'",
            self.config.acme_sh_path.display()
        );
        lerror!("system", LogStage::Startup, LogComponent::AcmeClient, "install", &message);
        Err(OrchestratorError::prerequisite(message))
    }

    /// 检查客户端升级并确保其 cron 任务存在；失败只记录告警
    pub async fn upgrade(&self) {
        let mut lines = Vec::new();

        let steps = [
            vec![AcmeArg::Upgrade, AcmeArg::AutoUpgrade(false)],
            vec![AcmeArg::InstallCronjob],
        ];
        for step in steps {
            let cmd = step
                .into_iter()
                .try_fold(AcmeCommand::new(&self.config.acme_sh_path), AcmeCommand::arg);
            let result = match cmd {
                Ok(cmd) => cmd.run(self.runner).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(output) => lines.extend(output.lines),
                Err(e) => lwarn!(
                    "system",
                    LogStage::Startup,
                    LogComponent::AcmeClient,
                    "upgrade_failed",
                    "acme.sh 升级检查失败",
                    error = %e
                ),
            }
        }

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::AcmeClient,
            "upgrade",
            &format!(
                "Checking for LetsEncrypt client upgrades before renewing certificates:\n{}",
                lines.join("\n")
            )
        );
    }

    /// 为给定 SAN 列表执行签发并等待完成
    pub async fn issue(&self, login: &str, sans: &IndexSet<String>, force: bool) -> Result<CommandOutput> {
        let cmd = AcmeCommand::issue(self.config, self.provider, sans, force, self.debug)?;

        ldebug!(
            login,
            LogStage::ExternalProcess,
            LogComponent::AcmeClient,
            "issue",
            "执行 acme.sh 签发",
            argv = ?cmd.argv()
        );

        let output = cmd.run(self.runner).await?;

        ldebug!(
            login,
            LogStage::ExternalProcess,
            LogComponent::AcmeClient,
            "issue_output",
            &output.joined(),
            success = output.success
        );
        Ok(output)
    }

    fn install_dir(&self) -> &Path {
        self.config.acme_sh_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCommandRunner;
    use tempfile::TempDir;

    fn config(dir: &Path) -> AcmeConfig {
        AcmeConfig {
            acme_sh_path: dir.join("acme.sh"),
            install_command: "true".to_string(),
            ..AcmeConfig::default()
        }
    }

    #[tokio::test]
    async fn test_installed_binary_skips_installer() {
        let tmp = TempDir::new().unwrap();
        let config = config(tmp.path());
        std::fs::write(&config.acme_sh_path, "#!/bin/sh\n").unwrap();
        let runner = FakeCommandRunner::default();

        AcmeClient::new(&runner, &config, AcmeProvider::LetsEncrypt, false)
            .ensure_installed()
            .await
            .unwrap();
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_installer_success() {
        let tmp = TempDir::new().unwrap();
        let config = config(tmp.path());
        let runner = FakeCommandRunner::default().installs(config.acme_sh_path.clone());

        AcmeClient::new(&runner, &config, AcmeProvider::LetsEncrypt, false)
            .ensure_installed()
            .await
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, Path::new("sh"));
        assert_eq!(calls[0].args, vec!["-c".to_string(), "true".to_string()]);
    }

    #[tokio::test]
    async fn test_installer_failure_is_prerequisite_error() {
        let tmp = TempDir::new().unwrap();
        let config = config(tmp.path());
        let runner = FakeCommandRunner::default();

        let err = AcmeClient::new(&runner, &config, AcmeProvider::LetsEncrypt, false)
            .ensure_installed()
            .await
            .unwrap_err();

        assert!(err.is_prerequisite());
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_upgrade_runs_both_steps_and_never_fails() {
        let tmp = TempDir::new().unwrap();
        let config = config(tmp.path());
        let runner = FakeCommandRunner::default().failing_spawn();

        AcmeClient::new(&runner, &config, AcmeProvider::LetsEncrypt, false).upgrade().await;

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args, vec!["--upgrade", "--auto-upgrade", "0"]);
        assert_eq!(calls[1].args, vec!["--install-cronjob"]);
    }
}
