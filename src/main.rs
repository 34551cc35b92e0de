//! # ACME Orchestrator 主程序
//!
//! 由外部调度器周期性调用，每次执行一次检查或完整运行

use std::process::ExitCode;
use std::sync::Arc;

use acme_orchestrator::{
    Orchestrator,
    acme::{SystemCommandRunner, SystemResolver},
    cli::{Cli, Mode},
    config::ConfigManager,
    database, lerror, linfo,
    logging::{self, LogComponent, LogStage},
    tasks::DbTaskQueue,
};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(Some(cli.log_level()));

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            lerror!(
                "system",
                LogStage::Error,
                LogComponent::Main,
                "fatal",
                &format!("运行失败: {e:#}")
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config_manager = match &cli.config {
        Some(path) => ConfigManager::from_file(path),
        None => ConfigManager::new(),
    }
    .map_err(|e| anyhow::anyhow!("配置加载失败: {e}"))?;
    let config = config_manager.into_config();

    let db = database::init_database(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("数据库连接失败: {e}"))?;
    database::check_database_status(&db)
        .await
        .map_err(|e| anyhow::anyhow!("数据库状态检查失败: {e}"))?;
    database::run_migrations(&db)
        .await
        .map_err(|e| anyhow::anyhow!("数据库迁移失败: {e}"))?;

    let orchestrator = |config| {
        Orchestrator::new(
            db.clone(),
            config,
            Arc::new(SystemCommandRunner),
            Arc::new(SystemResolver::new()),
            Arc::new(DbTaskQueue::new(db.clone())),
        )
    };

    match cli.mode() {
        Mode::Migrate => {
            linfo!("system", LogStage::Shutdown, LogComponent::Main, "migrate_done", "数据库迁移完成");
        }
        Mode::Check => {
            let report = orchestrator(config).check().await?;
            linfo!(
                "system",
                LogStage::Shutdown,
                LogComponent::Main,
                "check_done",
                "检查完成",
                has_work = report.has_work()
            );
        }
        Mode::Full(options) => {
            let report = orchestrator(config).run(options).await?;
            linfo!(
                "system",
                LogStage::Shutdown,
                LogComponent::Main,
                "run_done",
                "运行完成",
                issued = report.issued,
                renewed = report.renewed,
                failed = report.failed,
                changed = report.changed
            );
        }
    }

    Ok(())
}
