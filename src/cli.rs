//! # 命令行接口

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::acme::RunOptions;

/// 证书生命周期编排器
#[derive(Debug, Parser)]
#[command(name = "acme-orchestrator", version, about)]
pub struct Cli {
    /// 配置文件路径（默认读取 `ACME_ORCHESTRATOR_CONFIG_PATH` 或 `config/config.<RUST_ENV>.toml`）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 执行签发与续期
    Run(RunArgs),
    /// 仅检查是否有待处理工作，有则投递重建任务
    Check,
    /// 只运行数据库迁移
    Migrate,
}

/// `run` 子命令参数
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct RunArgs {
    /// 强制落库全部续期候选
    #[arg(long)]
    pub force: bool,
    /// 调试模式：提升日志级别并向 acme.sh 传递 `--debug`
    #[arg(long)]
    pub debug: bool,
    /// 由任务消费方内部调用，执行完整运行
    #[arg(long)]
    pub internal: bool,
    /// 不投递下游重建任务
    #[arg(long)]
    pub no_task: bool,
}

/// 实际执行的模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 完整运行
    Full(RunOptions),
    /// 仅检查
    Check,
    /// 数据库迁移
    Migrate,
}

impl Cli {
    /// 解析实际模式；`run` 未带 `--force/--debug/--internal` 时等同于 `check`
    #[must_use]
    pub const fn mode(&self) -> Mode {
        match &self.command {
            Commands::Run(args) if args.force || args.debug || args.internal => Mode::Full(RunOptions {
                force: args.force,
                debug: args.debug,
                suppress_task: args.no_task,
            }),
            Commands::Run(_) | Commands::Check => Mode::Check,
            Commands::Migrate => Mode::Migrate,
        }
    }

    /// 日志级别
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match &self.command {
            Commands::Run(args) if args.debug => "debug",
            _ => "info",
        }
    }
}
