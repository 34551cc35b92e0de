//! # 日志配置模块
//!
//! 提供日志系统初始化以及带阶段/组件标签的结构化日志宏。
//! 每条日志的第一个字段是主体（租户登录名或 `"system"`），方便按租户审计。

use std::env;
use std::fmt;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 日志阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStage {
    /// 启动与初始化
    Startup,
    /// 配置加载
    Configuration,
    /// 数据库操作
    Db,
    /// 候选选择
    Selection,
    /// 首次签发
    Issuance,
    /// 续期对账
    Renewal,
    /// 运行收尾
    Reconcile,
    /// 外部进程调用
    ExternalProcess,
    /// 关闭
    Shutdown,
    /// 错误
    Error,
}

impl LogStage {
    /// 阶段的稳定字符串表示
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Configuration => "configuration",
            Self::Db => "db",
            Self::Selection => "selection",
            Self::Issuance => "issuance",
            Self::Renewal => "renewal",
            Self::Reconcile => "reconcile",
            Self::ExternalProcess => "external_process",
            Self::Shutdown => "shutdown",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 日志组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogComponent {
    /// 主程序
    Main,
    /// 配置
    Config,
    /// 数据库
    Database,
    /// 文件系统证书定位
    Locator,
    /// 候选选择器
    Selector,
    /// SAN 构建
    SanBuilder,
    /// DNS 校验
    DnsValidator,
    /// 外部 ACME 客户端
    AcmeClient,
    /// 证书落库
    Materializer,
    /// 运行协调器
    Coordinator,
    /// 任务队列
    TaskQueue,
}

impl LogComponent {
    /// 组件的稳定字符串表示
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Config => "config",
            Self::Database => "database",
            Self::Locator => "locator",
            Self::Selector => "selector",
            Self::SanBuilder => "san_builder",
            Self::DnsValidator => "dns_validator",
            Self::AcmeClient => "acme_client",
            Self::Materializer => "materializer",
            Self::Coordinator => "coordinator",
            Self::TaskQueue => "task_queue",
        }
    }
}

impl fmt::Display for LogComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 结构化 info 日志
///
/// `linfo!(subject, stage, component, operation, message, field = value, ...)`
#[macro_export]
macro_rules! linfo {
    ($subject:expr, $stage:expr, $component:expr, $op:expr, $msg:expr $(, $($fields:tt)+)?) => {
        ::tracing::info!(
            subject = %$subject,
            stage = %$stage,
            component = %$component,
            operation = $op,
            $($($fields)+,)?
            "{}",
            $msg
        )
    };
}

/// 结构化 warn 日志
#[macro_export]
macro_rules! lwarn {
    ($subject:expr, $stage:expr, $component:expr, $op:expr, $msg:expr $(, $($fields:tt)+)?) => {
        ::tracing::warn!(
            subject = %$subject,
            stage = %$stage,
            component = %$component,
            operation = $op,
            $($($fields)+,)?
            "{}",
            $msg
        )
    };
}

/// 结构化 error 日志
#[macro_export]
macro_rules! lerror {
    ($subject:expr, $stage:expr, $component:expr, $op:expr, $msg:expr $(, $($fields:tt)+)?) => {
        ::tracing::error!(
            subject = %$subject,
            stage = %$stage,
            component = %$component,
            operation = $op,
            $($($fields)+,)?
            "{}",
            $msg
        )
    };
}

/// 结构化 debug 日志
#[macro_export]
macro_rules! ldebug {
    ($subject:expr, $stage:expr, $component:expr, $op:expr, $msg:expr $(, $($fields:tt)+)?) => {
        ::tracing::debug!(
            subject = %$subject,
            stage = %$stage,
            component = %$component,
            operation = $op,
            $($($fields)+,)?
            "{}",
            $msg
        )
    };
}

/// 构建默认的日志过滤表达式
#[must_use]
pub fn default_filter(level: &str) -> String {
    // 默认关闭 SQLx 逐条查询日志
    format!("{level},acme_orchestrator=debug,sqlx::query=off,sea_orm::query=warn,sqlx=warn")
}

/// 初始化日志系统
///
/// `RUST_LOG` 存在时优先使用；否则按 `log_level`（默认 `info`）生成过滤器。
pub fn init_logging(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let log_filter = env::var("RUST_LOG").unwrap_or_else(|_| default_filter(level));

    let result = tracing_subscriber::registry()
        .with(EnvFilter::try_new(&log_filter).unwrap_or_else(|_| EnvFilter::new(default_filter(level))))
        .with(
            tracing_fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();

    if result.is_ok() {
        tracing::debug!(filter = %log_filter, "logging initialised");
    }
}
