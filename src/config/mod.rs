//! # 配置管理模块
//!
//! 处理应用配置加载、验证和环境变量覆盖

mod app_config;
mod database;
mod manager;

pub use app_config::{AcmeConfig, AppConfig, PlatformConfig};
pub use database::{DatabaseConfig, RootServerConfig};
pub use manager::{CONFIG_PATH_ENV, ConfigManager, ENV_PREFIX};

/// 验证配置有效性
pub(crate) fn validate_config(config: &AppConfig) -> crate::error::Result<()> {
    config.validate().map_err(crate::error::OrchestratorError::config)
}
