//! # 配置管理器
//!
//! 负责定位配置文件、解析 TOML 并应用环境变量覆盖

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use super::AppConfig;
use crate::error::{OrchestratorError, Result};
use crate::{ldebug, linfo, logging::{LogComponent, LogStage}, lwarn};

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "ACME_ORCHESTRATOR_CONFIG_PATH";

/// 环境变量覆盖前缀
pub const ENV_PREFIX: &str = "ACME_ORCHESTRATOR_";

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 当前配置
    config: AppConfig,
    /// 配置文件路径
    path: PathBuf,
}

impl ConfigManager {
    /// 按环境变量约定定位配置文件并加载
    pub fn new() -> Result<Self> {
        Self::from_file(Self::default_config_path())
    }

    /// 默认配置文件路径
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        // 优先使用环境变量指定的配置文件路径
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        PathBuf::from(format!("config/config.{env}.toml"))
    }

    /// 从指定文件创建配置管理器
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let mut config = Self::load_config_file(config_path)?;

        let env_overrides = Self::build_env_overrides(env::vars());
        Self::apply_env_overrides(&mut config, &env_overrides)?;

        // 覆盖后再校验一次
        super::validate_config(&config)?;

        linfo!(
            "system",
            LogStage::Configuration,
            LogComponent::Config,
            "config_loaded",
            "配置加载完成",
            path = %config_path.display(),
            env_overrides = env_overrides.len()
        );

        Ok(Self {
            config,
            path: config_path.to_path_buf(),
        })
    }

    /// 获取当前配置
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 取出配置
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// 配置文件路径
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 加载配置文件
    fn load_config_file(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Err(OrchestratorError::config(format!(
                "配置文件不存在: {}",
                path.display()
            )));
        }

        let config_content = std::fs::read_to_string(path).map_err(|e| {
            OrchestratorError::config_with_source(format!("读取配置文件失败: {}", path.display()), e)
        })?;

        toml::from_str(&config_content).map_err(|e| {
            OrchestratorError::config_with_source(
                format!("TOML解析失败 - 配置文件: {}, 详细错误: {e}", path.display()),
                e,
            )
        })
    }

    /// 构建环境变量覆盖映射
    ///
    /// 例如 `ACME_ORCHESTRATOR_DATABASE_URL` -> `database.url`
    pub(crate) fn build_env_overrides(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> HashMap<String, String> {
        let mut overrides = HashMap::new();

        for (key, value) in vars {
            if key == CONFIG_PATH_ENV {
                continue;
            }
            if let Some(config_key) = key.strip_prefix(ENV_PREFIX) {
                let config_path = config_key.to_lowercase().replace('_', ".");
                overrides.insert(config_path, value);
            }
        }

        overrides
    }

    /// 应用环境变量覆盖
    pub(crate) fn apply_env_overrides(
        config: &mut AppConfig,
        overrides: &HashMap<String, String>,
    ) -> Result<()> {
        for (path, value) in overrides {
            let shown = if path.contains("password") { "***" } else { value.as_str() };
            ldebug!(
                "system",
                LogStage::Configuration,
                LogComponent::Config,
                "env_override",
                "应用环境变量覆盖",
                path = %path,
                value = %shown
            );

            Self::apply_override_to_config(config, path, value)?;
        }
        Ok(())
    }

    /// 将单个覆盖应用到配置对象
    fn apply_override_to_config(config: &mut AppConfig, path: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();

        match parts.as_slice() {
            ["database", "url"] => config.database.url = value.to_string(),
            ["database", "max", "connections"] => {
                config.database.max_connections = parse_value(value, "最大连接数")?;
            }
            ["database", "connect", "timeout"] => {
                config.database.connect_timeout = parse_value(value, "连接超时")?;
            }
            ["acme", "acme", "sh", "path"] => config.acme.acme_sh_path = PathBuf::from(value),
            ["acme", "provider"] => config.acme.provider = value.to_string(),
            ["acme", "challenge", "path"] => config.acme.challenge_path = PathBuf::from(value),
            ["acme", "ecc", "key", "size"] => {
                config.acme.ecc_key_size = parse_value(value, "ECC 密钥长度")?;
            }
            ["acme", "rsa", "key", "size"] => {
                config.acme.rsa_key_size = parse_value(value, "RSA 密钥长度")?;
            }
            ["acme", "reuse", "private", "key"] => {
                config.acme.reuse_private_key = parse_value(value, "私钥复用开关")?;
            }
            ["platform", "hostname"] => config.platform.hostname = value.to_string(),
            ["platform", "install", "dir"] => config.platform.install_dir = value.to_string(),
            ["platform", "vhost", "enabled"] => {
                config.platform.vhost_enabled = parse_value(value, "平台证书开关")?;
            }
            ["platform", "vhost", "redirect"] => {
                config.platform.vhost_redirect = parse_value(value, "平台跳转策略")?;
            }
            ["platform", "aliases"] => {
                config.platform.aliases = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect();
            }
            ["platform", "dns", "check"] => {
                config.platform.dns_check = parse_value(value, "DNS 校验开关")?;
            }
            _ => {
                lwarn!(
                    "system",
                    LogStage::Configuration,
                    LogComponent::Config,
                    "unknown_override",
                    "未知的配置路径，忽略环境变量覆盖",
                    path = %path
                );
            }
        }

        Ok(())
    }
}

fn parse_value<T>(value: &str, what: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| OrchestratorError::config_with_source(format!("无效的{what}: {value}"), e))
}
