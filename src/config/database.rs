//! # 数据库配置

use serde::{Deserialize, Serialize};

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库URL
    pub url: String,
    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// 特权（root）连接，按服务器下标索引
    #[serde(default)]
    pub root_servers: Vec<RootServerConfig>,
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_connect_timeout() -> u64 {
    30
}

/// 特权数据库服务器
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootServerConfig {
    /// 连接 URL
    pub url: String,
    /// 用户名
    pub user: String,
    /// 密码
    pub password: String,
    /// 主机
    pub host: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/panel.db".to_string(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
            root_servers: Vec::new(),
        }
    }
}

impl DatabaseConfig {
    /// 检查是否为内存数据库
    #[must_use]
    pub fn is_memory_database(&self) -> bool {
        self.url.contains(":memory:")
    }

    /// 检查是否为SQLite数据库
    #[must_use]
    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }
}
