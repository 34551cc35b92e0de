//! # 特权角色切换
//!
//! 以守卫值表达"当前持有 root 数据库角色"。守卫被丢弃时角色自动释放，
//! 凭据在一次获取内只会交出一次。

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sea_orm::{Database, DatabaseConnection};

use crate::config::RootServerConfig;
use crate::error::{OrchestratorError, Result};
use crate::{ldebug, logging::{LogComponent, LogStage}};

/// root 连接凭据
#[derive(Clone, PartialEq, Eq)]
pub struct SqlCredentials {
    /// 用户名
    pub user: String,
    /// 密码
    pub password: String,
    /// 主机
    pub host: String,
}

impl fmt::Debug for SqlCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .finish()
    }
}

/// 角色切换器，持有已配置的特权服务器列表
#[derive(Debug, Clone, Default)]
pub struct RoleSwitcher {
    servers: Arc<Vec<RootServerConfig>>,
    active: Arc<AtomicUsize>,
}

impl RoleSwitcher {
    /// 创建角色切换器
    #[must_use]
    pub fn new(servers: Vec<RootServerConfig>) -> Self {
        Self {
            servers: Arc::new(servers),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 切换到指定服务器的 root 角色
    pub fn acquire_root(&self, server_index: usize) -> Result<RootGuard> {
        let server = self
            .servers
            .get(server_index)
            .cloned()
            .ok_or_else(|| crate::config_error!("未配置下标为 {} 的 root 数据库服务器", server_index))?;

        let depth = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        ldebug!(
            "system",
            LogStage::Db,
            LogComponent::Database,
            "acquire_root",
            "切换到 root 角色",
            server_index = server_index,
            depth = depth
        );

        Ok(RootGuard {
            server_index,
            server,
            credentials_taken: false,
            active: Arc::clone(&self.active),
        })
    }

    /// 当前是否有 root 角色处于持有状态
    #[must_use]
    pub fn is_root_active(&self) -> bool {
        self.active.load(Ordering::SeqCst) > 0
    }
}

/// root 角色守卫
#[derive(Debug)]
pub struct RootGuard {
    server_index: usize,
    server: RootServerConfig,
    credentials_taken: bool,
    active: Arc<AtomicUsize>,
}

impl RootGuard {
    /// 服务器下标
    #[must_use]
    pub const fn server_index(&self) -> usize {
        self.server_index
    }

    /// 取出凭据，同一守卫只会返回一次
    pub fn take_credentials(&mut self) -> Option<SqlCredentials> {
        if self.credentials_taken {
            return None;
        }
        self.credentials_taken = true;
        Some(SqlCredentials {
            user: self.server.user.clone(),
            password: self.server.password.clone(),
            host: self.server.host.clone(),
        })
    }

    /// 使用 root 角色建立连接
    pub async fn connect(&self) -> Result<DatabaseConnection> {
        Database::connect(self.server.url.as_str()).await.map_err(|e| {
            OrchestratorError::database_with_source(
                format!("无法连接 root 数据库服务器 {}", self.server.host),
                e,
            )
        })
    }
}

impl Drop for RootGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        ldebug!(
            "system",
            LogStage::Db,
            LogComponent::Database,
            "release_root",
            "释放 root 角色",
            server_index = self.server_index
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switcher() -> RoleSwitcher {
        RoleSwitcher::new(vec![RootServerConfig {
            url: "sqlite::memory:".to_string(),
            user: "root".to_string(),
            password: "secret".to_string(),
            host: "localhost".to_string(),
        }])
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let switcher = switcher();
        assert!(!switcher.is_root_active());
        {
            let _guard = switcher.acquire_root(0).unwrap();
            assert!(switcher.is_root_active());
        }
        assert!(!switcher.is_root_active());
    }

    #[test]
    fn test_guard_released_on_error_path() {
        fn failing(switcher: &RoleSwitcher) -> Result<()> {
            let _guard = switcher.acquire_root(0)?;
            Err(OrchestratorError::internal("boom"))
        }

        let switcher = switcher();
        assert!(failing(&switcher).is_err());
        assert!(!switcher.is_root_active());
    }

    #[test]
    fn test_credentials_taken_once() {
        let switcher = switcher();
        let mut guard = switcher.acquire_root(0).unwrap();

        let creds = guard.take_credentials().unwrap();
        assert_eq!(creds.user, "root");
        assert!(!format!("{creds:?}").contains("secret"));
        assert!(guard.take_credentials().is_none());
    }

    #[test]
    fn test_unknown_server_index() {
        let switcher = switcher();
        assert!(switcher.acquire_root(3).is_err());
        assert!(!switcher.is_root_active());
    }

    #[tokio::test]
    async fn test_guard_connects() {
        let switcher = switcher();
        let guard = switcher.acquire_root(0).unwrap();
        assert!(guard.connect().await.is_ok());
    }
}
