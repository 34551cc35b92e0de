//! # 错误类型定义

use thiserror::Error;

/// 编排器主要错误类型
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// 配置相关错误
    #[error("配置错误: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 数据库相关错误
    #[error("数据库错误: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 前置条件错误（例如 acme.sh 缺失且无法安装），本次运行直接中止
    #[error("前置条件错误: {message}")]
    Prerequisite { message: String },

    /// 外部进程错误
    #[error("外部进程错误: {message}")]
    Process {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 证书解析错误
    #[error("证书错误: {message}")]
    Certificate {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 输入校验错误
    #[error("校验错误: {message}")]
    Validation { message: String },

    /// 系统内部错误
    #[error("内部错误: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// IO相关错误
    #[error("IO错误: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// 附加了上下文的错误
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<OrchestratorError>,
    },
}

impl OrchestratorError {
    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建数据库错误
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的数据库错误
    pub fn database_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建前置条件错误
    pub fn prerequisite<T: Into<String>>(message: T) -> Self {
        Self::Prerequisite {
            message: message.into(),
        }
    }

    /// 创建带来源的外部进程错误
    pub fn process_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Process {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建证书错误
    pub fn certificate<T: Into<String>>(message: T) -> Self {
        Self::Certificate {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的证书错误
    pub fn certificate_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Certificate {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建校验错误
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// 创建内部错误
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// 创建IO错误
    pub fn io<T: Into<String>>(message: T, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// 是否为致命的前置条件错误
    #[must_use]
    pub fn is_prerequisite(&self) -> bool {
        match self {
            Self::Prerequisite { .. } => true,
            Self::Context { source, .. } => source.is_prerequisite(),
            _ => false,
        }
    }
}

impl From<std::io::Error> for OrchestratorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: "文件操作失败".to_string(),
            source: err,
        }
    }
}

impl From<toml::de::Error> for OrchestratorError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML解析失败", err)
    }
}

impl From<serde_json::Error> for OrchestratorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal {
            message: "JSON序列化失败".to_string(),
            source: Some(err.into()),
        }
    }
}

impl From<sea_orm::error::DbErr> for OrchestratorError {
    fn from(err: sea_orm::error::DbErr) -> Self {
        Self::database_with_source("数据库操作失败", err)
    }
}
