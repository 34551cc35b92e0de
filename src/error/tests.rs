//! # 错误处理测试

use crate::error::{Context, OrchestratorError, context_error};
use std::error::Error;

#[test]
fn test_config_error_creation() {
    let err = OrchestratorError::config("测试配置错误");
    assert!(matches!(err, OrchestratorError::Config { .. }));
    assert_eq!(err.to_string(), "配置错误: 测试配置错误");
}

#[test]
fn test_config_error_with_source() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在");
    let err = OrchestratorError::config_with_source("配置文件加载失败", io_err);

    assert!(err.to_string().contains("配置错误: 配置文件加载失败"));
    assert!(err.source().is_some());
}

#[test]
fn test_auto_conversion_from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在");
    let err: OrchestratorError = io_err.into();
    assert!(matches!(err, OrchestratorError::Io { .. }));
}

#[test]
fn test_auto_conversion_from_db_error() {
    let db_err = sea_orm::DbErr::Custom("boom".to_string());
    let err: OrchestratorError = db_err.into();
    assert!(matches!(err, OrchestratorError::Database { .. }));
}

#[test]
fn test_context_wraps_source() {
    let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "权限不足",
    ));

    let err = result.context("读取证书目录失败").unwrap_err();
    assert!(matches!(err, OrchestratorError::Context { .. }));
    assert!(err.to_string().starts_with("读取证书目录失败"));
}

#[test]
fn test_prerequisite_survives_context() {
    let err = context_error::<()>(
        OrchestratorError::prerequisite("acme.sh missing"),
        "run aborted",
    )
    .unwrap_err();
    assert!(err.is_prerequisite());
    assert!(!OrchestratorError::validation("x").is_prerequisite());
}

#[test]
fn test_error_macros() {
    let err = crate::config_error!("unknown provider {}", "foo");
    assert_eq!(err.to_string(), "配置错误: unknown provider foo");

    let err = crate::database_error!("lost connection");
    assert!(matches!(err, OrchestratorError::Database { .. }));
}
