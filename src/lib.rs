//! # ACME Orchestrator Library
//!
//! 多租户主机平台的证书生命周期编排核心库，驱动外部 acme.sh 客户端签发与续期证书

pub mod acme;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod tasks;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod validation;

// Re-export commonly used types
pub use acme::{Orchestrator, RunOptions, RunReport};
pub use config::AppConfig;
pub use error::{OrchestratorError, Result};
