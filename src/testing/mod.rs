//! # 测试框架模块
//!
//! 提供内存数据库、fixtures 与外部协作方的测试替身

pub mod fixtures;
pub mod helpers;
pub mod mocks;

pub use fixtures::*;
pub use helpers::*;
pub use mocks::*;
