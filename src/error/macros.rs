//! # 错误处理宏

/// 快速创建配置错误的宏
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::OrchestratorError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::OrchestratorError::config(format!($fmt, $($arg)*))
    };
}

/// 快速创建数据库错误的宏
#[macro_export]
macro_rules! database_error {
    ($msg:expr) => {
        $crate::error::OrchestratorError::database($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::OrchestratorError::database(format!($fmt, $($arg)*))
    };
}

/// 快速创建校验错误的宏
#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::OrchestratorError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::OrchestratorError::validation(format!($fmt, $($arg)*))
    };
}

/// 确保条件成立，否则返回配置错误
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::config_error!($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::config_error!($fmt, $($arg)*));
        }
    };
}
