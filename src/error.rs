//! 错误处理模块
//!
//! 定义适配器的统一错误类型。驱动返回的错误原样包装后向上传递，
//! 不做重试、不做错误类型转换

use thiserror::Error;

/// 文档库错误类型
#[derive(Error, Debug)]
pub enum DocStoreError {
    /// 底层驱动错误（原样传递）
    #[error("驱动错误: {0}")]
    Driver(#[from] polodb_core::Error),

    /// IO错误（目录创建、配置文件读写）
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 配置错误
    #[error("配置错误: {message}")]
    ConfigError { message: String },

    /// 数据序列化错误
    #[error("数据序列化失败: {message}")]
    SerializationError { message: String },

    /// 工作线程已关闭
    #[error("工作线程不可用: {message}")]
    WorkerClosed { message: String },
}

/// 文档库结果类型
pub type DocStoreResult<T> = Result<T, DocStoreError>;

/// 快速构建错误的宏
///
/// ```ignore
/// let err = store_error!(config, "存储路径不能为空");
/// ```
#[macro_export]
macro_rules! store_error {
    (config, $msg:expr) => {
        $crate::error::DocStoreError::ConfigError {
            message: $msg.to_string(),
        }
    };
    (serialization, $msg:expr) => {
        $crate::error::DocStoreError::SerializationError {
            message: $msg.to_string(),
        }
    };
    (worker_closed, $msg:expr) => {
        $crate::error::DocStoreError::WorkerClosed {
            message: $msg.to_string(),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_macro() {
        let err = store_error!(config, "路径不能为空");
        match err {
            DocStoreError::ConfigError { message } => assert_eq!(message, "路径不能为空"),
            other => panic!("错误类型不符: {:?}", other),
        }

        let err = store_error!(serialization, format!("字段 {} 无法转换", "age"));
        assert!(matches!(err, DocStoreError::SerializationError { .. }));
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DocStoreError = io.into();
        assert!(matches!(err, DocStoreError::IoError(_)));
        assert!(err.to_string().contains("denied"));
    }
}
