//! rat_docstore - 嵌入式文档数据库适配器
//!
//! 在本地目录中持久化的进程内文档存储，通过统一的异步接口提供
//! 插入、查找、查找并修改（upsert）与删除操作
//!
//! ```no_run
//! use rat_docstore::{DatabaseAdapter, EmbeddedAdapter, StoreOptions, document};
//!
//! # async fn demo() -> rat_docstore::DocStoreResult<()> {
//! let store = EmbeddedAdapter::new("./data/devices", StoreOptions::default())?;
//! let saved = store
//!     .insert_one("devices", &document([("deviceID", "abc")]))
//!     .await?;
//! println!("{:?}", saved.get("id"));
//! # Ok(())
//! # }
//! ```

// 导出所有公共模块
pub mod error;
pub mod types;
pub mod adapter;
pub mod config;
pub mod i18n;

// 重新导出常用类型和函数
pub use error::{DocStoreError, DocStoreResult};
pub use types::*;
pub use adapter::{DatabaseAdapter, EmbeddedAdapter, create_adapter};
pub use config::{StoreConfig, StoreConfigBuilder, StoreOptions, StoreOptionsBuilder};

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

/// 初始化rat_docstore库
///
/// 注册多语言错误消息并根据环境变量选择语言
///
/// 注意：日志系统由调用者自行初始化，本库不会初始化日志
pub fn init() {
    i18n::ErrorMessageI18n::init();
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
