//! 嵌入式文档库适配器模块
//!
//! 基于 polodb_core 的进程内文档存储，数据持久化在本地目录中。
//! 对外的文档使用 `id` 字段，驱动内部使用 `_id`
//!
//! 模块组织：
//! - `adapter`: 适配器结构、目录准备与工作线程启动
//! - `operations`: DatabaseAdapter trait实现
//! - `query`: 同步驱动调用
//! - `utils`: BSON转换与ID映射
//! - `worker`: 持有数据库句柄的工作线程

pub mod adapter;
pub mod operations;
pub(crate) mod query;
pub(crate) mod utils;
pub(crate) mod worker;

pub use adapter::EmbeddedAdapter;
