//! # 配置管理模块
//!
//! 提供存储配置的构建器与文件加载

pub mod builders;
pub mod core;

pub use builders::{StoreConfigBuilder, StoreOptionsBuilder};
pub use core::{StoreConfig, StoreOptions};
