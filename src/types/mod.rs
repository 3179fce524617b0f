//! 通用数据类型定义
//!
//! 定义文档值、ID策略以及查询相关的类型

pub mod data_value;
pub mod id_types;
pub mod query;

pub use data_value::{DataValue, Document, document, json_value_to_data_value};
pub use id_types::IdStrategy;
pub use query::{FindOptions, RemoveResult, SortConfig, SortDirection};
