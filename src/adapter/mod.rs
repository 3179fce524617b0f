//! 数据库适配器模块
//!
//! 提供统一的文档操作接口，屏蔽具体存储引擎的实现差异

use crate::config::StoreConfig;
use crate::error::DocStoreResult;
use crate::types::{Document, FindOptions, RemoveResult};
use async_trait::async_trait;

mod embedded;

pub use embedded::EmbeddedAdapter;

/// 数据库适配器trait，定义统一的文档操作接口
///
/// 所有文档都以 `id` 作为标识字段，驱动内部的字段命名不会出现在结果中
#[async_trait]
pub trait DatabaseAdapter: Send + Sync {
    /// 插入单条文档，返回带有 `id` 的已存储文档
    async fn insert_one(&self, collection: &str, entity: &Document) -> DocStoreResult<Document>;

    /// 查找所有匹配的文档
    async fn find(&self, collection: &str, query: &Document) -> DocStoreResult<Vec<Document>> {
        self.find_with_options(collection, query, &FindOptions::default())
            .await
    }

    /// 按排序和分页选项查找文档
    async fn find_with_options(
        &self,
        collection: &str,
        query: &Document,
        options: &FindOptions,
    ) -> DocStoreResult<Vec<Document>>;

    /// 查找单条文档，没有匹配时返回 `None`
    async fn find_one(&self, collection: &str, query: &Document)
    -> DocStoreResult<Option<Document>>;

    /// 查找并修改，不存在时按查询条件创建（upsert），返回修改后的文档
    ///
    /// 包含 `$set` 等运算符的更新按运算符语义执行，否则整体替换（保留 `id`）
    async fn find_and_modify(
        &self,
        collection: &str,
        query: &Document,
        update: &Document,
    ) -> DocStoreResult<Document>;

    /// 删除所有匹配的文档
    async fn remove(&self, collection: &str, query: &Document) -> DocStoreResult<RemoveResult>;
}

/// 根据存储配置创建适配器
pub fn create_adapter(config: &StoreConfig) -> DocStoreResult<Box<dyn DatabaseAdapter>> {
    Ok(Box::new(EmbeddedAdapter::open(config)?))
}
