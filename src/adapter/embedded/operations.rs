//! 嵌入式文档库适配器trait实现

use super::worker::StoreOperation;
use crate::adapter::{DatabaseAdapter, EmbeddedAdapter};
use crate::error::DocStoreResult;
use crate::types::{Document, FindOptions, RemoveResult};
use async_trait::async_trait;
use rat_logger::debug;

#[async_trait]
impl DatabaseAdapter for EmbeddedAdapter {
    async fn insert_one(&self, collection: &str, entity: &Document) -> DocStoreResult<Document> {
        debug!("插入文档: 集合={}", collection);
        self.dispatch("insert_one", |response| StoreOperation::InsertOne {
            collection: collection.to_string(),
            entity: entity.clone(),
            response,
        })
        .await
    }

    async fn find_with_options(
        &self,
        collection: &str,
        query: &Document,
        options: &FindOptions,
    ) -> DocStoreResult<Vec<Document>> {
        debug!("查找文档: 集合={}, 条件={:?}", collection, query);
        self.dispatch("find", |response| StoreOperation::Find {
            collection: collection.to_string(),
            query: query.clone(),
            options: options.clone(),
            response,
        })
        .await
    }

    async fn find_one(
        &self,
        collection: &str,
        query: &Document,
    ) -> DocStoreResult<Option<Document>> {
        debug!("查找单条文档: 集合={}, 条件={:?}", collection, query);
        self.dispatch("find_one", |response| StoreOperation::FindOne {
            collection: collection.to_string(),
            query: query.clone(),
            response,
        })
        .await
    }

    async fn find_and_modify(
        &self,
        collection: &str,
        query: &Document,
        update: &Document,
    ) -> DocStoreResult<Document> {
        debug!(
            "查找并修改: 集合={}, 条件={:?}, 更新={:?}",
            collection, query, update
        );
        self.dispatch("find_and_modify", |response| StoreOperation::FindAndModify {
            collection: collection.to_string(),
            query: query.clone(),
            update: update.clone(),
            response,
        })
        .await
    }

    async fn remove(&self, collection: &str, query: &Document) -> DocStoreResult<RemoveResult> {
        debug!("删除文档: 集合={}, 条件={:?}", collection, query);
        self.dispatch("remove", |response| StoreOperation::Remove {
            collection: collection.to_string(),
            query: query.clone(),
            response,
        })
        .await
    }
}
