//! 嵌入式文档库工作线程模块
//!
//! 驱动接口是同步的：数据库句柄由单个工作线程持有，
//! 异步调用方通过通道提交操作并等待 oneshot 回复

use super::query;
use crate::error::DocStoreResult;
use crate::types::{Document, FindOptions, IdStrategy, RemoveResult};
use polodb_core::Database;
use rat_logger::info;
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};

/// 文档库操作请求
#[derive(Debug)]
pub(crate) enum StoreOperation {
    /// 插入单条文档
    InsertOne {
        collection: String,
        entity: Document,
        response: oneshot::Sender<DocStoreResult<Document>>,
    },
    /// 查找文档
    Find {
        collection: String,
        query: Document,
        options: FindOptions,
        response: oneshot::Sender<DocStoreResult<Vec<Document>>>,
    },
    /// 查找单条文档
    FindOne {
        collection: String,
        query: Document,
        response: oneshot::Sender<DocStoreResult<Option<Document>>>,
    },
    /// 查找并修改（upsert）
    FindAndModify {
        collection: String,
        query: Document,
        update: Document,
        response: oneshot::Sender<DocStoreResult<Document>>,
    },
    /// 删除文档
    Remove {
        collection: String,
        query: Document,
        response: oneshot::Sender<DocStoreResult<RemoveResult>>,
    },
    /// 关闭工作线程，数据库句柄释放后回复
    Shutdown { response: oneshot::Sender<()> },
}

impl StoreOperation {
    /// 操作名称（用于日志和错误信息）
    pub(crate) fn name(&self) -> &'static str {
        match self {
            StoreOperation::InsertOne { .. } => "insert_one",
            StoreOperation::Find { .. } => "find",
            StoreOperation::FindOne { .. } => "find_one",
            StoreOperation::FindAndModify { .. } => "find_and_modify",
            StoreOperation::Remove { .. } => "remove",
            StoreOperation::Shutdown { .. } => "shutdown",
        }
    }
}

/// 文档库单线程工作器
pub(crate) struct StoreWorker {
    /// 数据库句柄
    database: Database,
    /// 操作接收器
    operation_receiver: mpsc::UnboundedReceiver<StoreOperation>,
    /// ID 生成策略
    id_strategy: IdStrategy,
    /// 存储目录（仅用于日志）
    path: PathBuf,
}

impl std::fmt::Debug for StoreWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreWorker")
            .field("database", &"<Database>")
            .field("id_strategy", &self.id_strategy)
            .field("path", &self.path)
            .finish()
    }
}

impl StoreWorker {
    pub(crate) fn new(
        database: Database,
        operation_receiver: mpsc::UnboundedReceiver<StoreOperation>,
        id_strategy: IdStrategy,
        path: PathBuf,
    ) -> Self {
        Self {
            database,
            operation_receiver,
            id_strategy,
            path,
        }
    }

    /// 运行工作器，直到所有发送端关闭或收到关闭请求
    pub(crate) fn run(mut self) {
        info!("文档库工作线程开始运行: 路径={:?}", self.path);

        let mut shutdown_response = None;
        while let Some(operation) = self.operation_receiver.blocking_recv() {
            crate::debug_log!("工作线程收到操作: {}", operation.name());
            match operation {
                StoreOperation::Shutdown { response } => {
                    shutdown_response = Some(response);
                    break;
                }
                other => self.handle_operation(other),
            }
        }

        let path = self.path.clone();
        // 先释放数据库句柄，再通知调用方
        drop(self);
        info!("文档库工作线程停止运行: 路径={:?}", path);

        if let Some(response) = shutdown_response {
            let _ = response.send(());
        }
    }

    /// 处理单个操作，结果通过 oneshot 原样返回
    fn handle_operation(&self, operation: StoreOperation) {
        match operation {
            StoreOperation::InsertOne {
                collection,
                entity,
                response,
            } => {
                let result =
                    query::insert_one(&self.database, &collection, &entity, self.id_strategy);
                let _ = response.send(result);
            }
            StoreOperation::Find {
                collection,
                query: filter,
                options,
                response,
            } => {
                let result = query::find(&self.database, &collection, &filter, &options);
                let _ = response.send(result);
            }
            StoreOperation::FindOne {
                collection,
                query: filter,
                response,
            } => {
                let result = query::find_one(&self.database, &collection, &filter);
                let _ = response.send(result);
            }
            StoreOperation::FindAndModify {
                collection,
                query: filter,
                update,
                response,
            } => {
                let result = query::find_and_modify(
                    &self.database,
                    &collection,
                    &filter,
                    &update,
                    self.id_strategy,
                );
                let _ = response.send(result);
            }
            StoreOperation::Remove {
                collection,
                query: filter,
                response,
            } => {
                let result = query::remove(&self.database, &collection, &filter);
                let _ = response.send(result);
            }
            StoreOperation::Shutdown { response } => {
                let _ = response.send(());
            }
        }
    }
}
