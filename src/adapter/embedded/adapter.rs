//! 嵌入式文档库适配器核心模块
//!
//! 负责存储目录准备、打开数据库以及启动工作线程

use super::worker::{StoreOperation, StoreWorker};
use crate::config::{StoreConfig, StoreOptions};
use crate::error::DocStoreResult;
use crate::i18n::{tf, ErrorMessageI18n};
use polodb_core::Database;
use rat_logger::{debug, error, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// 嵌入式文档库适配器
///
/// 克隆的适配器共享同一个工作线程；最后一个克隆被释放时工作线程退出并关闭数据库
#[derive(Debug, Clone)]
pub struct EmbeddedAdapter {
    /// 操作发送器
    operation_sender: mpsc::UnboundedSender<StoreOperation>,
    /// 存储目录
    path: Arc<PathBuf>,
    /// 适配器选项
    options: StoreOptions,
}

impl EmbeddedAdapter {
    /// 创建新的嵌入式文档库适配器
    ///
    /// 存储目录不存在时按 `create_if_missing` 决定是否创建（包括中间目录）
    ///
    /// # 参数
    ///
    /// * `path` - 存储目录
    /// * `options` - 适配器选项
    pub fn new<P: AsRef<Path>>(path: P, options: StoreOptions) -> DocStoreResult<Self> {
        ErrorMessageI18n::ensure_registered();

        let path = path.as_ref().to_path_buf();
        prepare_directory(&path, options.create_if_missing)?;

        let database = Database::open_path(&path).map_err(|e| {
            error!(
                "{}",
                tf(
                    "error.open_failed",
                    &[
                        ("path", path.display().to_string().as_str()),
                        ("message", e.to_string().as_str()),
                    ],
                )
            );
            e
        })?;

        let (operation_sender, operation_receiver) = mpsc::unbounded_channel();
        let worker = StoreWorker::new(
            database,
            operation_receiver,
            options.id_strategy,
            path.clone(),
        );

        std::thread::Builder::new()
            .name("rat_docstore-worker".to_string())
            .spawn(move || worker.run())
            .map_err(|e| {
                crate::store_error!(
                    worker_closed,
                    tf("error.worker_spawn", &[("message", e.to_string().as_str())])
                )
            })?;

        info!(
            "嵌入式文档库已打开: 路径={:?}, ID策略={:?}",
            path, options.id_strategy
        );

        Ok(Self {
            operation_sender,
            path: Arc::new(path),
            options,
        })
    }

    /// 根据存储配置创建适配器
    pub fn open(config: &StoreConfig) -> DocStoreResult<Self> {
        Self::new(&config.path, config.options.clone())
    }

    /// 存储目录
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 适配器选项
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// 关闭工作线程并释放数据库
    ///
    /// 返回时数据库已关闭，同一目录可以重新打开。所有克隆随之失效，
    /// 之后的调用返回 `WorkerClosed`；重复关闭直接返回成功
    pub async fn close(&self) -> DocStoreResult<()> {
        let (response, receiver) = oneshot::channel();
        if self
            .operation_sender
            .send(StoreOperation::Shutdown { response })
            .is_err()
        {
            debug!("工作线程已停止，跳过关闭: 路径={:?}", self.path);
            return Ok(());
        }

        let _ = receiver.await;
        info!("嵌入式文档库已关闭: 路径={:?}", self.path);
        Ok(())
    }

    /// 提交操作到工作线程并等待结果
    pub(crate) async fn dispatch<T, F>(&self, operation_name: &str, build: F) -> DocStoreResult<T>
    where
        F: FnOnce(oneshot::Sender<DocStoreResult<T>>) -> StoreOperation,
    {
        let (response_sender, response_receiver) = oneshot::channel();

        self.operation_sender
            .send(build(response_sender))
            .map_err(|_| worker_gone(operation_name))?;

        response_receiver
            .await
            .map_err(|_| worker_gone(operation_name))?
    }
}

fn worker_gone(operation_name: &str) -> crate::error::DocStoreError {
    crate::store_error!(
        worker_closed,
        tf("error.worker_gone", &[("operation", operation_name)])
    )
}

/// 准备存储目录
fn prepare_directory(path: &Path, create_if_missing: bool) -> DocStoreResult<()> {
    let display = path.display().to_string();

    if path.exists() {
        if !path.is_dir() {
            return Err(crate::store_error!(
                config,
                tf("error.path_not_dir", &[("path", display.as_str())])
            ));
        }
        return Ok(());
    }

    if !create_if_missing {
        return Err(crate::store_error!(
            config,
            tf("error.dir_not_found", &[("path", display.as_str())])
        ));
    }

    std::fs::create_dir_all(path).map_err(|e| {
        error!(
            "{}",
            tf(
                "error.dir_create",
                &[
                    ("path", display.as_str()),
                    ("message", e.to_string().as_str()),
                ],
            )
        );
        e
    })?;

    info!("创建存储目录: {}", display);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocStoreError;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_directory_creates_nested() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b").join("c");

        prepare_directory(&nested, true).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_prepare_directory_rejects_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();

        let err = prepare_directory(&file, true).unwrap_err();
        assert!(matches!(err, DocStoreError::ConfigError { .. }));
    }

    #[test]
    fn test_prepare_directory_without_create() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        let err = prepare_directory(&missing, false).unwrap_err();
        assert!(matches!(err, DocStoreError::ConfigError { .. }));
        assert!(!missing.exists());
    }
}
