//! # 存储配置构建器模块
//!
//! 提供存储配置的构建器实现，支持链式调用和严格验证

use crate::config::core::{StoreConfig, StoreOptions};
use crate::error::DocStoreError;
use crate::types::IdStrategy;
use rat_logger::info;
use std::path::PathBuf;

/// 存储配置构建器
///
/// 严格要求所有配置项必须显式设置
#[derive(Debug)]
pub struct StoreConfigBuilder {
    path: Option<PathBuf>,
    options: Option<StoreOptions>,
}

impl StoreConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            path: None,
            options: None,
        }
    }

    /// 设置存储目录
    ///
    /// # 参数
    ///
    /// * `path` - 存储目录路径
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// 设置适配器选项
    ///
    /// # 参数
    ///
    /// * `options` - 适配器选项
    pub fn options(mut self, options: StoreOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// 构建存储配置
    ///
    /// # 错误
    ///
    /// 如果任何必需的配置项未设置，或路径为空，将返回错误
    pub fn build(self) -> Result<StoreConfig, DocStoreError> {
        let path = self
            .path
            .ok_or_else(|| crate::store_error!(config, "存储路径必须设置"))?;

        if path.as_os_str().is_empty() {
            return Err(crate::store_error!(config, "存储路径不能为空"));
        }

        let options = self
            .options
            .ok_or_else(|| crate::store_error!(config, "适配器选项必须设置"))?;

        info!("创建存储配置: 路径={:?}, ID策略={:?}", path, options.id_strategy);

        Ok(StoreConfig { path, options })
    }
}

impl Default for StoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 适配器选项构建器
#[derive(Debug)]
pub struct StoreOptionsBuilder {
    create_if_missing: Option<bool>,
    id_strategy: Option<IdStrategy>,
}

impl StoreOptionsBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            create_if_missing: None,
            id_strategy: None,
        }
    }

    /// 设置目录不存在时是否自动创建
    pub fn create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = Some(create_if_missing);
        self
    }

    /// 设置ID生成策略
    pub fn id_strategy(mut self, id_strategy: IdStrategy) -> Self {
        self.id_strategy = Some(id_strategy);
        self
    }

    /// 构建适配器选项
    ///
    /// # 错误
    ///
    /// 如果任何必需的配置项未设置，将返回错误
    pub fn build(self) -> Result<StoreOptions, DocStoreError> {
        let create_if_missing = self
            .create_if_missing
            .ok_or_else(|| crate::store_error!(config, "自动创建目录选项必须设置"))?;

        let id_strategy = self
            .id_strategy
            .ok_or_else(|| crate::store_error!(config, "ID生成策略必须设置"))?;

        Ok(StoreOptions {
            create_if_missing,
            id_strategy,
        })
    }
}

impl Default for StoreOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_all_fields() {
        assert!(StoreConfigBuilder::new().build().is_err());
        assert!(StoreConfigBuilder::new().path("./data").build().is_err());
        assert!(StoreOptionsBuilder::new().create_if_missing(true).build().is_err());
    }

    #[test]
    fn test_empty_path_rejected() {
        let err = StoreConfigBuilder::new()
            .path("")
            .options(StoreOptions::default())
            .build()
            .unwrap_err();
        assert!(matches!(err, DocStoreError::ConfigError { .. }));
    }

    #[test]
    fn test_build_full_config() {
        let options = StoreOptions::builder()
            .create_if_missing(false)
            .id_strategy(IdStrategy::Uuid)
            .build()
            .unwrap();

        let config = StoreConfig::builder()
            .path("./data/devices")
            .options(options.clone())
            .build()
            .unwrap();

        assert_eq!(config.path, PathBuf::from("./data/devices"));
        assert_eq!(config.options, options);
    }
}
