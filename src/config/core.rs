//! # 配置管理模块 - 核心配置类型
//!
//! 存储配置只有两部分：存储目录与适配器选项

use crate::error::{DocStoreError, DocStoreResult};
use crate::types::IdStrategy;
use rat_logger::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 文档库配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// 存储目录（不存在时按选项决定是否创建）
    pub path: PathBuf,
    /// 适配器选项
    pub options: StoreOptions,
}

/// 适配器选项
///
/// 由适配器自身使用：目录准备与ID生成。驱动按目录打开，不接收这些选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// 存储目录不存在时是否自动创建
    pub create_if_missing: bool,
    /// 插入文档未携带ID时的ID生成策略
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            id_strategy: IdStrategy::ObjectId,
        }
    }
}

impl StoreConfig {
    /// 创建存储配置构建器
    pub fn builder() -> super::builders::StoreConfigBuilder {
        super::builders::StoreConfigBuilder::new()
    }

    /// 从配置文件加载配置
    ///
    /// 扩展名为 `toml` 时按TOML解析，否则按JSON解析
    ///
    /// # 参数
    ///
    /// * `config_path` - 配置文件路径
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> DocStoreResult<Self> {
        let content = std::fs::read_to_string(config_path.as_ref())?;

        let config: StoreConfig = if is_toml(config_path.as_ref()) {
            toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
        } else {
            serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
        };

        if config.path.as_os_str().is_empty() {
            return Err(crate::store_error!(config, "存储路径不能为空"));
        }

        info!("从文件加载存储配置: {:?}", config_path.as_ref());
        Ok(config)
    }

    /// 保存配置到文件
    ///
    /// # 参数
    ///
    /// * `config_path` - 配置文件路径
    pub fn save_to_file<P: AsRef<Path>>(&self, config_path: P) -> DocStoreResult<()> {
        let content = if is_toml(config_path.as_ref()) {
            toml::to_string_pretty(self).map_err(|e| {
                crate::store_error!(serialization, format!("序列化TOML配置失败: {}", e))
            })?
        } else {
            serde_json::to_string_pretty(self).map_err(|e| {
                crate::store_error!(serialization, format!("序列化JSON配置失败: {}", e))
            })?
        };

        std::fs::write(config_path.as_ref(), content)?;

        info!("保存存储配置到文件: {:?}", config_path.as_ref());
        Ok(())
    }
}

impl StoreOptions {
    /// 创建适配器选项构建器
    pub fn builder() -> super::builders::StoreOptionsBuilder {
        super::builders::StoreOptionsBuilder::new()
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}

fn parse_error(message: String) -> DocStoreError {
    crate::i18n::ErrorMessageI18n::ensure_registered();
    crate::store_error!(
        config,
        crate::i18n::tf("error.config_parse", &[("message", message.as_str())])
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_toml_round_trip() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("store.toml");

        let config = StoreConfig {
            path: PathBuf::from("./data/devices"),
            options: StoreOptions {
                create_if_missing: false,
                id_strategy: IdStrategy::Uuid,
            },
        };
        config.save_to_file(&file).unwrap();

        let text = std::fs::read_to_string(&file).unwrap();
        assert!(text.contains("id_strategy = \"uuid\""));

        let loaded = StoreConfig::from_file(&file).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_json_without_id_strategy_uses_object_id() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("store.json");
        std::fs::write(
            &file,
            r#"{ "path": "/var/lib/store", "options": { "create_if_missing": true } }"#,
        )
        .unwrap();

        let loaded = StoreConfig::from_file(&file).unwrap();
        assert_eq!(loaded.path, PathBuf::from("/var/lib/store"));
        assert_eq!(loaded.options.id_strategy, IdStrategy::ObjectId);
    }

    #[test]
    fn test_broken_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("store.toml");
        std::fs::write(&file, "path = ").unwrap();

        let err = StoreConfig::from_file(&file).unwrap_err();
        assert!(matches!(err, DocStoreError::ConfigError { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = StoreConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, DocStoreError::IoError(_)));
    }
}
