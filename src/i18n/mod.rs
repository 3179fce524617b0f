//! 多语言错误消息模块
//!
//! 使用rat_embed_lang框架提供统一的错误消息多语言支持

use std::collections::HashMap;
use once_cell::sync::OnceCell;
use rat_embed_lang::register_translations;

static REGISTERED: OnceCell<()> = OnceCell::new();

/// 错误消息翻译注册器
pub struct ErrorMessageI18n;

impl ErrorMessageI18n {
    /// 注册所有错误消息翻译
    pub fn register_all_translations() {
        let mut translations = HashMap::new();

        let entries: [(&str, &str, &str, &str); 8] = [
            (
                "error.dir_create",
                "创建存储目录失败: {path} ({message})",
                "Failed to create storage directory: {path} ({message})",
                "ストレージディレクトリ作成失敗: {path} ({message})",
            ),
            (
                "error.dir_not_found",
                "存储目录不存在且未启用自动创建: {path}",
                "Storage directory does not exist and auto-create is not enabled: {path}",
                "ストレージディレクトリが存在せず、自動作成が有効ではありません: {path}",
            ),
            (
                "error.path_not_dir",
                "存储路径不是目录: {path}",
                "Storage path is not a directory: {path}",
                "ストレージパスがディレクトリではありません: {path}",
            ),
            (
                "error.open_failed",
                "打开文档数据库失败: {path} ({message})",
                "Failed to open document database: {path} ({message})",
                "ドキュメントデータベースを開けませんでした: {path} ({message})",
            ),
            (
                "error.worker_spawn",
                "文档库工作线程启动失败: {message}",
                "Document store worker startup failed: {message}",
                "ドキュメントストアワーカー起動失敗: {message}",
            ),
            (
                "error.worker_gone",
                "文档库工作线程已停止，无法执行操作: {operation}",
                "Document store worker has stopped, cannot run: {operation}",
                "ドキュメントストアワーカーが停止しています: {operation}",
            ),
            (
                "error.bson_convert",
                "BSON数据转换失败: {message}",
                "BSON conversion failed: {message}",
                "BSON変換失敗: {message}",
            ),
            (
                "error.config_parse",
                "解析配置文件失败: {message}",
                "Failed to parse configuration file: {message}",
                "設定ファイルの解析に失敗しました: {message}",
            ),
        ];

        for (key, zh, en, ja) in entries {
            let mut messages = HashMap::new();
            messages.insert("zh-CN".to_string(), zh.to_string());
            messages.insert("en-US".to_string(), en.to_string());
            messages.insert("ja-JP".to_string(), ja.to_string());
            translations.insert(key.to_string(), messages);
        }

        register_translations(translations);
    }

    /// 初始化错误消息多语言支持
    pub fn init() {
        REGISTERED.get_or_init(Self::register_all_translations);

        // 从环境变量获取语言设置，默认为zh-CN
        let lang = std::env::var("RAT_LANG")
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_else(|_| "zh-CN".to_string());

        use rat_embed_lang::normalize_language_code;
        let normalized_lang = normalize_language_code(&lang);
        set_language(&normalized_lang);
    }

    /// 确保翻译已注册（不改变当前语言）
    pub fn ensure_registered() {
        REGISTERED.get_or_init(Self::register_all_translations);
    }
}

/// 重新导出rat_embed_lang的核心函数
pub use rat_embed_lang::{t, tf, set_language, current_language};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_message_substitutes_args() {
        ErrorMessageI18n::ensure_registered();
        set_language("en-US");
        let message = tf("error.path_not_dir", &[("path", "/srv/devices")]);
        assert!(message.contains("/srv/devices"), "{}", message);
        assert!(message.starts_with("Storage path"), "{}", message);
    }
}
