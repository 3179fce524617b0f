use serde::{Deserialize, Serialize};

/// ID 生成策略
///
/// 仅在插入的文档没有携带 `id` 字段时生效
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// 由驱动生成 ObjectId（输出为24位十六进制字符串）
    #[default]
    ObjectId,
    /// 由适配器生成 UUID v4（字符串）
    Uuid,
}

impl IdStrategy {
    /// 创建 UUID 策略
    pub fn uuid() -> Self {
        Self::Uuid
    }

    /// 创建 ObjectId 策略
    pub fn object_id() -> Self {
        Self::ObjectId
    }

    /// 按策略生成新ID，返回 None 表示交给驱动生成
    pub fn generate(&self) -> Option<String> {
        match self {
            IdStrategy::ObjectId => None,
            IdStrategy::Uuid => Some(uuid::Uuid::new_v4().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate() {
        assert_eq!(IdStrategy::object_id().generate(), None);

        let id = IdStrategy::uuid().generate().expect("UUID策略应生成ID");
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_ne!(IdStrategy::Uuid.generate(), Some(id));
    }
}
