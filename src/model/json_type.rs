//! JSON Schema 基本类型与节点的类型选择（`type` 关键字）

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::model::error::EditError;

/// Draft-07 的七种基本类型，顺序即侧栏中的显示顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Boolean,
    Integer,
    Object,
    Array,
    Null,
}

impl JsonType {
    pub const ALL: [JsonType; 7] = [
        JsonType::String,
        JsonType::Number,
        JsonType::Boolean,
        JsonType::Integer,
        JsonType::Object,
        JsonType::Array,
        JsonType::Null,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Boolean => "boolean",
            JsonType::Integer => "integer",
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::Null => "null",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 节点的类型选择：有序、无重复
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSet(Vec<JsonType>);

impl TypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 `type` 关键字的值解析；缺失时为空集合
    ///
    /// 既不是字符串也不是字符串数组时返回 `InvalidType`
    pub fn from_value(value: Option<&Value>) -> Result<Self, EditError> {
        let Some(value) = value else {
            return Ok(Self::new());
        };
        let invalid = || EditError::InvalidType(value.to_string());
        match value {
            Value::String(_) => {
                let t: JsonType = serde_json::from_value(value.clone()).map_err(|_| invalid())?;
                Ok(Self(vec![t]))
            }
            Value::Array(items) => {
                let mut set = Self::new();
                for item in items {
                    let t: JsonType = serde_json::from_value(item.clone()).map_err(|_| invalid())?;
                    set.insert(t);
                }
                Ok(set)
            }
            _ => Err(invalid()),
        }
    }

    /// 读取节点的类型选择
    pub fn of_node(node: &Value) -> Result<Self, EditError> {
        Self::from_value(node.get("type"))
    }

    pub fn insert(&mut self, t: JsonType) {
        if !self.0.contains(&t) {
            self.0.push(t);
        }
    }

    pub fn contains(&self, t: JsonType) -> bool {
        self.0.contains(&t)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 序列化为 `type` 关键字：单个类型写字符串，多个写数组，空集合为 `None`
    pub fn to_value(&self) -> Option<Value> {
        match self.0.as_slice() {
            [] => None,
            [single] => Some(Value::String(single.as_str().to_string())),
            many => Some(Value::Array(
                many.iter()
                    .map(|t| Value::String(t.as_str().to_string()))
                    .collect(),
            )),
        }
    }
}

impl FromIterator<JsonType> for TypeSet {
    fn from_iter<I: IntoIterator<Item = JsonType>>(iter: I) -> Self {
        let mut set = Self::new();
        for t in iter {
            set.insert(t);
        }
        set
    }
}

/// 节点的 `type` 是否包含给定类型；无法识别的 `type` 视为不包含
pub fn is_type(node: &Value, expected: JsonType) -> bool {
    match node.get("type") {
        Some(Value::String(s)) => s == expected.as_str(),
        Some(Value::Array(items)) => items.iter().any(|v| v.as_str() == Some(expected.as_str())),
        _ => false,
    }
}

/// 树视图中的类型列：`a | b`；非法值原样显示
pub fn display_type(node: &Value) -> String {
    match node.get("type") {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(" | "),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_set_from_string_and_list() {
        let single = TypeSet::from_value(Some(&json!("integer"))).unwrap();
        assert!(single.contains(JsonType::Integer));
        assert_eq!(single.to_value(), Some(json!("integer")));

        let many = TypeSet::from_value(Some(&json!(["array", "object", "array"]))).unwrap();
        assert_eq!(many, [JsonType::Array, JsonType::Object].into_iter().collect());
        assert_eq!(many.to_value(), Some(json!(["array", "object"])));
    }

    #[test]
    fn test_type_set_missing_and_invalid() {
        assert!(TypeSet::from_value(None).unwrap().is_empty());
        assert_eq!(TypeSet::new().to_value(), None);

        let err = TypeSet::from_value(Some(&json!(42))).unwrap_err();
        assert!(matches!(err, EditError::InvalidType(_)));
        assert!(TypeSet::from_value(Some(&json!("str"))).is_err(), "未知类型名应该被拒绝");
    }

    #[test]
    fn test_is_type_and_display() {
        let node = json!({"type": ["string", "null"]});
        assert!(is_type(&node, JsonType::String));
        assert!(is_type(&node, JsonType::Null));
        assert!(!is_type(&node, JsonType::Object));
        assert_eq!(display_type(&node), "string | null");

        assert!(!is_type(&json!({}), JsonType::Object));
        assert_eq!(display_type(&json!({})), "");
        assert_eq!(display_type(&json!({"type": 3})), "3");
    }
}
