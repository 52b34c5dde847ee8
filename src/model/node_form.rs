//! 侧栏表单：把节点读成一组纯文本/布尔字段，`SchemaDocument::update_node` 再按表单写回

use serde_json::{Number, Value};

use crate::model::error::EditError;
use crate::model::json_type::{is_type, JsonType, TypeSet};
use crate::model::path::{SchemaPath, Step, REQUIRED};

/// 预定义的字符串格式（`format` 关键字）
pub const STRING_FORMATS: [&str; 9] = [
    "date", "time", "date-time", "duration", "email", "hostname", "ipv4", "ipv6", "uuid",
];

/// 节点在文档中的角色，决定哪些表单项可编辑
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Root,
    Property,
    ArrayElement,
}

impl NodeRole {
    pub fn of(path: &SchemaPath) -> Self {
        match path.last() {
            None => NodeRole::Root,
            Some(Step::Property(_)) => NodeRole::Property,
            Some(Step::Items) => NodeRole::ArrayElement,
        }
    }

    /// 字段名与 required 复选框只对具名属性有效
    pub fn has_field_name(self) -> bool {
        self == NodeRole::Property
    }

    pub fn types_editable(self) -> bool {
        self != NodeRole::Root
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeForm {
    pub field_name: String,
    pub required: bool,
    pub types: TypeSet,
    pub description: String,
    pub pattern: String,
    pub format: String,
    pub minimum: String,
    pub exclusive_minimum: bool,
    pub maximum: String,
    pub exclusive_maximum: bool,
    pub multiple_of: String,
    pub min_items: String,
    pub max_items: String,
}

fn text_of(node: &Value, key: &str) -> String {
    match node.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl NodeForm {
    /// 读取节点；`parent` 为父节点（根节点为 `None`），用于判断 required
    pub fn read(path: &SchemaPath, node: &Value, parent: Option<&Value>) -> Result<Self, EditError> {
        let role = NodeRole::of(path);
        let mut form = NodeForm {
            description: text_of(node, "description"),
            ..Default::default()
        };

        if role == NodeRole::Root {
            form.required = true;
            return Ok(form);
        }

        if let Some(name) = path.field_name() {
            form.field_name = name.to_string();
            form.required = parent.map(|p| required_contains(p, name)).unwrap_or(false);
        }

        form.types = TypeSet::of_node(node)?;
        form.pattern = text_of(node, "pattern");
        form.format = text_of(node, "format");

        form.exclusive_minimum = node.get("exclusiveMinimum").is_some();
        form.minimum = if form.exclusive_minimum {
            text_of(node, "exclusiveMinimum")
        } else {
            text_of(node, "minimum")
        };
        form.exclusive_maximum = node.get("exclusiveMaximum").is_some();
        form.maximum = if form.exclusive_maximum {
            text_of(node, "exclusiveMaximum")
        } else {
            text_of(node, "maximum")
        };
        form.multiple_of = text_of(node, "multipleOf");
        form.min_items = text_of(node, "minItems");
        form.max_items = text_of(node, "maxItems");
        Ok(form)
    }

    pub fn is_string(&self) -> bool {
        self.types.contains(JsonType::String)
    }

    pub fn is_numeric(&self) -> bool {
        self.types.contains(JsonType::Number) || self.types.contains(JsonType::Integer)
    }

    pub fn is_array(&self) -> bool {
        self.types.contains(JsonType::Array)
    }

    pub fn is_object(&self) -> bool {
        self.types.contains(JsonType::Object)
    }
}

/// 解析数值输入：空串为 `None`；整数保持整数，其余按浮点
pub fn parse_number(field: &'static str, text: &str) -> Result<Option<Value>, EditError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if let Ok(i) = text.parse::<i64>() {
        return Ok(Some(Value::Number(i.into())));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(|n| Some(Value::Number(n)))
        .ok_or_else(|| EditError::InvalidNumber {
            field,
            text: text.to_string(),
        })
}

/// 解析数组长度输入：非负整数
pub fn parse_count(field: &'static str, text: &str) -> Result<Option<Value>, EditError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<u64>()
        .map(|n| Some(Value::Number(n.into())))
        .map_err(|_| EditError::InvalidNumber {
            field,
            text: text.to_string(),
        })
}

pub(crate) fn required_contains(parent: &Value, name: &str) -> bool {
    parent
        .get(REQUIRED)
        .and_then(Value::as_array)
        .is_some_and(|list| list.iter().any(|v| v.as_str() == Some(name)))
}

/// 节点是否可以拥有属性/元素（用于目标选择器与添加子节点）
pub fn is_container(node: &Value) -> bool {
    is_type(node, JsonType::Object) || is_type(node, JsonType::Array)
}
