//! SchemaDocument：内存中的 JSON Schema 文档及其节点编辑操作
//!
//! 所有编辑都先校验请求，再修改文档；返回 `EditError` 时文档保持原样。
//! `required` 按有序集合维护：保持插入顺序、不重复、重命名时原位替换。

use serde_json::{json, Map, Value};

use crate::model::error::{AppError, EditError};
use crate::model::json_type::{is_type, JsonType};
use crate::model::node_form::{parse_count, parse_number, required_contains, NodeForm, NodeRole};
use crate::model::path::{SchemaPath, Step, ITEMS, PROPERTIES, REQUIRED};

pub const DRAFT_07_URI: &str = "http://json-schema.org/draft-07/schema#";

/// 向节点添加子节点时的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    /// 数组元素（`items`）
    ArrayItems,
    /// 对象属性（`properties` 下的新字段）
    ObjectProperty,
}

/// 复制或移动
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Copy,
    Move,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    root: Value,
}

impl Default for SchemaDocument {
    /// 新建文档的默认骨架
    fn default() -> Self {
        Self {
            root: json!({
                "$schema": DRAFT_07_URI,
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }
}

fn object_mut<'a>(node: &'a mut Value, path: &SchemaPath) -> Result<&'a mut Map<String, Value>, EditError> {
    node.as_object_mut()
        .ok_or_else(|| EditError::NotAnObject(path.to_string()))
}

fn required_insert(parent: &mut Map<String, Value>, name: &str) {
    let list = parent
        .entry(REQUIRED)
        .or_insert_with(|| Value::Array(Vec::new()));
    if !list.is_array() {
        *list = Value::Array(Vec::new());
    }
    if let Value::Array(items) = list {
        if !items.iter().any(|v| v.as_str() == Some(name)) {
            items.push(Value::String(name.to_string()));
        }
    }
}

fn required_remove(parent: &mut Map<String, Value>, name: &str) {
    if let Some(Value::Array(items)) = parent.get_mut(REQUIRED) {
        items.retain(|v| v.as_str() != Some(name));
    }
}

fn required_rename(parent: &mut Map<String, Value>, old: &str, new: &str) {
    if let Some(Value::Array(items)) = parent.get_mut(REQUIRED) {
        let mut seen_new = items.iter().any(|v| v.as_str() == Some(new));
        items.retain_mut(|v| {
            if v.as_str() == Some(old) {
                if seen_new {
                    return false;
                }
                *v = Value::String(new.to_string());
                seen_new = true;
            }
            true
        });
    }
}

/// 在保持键位置的前提下重命名
fn rename_key(map: &mut Map<String, Value>, old: &str, new: &str) {
    let entries = std::mem::take(map);
    for (key, value) in entries {
        if key == old {
            map.insert(new.to_string(), value);
        } else {
            map.insert(key, value);
        }
    }
}

fn set_or_remove(node: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    match value {
        Some(v) => {
            node.insert(key.to_string(), v);
        }
        None => {
            node.shift_remove(key);
        }
    }
}

fn non_empty(text: &str) -> Option<Value> {
    if text.is_empty() {
        None
    } else {
        Some(Value::String(text.to_string()))
    }
}

impl SchemaDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// 接收已解析的 JSON；根节点必须是对象
    pub fn from_value(root: Value) -> Result<Self, AppError> {
        if !root.is_object() {
            return Err(AppError::NotASchema);
        }
        Ok(Self { root })
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn node(&self, path: &SchemaPath) -> Result<&Value, EditError> {
        path.resolve_or_err(&self.root)
    }

    /// 节点是否在父节点的 required 中；根节点视为必需
    pub fn is_required(&self, path: &SchemaPath) -> bool {
        let Some((parent_path, Step::Property(name))) = path.split_last() else {
            return path.is_root();
        };
        parent_path
            .resolve(&self.root)
            .is_some_and(|parent| required_contains(parent, name))
    }

    /// 读取节点到侧栏表单
    pub fn read_form(&self, path: &SchemaPath) -> Result<NodeForm, EditError> {
        let node = self.node(path)?;
        let parent = path
            .split_last()
            .and_then(|(parent_path, _)| parent_path.resolve(&self.root));
        NodeForm::read(path, node, parent)
    }

    /// 判断向节点添加子节点时的角色
    ///
    /// 同时为 array 与 object 时返回 `AmbiguousChildKind`，调用方需让用户明确选择
    pub fn child_kind(&self, path: &SchemaPath) -> Result<ChildKind, EditError> {
        let node = self.node(path)?;
        match (is_type(node, JsonType::Array), is_type(node, JsonType::Object)) {
            (true, true) => Err(EditError::AmbiguousChildKind),
            (true, false) => Ok(ChildKind::ArrayItems),
            (false, true) => Ok(ChildKind::ObjectProperty),
            (false, false) => Err(EditError::NotAContainer),
        }
    }

    /// 为数组节点确保存在 `items`，返回元素路径
    pub fn add_items(&mut self, path: &SchemaPath) -> Result<SchemaPath, EditError> {
        let node = path.resolve_mut_or_err(&mut self.root)?;
        if !is_type(node, JsonType::Array) {
            return Err(EditError::NotAContainer);
        }
        object_mut(node, path)?
            .entry(ITEMS)
            .or_insert_with(|| json!({}));
        Ok(path.items())
    }

    /// 为对象节点添加一个空属性，返回新属性路径
    pub fn add_property(&mut self, path: &SchemaPath, name: &str) -> Result<SchemaPath, EditError> {
        if name.is_empty() {
            return Err(EditError::EmptyFieldName);
        }
        let node = path.resolve_mut_or_err(&mut self.root)?;
        if !is_type(node, JsonType::Object) {
            return Err(EditError::NotAContainer);
        }
        let obj = object_mut(node, path)?;
        let props = obj
            .entry(PROPERTIES)
            .or_insert_with(|| Value::Object(Map::new()));
        let props = props
            .as_object_mut()
            .ok_or_else(|| EditError::NotAnObject(format!("{}.{}", path, PROPERTIES)))?;
        if props.contains_key(name) {
            return Err(EditError::DuplicateField(name.to_string()));
        }
        props.insert(name.to_string(), json!({}));
        Ok(path.property(name))
    }

    /// 按明确的角色添加子节点
    pub fn add_child(&mut self, path: &SchemaPath, kind: ChildKind, name: &str) -> Result<SchemaPath, EditError> {
        match kind {
            ChildKind::ArrayItems => self.add_items(path),
            ChildKind::ObjectProperty => self.add_property(path, name),
        }
    }

    /// 删除节点；属性同时从父节点的 required 中移除
    pub fn delete_node(&mut self, path: &SchemaPath) -> Result<(), EditError> {
        let Some((parent_path, step)) = path.split_last() else {
            return Err(EditError::RootNode("删除"));
        };
        // 先确认节点存在，保证失败时不修改文档
        self.node(path)?;
        let parent = parent_path.resolve_mut_or_err(&mut self.root)?;
        let parent = object_mut(parent, &parent_path)?;
        match step {
            Step::Property(name) => {
                if let Some(Value::Object(props)) = parent.get_mut(PROPERTIES) {
                    props.shift_remove(name);
                }
                required_remove(parent, name);
            }
            Step::Items => {
                parent.shift_remove(ITEMS);
            }
        }
        Ok(())
    }

    /// 把侧栏表单写回节点，返回（可能因重命名而改变的）节点路径
    pub fn update_node(&mut self, path: &SchemaPath, form: &NodeForm) -> Result<SchemaPath, EditError> {
        let role = NodeRole::of(path);
        if role == NodeRole::Root {
            let root = object_mut(&mut self.root, path)?;
            set_or_remove(root, "description", non_empty(&form.description));
            return Ok(path.clone());
        }

        // 校验阶段：全部输入合法后才开始修改
        self.node(path)?;
        let bound = |text: &str, exclusive: bool, plain: &'static str, excl: &'static str| {
            parse_number(if exclusive { excl } else { plain }, text)
        };
        let minimum = bound(&form.minimum, form.exclusive_minimum, "minimum", "exclusiveMinimum")?;
        let maximum = bound(&form.maximum, form.exclusive_maximum, "maximum", "exclusiveMaximum")?;
        let multiple_of = parse_number("multipleOf", &form.multiple_of)?;
        let min_items = parse_count("minItems", &form.min_items)?;
        let max_items = parse_count("maxItems", &form.max_items)?;

        let rename = match path.last() {
            Some(Step::Property(old)) => {
                let new = form.field_name.trim();
                if new.is_empty() {
                    return Err(EditError::EmptyFieldName);
                }
                if new != old {
                    let (parent_path, _) = path.split_last().ok_or(EditError::RootNode("重命名"))?;
                    let parent = self.node(&parent_path)?;
                    if parent
                        .get(PROPERTIES)
                        .is_some_and(|props| props.get(new).is_some())
                    {
                        return Err(EditError::DuplicateField(new.to_string()));
                    }
                }
                Some((old.clone(), new.to_string()))
            }
            _ => None,
        };

        // 修改节点本身
        let node = path.resolve_mut_or_err(&mut self.root)?;
        let node = object_mut(node, path)?;
        set_or_remove(node, "type", form.types.to_value());
        set_or_remove(node, "description", non_empty(&form.description));

        if form.is_string() {
            set_or_remove(node, "pattern", non_empty(&form.pattern));
            set_or_remove(node, "format", non_empty(&form.format));
        }

        if form.is_numeric() {
            let (min_key, min_other) = if form.exclusive_minimum {
                ("exclusiveMinimum", "minimum")
            } else {
                ("minimum", "exclusiveMinimum")
            };
            node.shift_remove(min_other);
            set_or_remove(node, min_key, minimum);

            let (max_key, max_other) = if form.exclusive_maximum {
                ("exclusiveMaximum", "maximum")
            } else {
                ("maximum", "exclusiveMaximum")
            };
            node.shift_remove(max_other);
            set_or_remove(node, max_key, maximum);

            set_or_remove(node, "multipleOf", multiple_of);
        }

        if form.is_array() {
            set_or_remove(node, "minItems", min_items);
            set_or_remove(node, "maxItems", max_items);
        } else {
            node.shift_remove(ITEMS);
        }

        if !form.is_object() {
            node.shift_remove(PROPERTIES);
            node.shift_remove(REQUIRED);
        }

        // 重命名与 required 维护在父节点上进行
        let Some((old, new)) = rename else {
            return Ok(path.clone());
        };
        let (parent_path, _) = path.split_last().ok_or(EditError::RootNode("重命名"))?;
        let parent = parent_path.resolve_mut_or_err(&mut self.root)?;
        let parent = object_mut(parent, &parent_path)?;
        if old != new {
            if let Some(Value::Object(props)) = parent.get_mut(PROPERTIES) {
                rename_key(props, &old, &new);
            }
            required_rename(parent, &old, &new);
        }
        if form.required {
            required_insert(parent, &new);
        } else {
            required_remove(parent, &new);
        }
        Ok(parent_path.property(&new))
    }

    /// 把具名属性复制或移动到一个 object 类型节点下，返回新路径
    pub fn transfer_node(
        &mut self,
        source: &SchemaPath,
        destination: &SchemaPath,
        mode: Transfer,
    ) -> Result<SchemaPath, EditError> {
        let Some((_, step)) = source.split_last() else {
            return Err(EditError::RootNode("移动或复制"));
        };
        let Step::Property(name) = step else {
            return Err(EditError::ArrayElement("移动或复制"));
        };
        let node = self.node(source)?.clone();
        let dest = self.node(destination)?;
        if !is_type(dest, JsonType::Object) {
            return Err(EditError::DestinationNotObject);
        }
        if destination.starts_with(source) {
            return Err(EditError::DestinationInsideSource);
        }
        if dest
            .get(PROPERTIES)
            .is_some_and(|props| props.get(name.as_str()).is_some())
        {
            return Err(EditError::DuplicateField(name.clone()));
        }
        let was_required = self.is_required(source);

        if mode == Transfer::Move {
            self.delete_node(source)?;
        }

        let dest = destination.resolve_mut_or_err(&mut self.root)?;
        let dest = object_mut(dest, destination)?;
        let props = dest
            .entry(PROPERTIES)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(props) = props {
            props.insert(name.clone(), node);
        }
        if was_required {
            required_insert(dest, name);
        }
        tracing::debug!("{:?} {} -> {}", mode, source.to_pointer(), destination.to_pointer());
        Ok(destination.property(name))
    }

    /// 选中节点的格式化 JSON（复制到剪贴板用）
    pub fn node_pretty(&self, path: &SchemaPath) -> Result<String, AppError> {
        let node = self.node(path)?;
        Ok(serde_json::to_string_pretty(node)?)
    }
}
