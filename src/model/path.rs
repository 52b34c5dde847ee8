//! Schema 路径：从根节点到某个节点的步骤序列
//!
//! 每一步要么是具名属性（键序列 `"properties", 名称`），要么是数组元素（键 `"items"`）。
//! 根节点的路径为空。

use std::fmt;

use serde_json::Value;

use crate::model::error::EditError;

pub const PROPERTIES: &str = "properties";
pub const ITEMS: &str = "items";
pub const REQUIRED: &str = "required";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// `properties` 下的具名字段
    Property(String),
    /// 数组元素（`items`），没有字段名
    Items,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SchemaPath {
    steps: Vec<Step>,
}

impl SchemaPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// 节点的字段名；根节点与数组元素没有字段名
    pub fn field_name(&self) -> Option<&str> {
        match self.steps.last() {
            Some(Step::Property(name)) => Some(name),
            _ => None,
        }
    }

    pub fn child(&self, step: Step) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    pub fn property(&self, name: &str) -> Self {
        self.child(Step::Property(name.to_string()))
    }

    pub fn items(&self) -> Self {
        self.child(Step::Items)
    }

    /// 拆分为父节点路径与最后一步；根节点返回 `None`
    pub fn split_last(&self) -> Option<(SchemaPath, &Step)> {
        let (last, parent) = self.steps.split_last()?;
        Some((Self { steps: parent.to_vec() }, last))
    }

    /// `self` 是否等于 `other` 或位于 `other` 之下
    pub fn starts_with(&self, other: &SchemaPath) -> bool {
        self.steps.starts_with(&other.steps)
    }

    /// 展开为文档中的键序列，如 `["properties", "tags", "items"]`
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.steps.len() * 2);
        for step in &self.steps {
            match step {
                Step::Property(name) => {
                    keys.push(PROPERTIES);
                    keys.push(name.as_str());
                }
                Step::Items => keys.push(ITEMS),
            }
        }
        keys
    }

    /// RFC 6901 JSON Pointer 形式，根节点为空串
    pub fn to_pointer(&self) -> String {
        self.keys()
            .into_iter()
            .map(|k| format!("/{}", k.replace('~', "~0").replace('/', "~1")))
            .collect()
    }

    /// 解析出路径指向的节点
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.steps.iter().try_fold(root, |node, step| match step {
            Step::Property(name) => node.get(PROPERTIES)?.get(name),
            Step::Items => node.get(ITEMS),
        })
    }

    pub fn resolve_mut<'a>(&self, root: &'a mut Value) -> Option<&'a mut Value> {
        self.steps.iter().try_fold(root, |node, step| match step {
            Step::Property(name) => node.get_mut(PROPERTIES)?.get_mut(name),
            Step::Items => node.get_mut(ITEMS),
        })
    }

    /// 与 `resolve` 相同，但不存在时返回 `NodeNotFound`
    pub fn resolve_or_err<'a>(&self, root: &'a Value) -> Result<&'a Value, EditError> {
        self.resolve(root)
            .ok_or_else(|| EditError::NodeNotFound(self.to_string()))
    }

    pub fn resolve_mut_or_err<'a>(&self, root: &'a mut Value) -> Result<&'a mut Value, EditError> {
        let display = self.to_string();
        self.resolve_mut(root).ok_or(EditError::NodeNotFound(display))
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for step in &self.steps {
            match step {
                Step::Property(name) => write!(f, ".{}", name)?,
                Step::Items => f.write_str("[]")?,
            }
        }
        Ok(())
    }
}
