//! 错误类型：编辑请求被拒绝（EditError）与应用级错误（AppError）

use thiserror::Error;

use crate::model::validation::ValidationReport;

/// 非法的编辑请求；返回此错误时文档保持不变
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("不能{0}根节点")]
    RootNode(&'static str),
    #[error("节点不存在: {0}")]
    NodeNotFound(String),
    #[error("节点不是 JSON 对象，无法编辑: {0}")]
    NotAnObject(String),
    #[error("字段名不能为空")]
    EmptyFieldName,
    #[error("字段名已被同级节点占用: {0}")]
    DuplicateField(String),
    #[error("只能向类型为 \"array\" 或 \"object\" 的节点添加子节点")]
    NotAContainer,
    #[error("节点同时为 \"array\" 与 \"object\"，需要选择添加数组元素还是对象属性")]
    AmbiguousChildKind,
    #[error("数组元素没有字段名，不能{0}")]
    ArrayElement(&'static str),
    #[error("目标节点的类型必须是 \"object\"")]
    DestinationNotObject,
    #[error("目标节点不能是源节点本身或其子节点")]
    DestinationInsideSource,
    #[error("非法的 type 取值: {0}")]
    InvalidType(String),
    #[error("{field} 不是合法的数值: {text}")]
    InvalidNumber { field: &'static str, text: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("文件内容不是 JSON Schema（根节点必须是对象）")]
    NotASchema,
    #[error("{0}")]
    Edit(#[from] EditError),
    #[error("Schema 不合法:\n{0}")]
    InvalidSchema(ValidationReport),
    #[error("状态错误: {0}")]
    State(String),
}
