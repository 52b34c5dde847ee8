//! JSON Schema 编辑器库
//!
//! 提供 Draft-07 Schema 文档的加载/保存、树形展示、节点编辑（增删改、移动/复制）
//! 以及委托 `jsonschema` 完成的 Schema 自检与实例数据校验。
//! 遵循MVVM架构模式：model 为纯数据层，UI 绑定在 main.rs 中

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::document::{ChildKind, SchemaDocument, Transfer};
pub use model::editor::EditorState;
pub use model::error::{AppError, EditError};
pub use model::path::{SchemaPath, Step};
pub use model::schema_tree::{build_schema_tree, SchemaTreeNode, TreeFilter};
pub use model::validation::{ValidationIssue, ValidationReport};
