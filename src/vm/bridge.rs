//! VM桥接层：连接Slint UI与EditorState数据模型
//!
//! 注意：此模块的具体实现在main.rs中，因为依赖于Slint生成的类型
//! 这里只提供公共常量与不依赖 UI 的转换函数

use crate::model::json_type::{JsonType, TypeSet};
use crate::model::node_form::STRING_FORMATS;

// === 常量定义（消除魔法值） ===
pub const WINDOW_TITLE: &str = "JSON Schema Editor";
pub const STATUS_READY: &str = "就绪";
pub const STATUS_NEW: &str = "已新建 Schema";
pub const STATUS_LOADED: &str = "文件加载完成";
pub const STATUS_SAVED: &str = "已保存";
pub const STATUS_UPDATED: &str = "节点已更新";
pub const STATUS_COPIED: &str = "已复制到剪贴板";
pub const STATUS_SCHEMA_VALID: &str = "Schema is valid.";
pub const STATUS_DATA_VALID: &str = "Data fits this schema.";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";

pub const DIALOG_TITLE_FILE: &str = "文件";
pub const DIALOG_TITLE_VALIDATOR: &str = "Validator";
pub const DIALOG_TITLE_SELECTOR: &str = "Selector";

/// 格式下拉框的选项：第 0 项表示“无格式”；
/// 节点上已有的自定义格式追加在末尾，避免更新时被丢弃
pub fn format_options(current: &str) -> Vec<String> {
    let mut options: Vec<String> = std::iter::once("")
        .chain(STRING_FORMATS)
        .map(str::to_string)
        .collect();
    if !options.iter().any(|f| f == current) {
        options.push(current.to_string());
    }
    options
}

/// `format` 取值 → 下拉框下标
pub fn format_index(options: &[String], format: &str) -> i32 {
    options
        .iter()
        .position(|f| f == format)
        .map(|i| i as i32)
        .unwrap_or(0)
}

/// 下拉框下标 → `format` 取值
pub fn format_at(options: &[String], index: i32) -> String {
    usize::try_from(index)
        .ok()
        .and_then(|i| options.get(i))
        .cloned()
        .unwrap_or_default()
}

/// 类型复选框（按 `JsonType::ALL` 顺序）→ 类型集合
pub fn types_from_flags(flags: [bool; 7]) -> TypeSet {
    JsonType::ALL
        .into_iter()
        .zip(flags)
        .filter_map(|(t, on)| on.then_some(t))
        .collect()
}

/// 类型集合 → 类型复选框
pub fn flags_from_types(types: &TypeSet) -> [bool; 7] {
    JsonType::ALL.map(|t| types.contains(t))
}
