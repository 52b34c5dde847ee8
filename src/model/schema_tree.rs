//! Schema 树：把 Schema 文档展开为先序排列的扁平行，供 UI 列表直接渲染
//!
//! 行只保存显示信息与层级；路径通过沿深度向上回溯祖先行重建。

use serde_json::Value;

use crate::model::json_type::display_type;
use crate::model::node_form::{is_container, required_contains};
use crate::model::path::{SchemaPath, Step, ITEMS, PROPERTIES};

pub const ROOT_LABEL: &str = "root";
pub const ELEMENT_LABEL: &str = "<element>";
pub const REQUIRED_MARK: &str = "*";
pub const ELEMENT_MARK: &str = "E";

/// 行在父节点中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Root,
    Property,
    Element,
}

#[derive(Debug, Clone)]
pub struct SchemaTreeNode {
    /// 字段名；根节点为 `root`，数组元素为 `<element>`
    pub name: String,
    pub kind: RowKind,
    /// `*` 必需字段（含根节点），`E` 数组元素
    pub marker: String,
    /// 类型列（`a | b`）
    pub type_label: String,
    pub description: String,
    /// 节点深度（用于UI缩进显示）
    pub depth: u32,
    /// 是否有子行
    pub expandable: bool,
    /// 是否展开（用于折叠/展开功能）
    pub expanded: bool,
    /// 是否可见（祖先全部展开时可见）
    pub visible: bool,
}

/// 构建方式：完整树，或只保留 object/array 节点（移动/复制的目标选择器）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFilter {
    All,
    ContainersOnly,
}

/// 从根 Value 构建全树，所有行默认展开
pub fn build_schema_tree(root: &Value, filter: TreeFilter) -> Vec<SchemaTreeNode> {
    fn walk(
        out: &mut Vec<SchemaTreeNode>,
        node: &Value,
        name: &str,
        kind: RowKind,
        required: bool,
        depth: u32,
        filter: TreeFilter,
    ) {
        if filter == TreeFilter::ContainersOnly && kind != RowKind::Root && !is_container(node) {
            return;
        }
        let marker = match kind {
            RowKind::Root => REQUIRED_MARK,
            RowKind::Element => ELEMENT_MARK,
            RowKind::Property if required => REQUIRED_MARK,
            RowKind::Property => "",
        };
        let index = out.len();
        out.push(SchemaTreeNode {
            name: name.to_string(),
            kind,
            marker: marker.to_string(),
            type_label: display_type(node),
            description: node
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            depth,
            expandable: false,
            expanded: true,
            visible: true,
        });

        if let Some(Value::Object(props)) = node.get(PROPERTIES) {
            for (field, child) in props {
                let required = required_contains(node, field);
                walk(out, child, field, RowKind::Property, required, depth + 1, filter);
            }
        }
        if let Some(items) = node.get(ITEMS).filter(|v| v.is_object()) {
            walk(out, items, ELEMENT_LABEL, RowKind::Element, false, depth + 1, filter);
        }
        out[index].expandable = out.len() > index + 1;
    }

    let mut out = Vec::with_capacity(64);
    walk(&mut out, root, ROOT_LABEL, RowKind::Root, true, 0, filter);
    out
}

/// 由行号重建路径：沿深度向上找到每一层祖先
pub fn path_of_row(tree: &[SchemaTreeNode], row: usize) -> Option<SchemaPath> {
    let node = tree.get(row)?;
    let mut steps = Vec::with_capacity(node.depth as usize);
    let mut wanted_depth = node.depth;
    for current in tree[..=row].iter().rev() {
        if current.depth != wanted_depth {
            continue;
        }
        match current.kind {
            RowKind::Root => break,
            RowKind::Property => steps.push(Step::Property(current.name.clone())),
            RowKind::Element => steps.push(Step::Items),
        }
        wanted_depth -= 1;
    }
    steps.reverse();
    Some(SchemaPath::from_steps(steps))
}

/// 先序遍历时维护当前行的步骤栈：截到父层深度再压入本行
fn advance(steps: &mut Vec<Step>, node: &SchemaTreeNode) {
    steps.truncate((node.depth as usize).saturating_sub(1));
    match node.kind {
        RowKind::Root => steps.clear(),
        RowKind::Property => steps.push(Step::Property(node.name.clone())),
        RowKind::Element => steps.push(Step::Items),
    }
}

/// 一次遍历得到每一行的路径
pub fn row_paths(tree: &[SchemaTreeNode]) -> Vec<SchemaPath> {
    let mut steps = Vec::new();
    tree.iter()
        .map(|node| {
            advance(&mut steps, node);
            SchemaPath::from_steps(steps.clone())
        })
        .collect()
}

/// 由路径找到行号
pub fn row_of_path(tree: &[SchemaTreeNode], path: &SchemaPath) -> Option<usize> {
    let mut steps = Vec::new();
    tree.iter().position(|node| {
        advance(&mut steps, node);
        steps.as_slice() == path.steps()
    })
}

/// 切换某一行的展开状态
pub fn toggle_expanded(tree: &mut [SchemaTreeNode], row: usize) {
    if let Some(node) = tree.get_mut(row) {
        node.expanded = !node.expanded;
    }
    update_visibility_by_expansion(tree);
}

/// 全部展开或全部折叠（根节点保持展开）
pub fn set_all_expanded(tree: &mut [SchemaTreeNode], expanded: bool) {
    for (i, node) in tree.iter_mut().enumerate() {
        node.expanded = expanded || i == 0;
    }
    update_visibility_by_expansion(tree);
}

/// 根据展开状态更新节点可见性
pub fn update_visibility_by_expansion(tree: &mut [SchemaTreeNode]) {
    // 记录每一层最近祖先是否展开且可见
    let mut open_at_depth: Vec<bool> = Vec::new();
    for node in tree.iter_mut() {
        let depth = node.depth as usize;
        node.visible = depth == 0 || open_at_depth.get(depth - 1).copied().unwrap_or(false);
        open_at_depth.truncate(depth);
        open_at_depth.push(node.visible && node.expanded);
    }
}
