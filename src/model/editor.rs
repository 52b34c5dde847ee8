//! EditorState：应用核心状态，包括当前文档、文件路径、扁平树与选中节点

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::model::document::{ChildKind, SchemaDocument, Transfer};
use crate::model::error::{AppError, EditError};
use crate::model::node_form::NodeForm;
use crate::model::path::SchemaPath;
use crate::model::schema_tree::{
    build_schema_tree, path_of_row, row_of_path, row_paths, set_all_expanded, toggle_expanded,
    update_visibility_by_expansion, SchemaTreeNode, TreeFilter,
};
use crate::model::validation::{check_schema, validate_instance, ValidationReport};
use crate::utils::fs::{read_json_file, write_json_file};

#[derive(Debug)]
pub struct EditorState {
    pub file_path: Option<PathBuf>,
    pub document: SchemaDocument,
    pub tree_flat: Vec<SchemaTreeNode>,
    pub selected: Option<SchemaPath>,
}

impl Default for EditorState {
    fn default() -> Self {
        let document = SchemaDocument::new();
        let tree_flat = build_schema_tree(document.as_value(), TreeFilter::All);
        Self {
            file_path: None,
            document,
            tree_flat,
            selected: None,
        }
    }
}

impl EditorState {
    /// 新建文档（默认骨架），清空文件路径与选中状态
    pub fn new_document(&mut self) {
        *self = Self::default();
    }

    /// 加载 Schema 文件；失败时状态保持不变
    pub fn load_file(&mut self, p: &Path) -> Result<(), AppError> {
        let value = read_json_file(p)?;
        let document = SchemaDocument::from_value(value)?;
        self.tree_flat = build_schema_tree(document.as_value(), TreeFilter::All);
        self.document = document;
        self.file_path = Some(p.to_path_buf());
        self.selected = None;
        Ok(())
    }

    /// 自检通过后保存到指定路径，并记为当前文件
    pub fn save_to_file(&mut self, p: &Path) -> Result<(), AppError> {
        check_schema(self.document.as_value()).map_err(AppError::InvalidSchema)?;
        write_json_file(p, self.document.as_value())?;
        self.file_path = Some(p.to_path_buf());
        Ok(())
    }

    /// 保存到当前文件路径
    pub fn save(&mut self) -> Result<(), AppError> {
        let path = self
            .file_path
            .clone()
            .ok_or_else(|| AppError::State("尚未设置保存路径".into()))?;
        self.save_to_file(&path)
    }

    /// 重建树；保留折叠状态
    pub fn refresh_tree(&mut self) {
        let collapsed: HashSet<SchemaPath> = row_paths(&self.tree_flat)
            .into_iter()
            .zip(&self.tree_flat)
            .filter(|(_, node)| !node.expanded)
            .map(|(path, _)| path)
            .collect();
        self.tree_flat = build_schema_tree(self.document.as_value(), TreeFilter::All);
        if !collapsed.is_empty() {
            let paths = row_paths(&self.tree_flat);
            for (node, path) in self.tree_flat.iter_mut().zip(&paths) {
                if collapsed.contains(path) {
                    node.expanded = false;
                }
            }
        }
        update_visibility_by_expansion(&mut self.tree_flat);
    }

    /// 移动/复制目标选择器用的树（只含 object/array 节点）
    pub fn destination_tree(&self) -> Vec<SchemaTreeNode> {
        build_schema_tree(self.document.as_value(), TreeFilter::ContainersOnly)
    }

    pub fn toggle_node_expanded(&mut self, row: usize) {
        toggle_expanded(&mut self.tree_flat, row);
    }

    pub fn set_all_expanded(&mut self, expanded: bool) {
        set_all_expanded(&mut self.tree_flat, expanded);
    }

    /// 选中树中的一行，返回其路径
    pub fn select_row(&mut self, row: usize) -> Result<SchemaPath, AppError> {
        let path = path_of_row(&self.tree_flat, row)
            .ok_or_else(|| AppError::State(format!("行号越界: {}", row)))?;
        self.selected = Some(path.clone());
        Ok(path)
    }

    /// 当前选中节点所在行
    pub fn selected_row(&self) -> Option<usize> {
        self.selected
            .as_ref()
            .and_then(|p| row_of_path(&self.tree_flat, p))
    }

    pub fn selected_path(&self) -> Result<&SchemaPath, AppError> {
        self.selected
            .as_ref()
            .ok_or_else(|| AppError::State("未选中任何节点".into()))
    }

    pub fn selected_form(&self) -> Result<NodeForm, AppError> {
        let path = self.selected_path()?;
        Ok(self.document.read_form(path)?)
    }

    /// 选中节点添加子节点时的角色；`AmbiguousChildKind` 需要用户选择
    pub fn selected_child_kind(&self) -> Result<ChildKind, AppError> {
        let path = self.selected_path()?;
        Ok(self.document.child_kind(path)?)
    }

    /// 向选中节点添加子节点，并选中新节点
    pub fn add_child_to_selected(&mut self, kind: ChildKind, name: &str) -> Result<SchemaPath, AppError> {
        let path = self.selected_path()?.clone();
        let child = self.document.add_child(&path, kind, name)?;
        self.after_edit(Some(child.clone()));
        Ok(child)
    }

    pub fn delete_selected(&mut self) -> Result<SchemaPath, AppError> {
        let path = self.selected_path()?.clone();
        self.document.delete_node(&path)?;
        self.after_edit(None);
        Ok(path)
    }

    /// 把表单写回选中节点；重命名后选中新路径
    pub fn update_selected(&mut self, form: &NodeForm) -> Result<SchemaPath, AppError> {
        let path = self.selected_path()?.clone();
        let new_path = self.document.update_node(&path, form)?;
        self.after_edit(Some(new_path.clone()));
        Ok(new_path)
    }

    /// 把选中节点复制/移动到目标选择器中的某一行
    pub fn transfer_selected(
        &mut self,
        destination_tree: &[SchemaTreeNode],
        destination_row: usize,
        mode: Transfer,
    ) -> Result<SchemaPath, AppError> {
        let source = self.selected_path()?.clone();
        let destination = path_of_row(destination_tree, destination_row)
            .ok_or_else(|| AppError::State("未选择目标节点".into()))?;
        let new_path = self.document.transfer_node(&source, &destination, mode)?;
        let keep = match mode {
            Transfer::Move => new_path.clone(),
            Transfer::Copy => source,
        };
        self.after_edit(Some(keep));
        Ok(new_path)
    }

    pub fn validate_schema(&self) -> Result<(), ValidationReport> {
        check_schema(self.document.as_value())
    }

    /// 读取实例数据文件并用当前 Schema 校验
    pub fn validate_data_file(&self, p: &Path) -> Result<ValidationReport, AppError> {
        let instance = read_json_file(p)?;
        validate_instance(self.document.as_value(), &instance)
    }

    pub fn selected_pretty(&self) -> Result<String, AppError> {
        let path = self.selected_path()?;
        self.document.node_pretty(path)
    }

    fn after_edit(&mut self, selection: Option<SchemaPath>) {
        self.selected = selection;
        self.refresh_tree();
    }
}

/// 方便 UI 判断是否需要弹出角色选择
pub fn needs_child_kind_choice(err: &AppError) -> bool {
    matches!(err, AppError::Edit(EditError::AmbiguousChildKind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::json_type::JsonType;
    use crate::model::path::Step;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// 创建临时JSON文件用于测试
    fn create_test_json_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(content.as_bytes()).expect("写入临时文件失败");
        file
    }

    const PROFILE: &str = r#"{
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "hobbies": {"type": ["array", "object"]}
        },
        "required": ["name"]
    }"#;

    fn loaded() -> (EditorState, NamedTempFile) {
        let file = create_test_json_file(PROFILE);
        let mut state = EditorState::default();
        state.load_file(file.path()).expect("加载文件失败");
        (state, file)
    }

    #[test]
    fn test_default_state() {
        let state = EditorState::default();
        assert_eq!(state.tree_flat.len(), 1);
        assert!(state.file_path.is_none());
        assert!(state.validate_schema().is_ok());
    }

    #[test]
    fn test_load_file() {
        let (state, file) = loaded();
        assert_eq!(state.file_path.as_deref(), Some(file.path()));
        assert_eq!(state.tree_flat.len(), 3, "应该有3行：根、name、hobbies");
    }

    #[test]
    fn test_load_failures_keep_state() {
        let (mut state, _file) = loaded();
        let before = state.document.clone();

        let broken = create_test_json_file(r#"{"invalid": json content}"#);
        assert!(matches!(state.load_file(broken.path()), Err(AppError::Parse(_))));

        let not_schema = create_test_json_file("[1, 2, 3]");
        assert!(matches!(state.load_file(not_schema.path()), Err(AppError::NotASchema)));

        assert!(matches!(
            state.load_file(Path::new("/definitely/not/here.json")),
            Err(AppError::Io(_))
        ));
        assert_eq!(state.document, before);
    }

    #[test]
    fn test_select_and_read_form() {
        let (mut state, _file) = loaded();
        assert!(matches!(state.selected_form(), Err(AppError::State(_))));

        let path = state.select_row(1).unwrap();
        assert_eq!(path.last(), Some(&Step::Property("name".into())));
        let form = state.selected_form().unwrap();
        assert_eq!(form.field_name, "name");
        assert!(form.required);
        assert_eq!(state.selected_row(), Some(1));
        assert!(state.select_row(42).is_err());
    }

    #[test]
    fn test_add_child_requires_choice_when_ambiguous() {
        let (mut state, _file) = loaded();
        state.select_row(2).unwrap();
        let err = state.selected_child_kind().unwrap_err();
        assert!(needs_child_kind_choice(&err), "array+object 应该要求用户选择");

        let child = state
            .add_child_to_selected(ChildKind::ObjectProperty, "first")
            .unwrap();
        assert_eq!(state.selected.as_ref(), Some(&child));
        let names: Vec<&str> = state.tree_flat.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["root", "name", "hobbies", "first"]);
    }

    #[test]
    fn test_update_and_delete_refresh_tree() {
        let (mut state, _file) = loaded();
        state.select_row(1).unwrap();
        let mut form = state.selected_form().unwrap();
        form.field_name = "nickname".into();
        form.types = [JsonType::String, JsonType::Null].into_iter().collect();
        let path = state.update_selected(&form).unwrap();
        assert_eq!(path.field_name(), Some("nickname"));
        assert_eq!(state.tree_flat[1].name, "nickname");
        assert_eq!(state.tree_flat[1].marker, "*");
        assert_eq!(state.tree_flat[1].type_label, "string | null");

        state.delete_selected().unwrap();
        assert!(state.selected.is_none());
        assert_eq!(state.tree_flat.len(), 2);
        assert_eq!(state.document.as_value()["required"], json!([]));
    }

    #[test]
    fn test_refresh_keeps_collapsed_rows() {
        let (mut state, _file) = loaded();
        state.select_row(2).unwrap();
        state.add_child_to_selected(ChildKind::ArrayItems, "").unwrap();
        state.toggle_node_expanded(2);
        assert!(!state.tree_flat[3].visible);

        state.select_row(1).unwrap();
        let form = state.selected_form().unwrap();
        state.update_selected(&form).unwrap();
        assert!(!state.tree_flat[2].expanded, "刷新后折叠状态应该保留");
        assert!(!state.tree_flat[3].visible);
    }

    #[test]
    fn test_transfer_selected() {
        let (mut state, _file) = loaded();
        state.select_row(1).unwrap();
        let destinations = state.destination_tree();
        let names: Vec<&str> = destinations.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["root", "hobbies"]);

        let moved = state.transfer_selected(&destinations, 1, Transfer::Move).unwrap();
        assert_eq!(moved.to_pointer(), "/properties/hobbies/properties/name");
        assert_eq!(state.document.as_value()["required"], json!([]));
        assert_eq!(
            state.document.as_value()["properties"]["hobbies"]["required"],
            json!(["name"])
        );
    }

    #[test]
    fn test_save_blocked_by_invalid_schema() {
        let (mut state, file) = loaded();
        state.select_row(1).unwrap();
        let mut form = state.selected_form().unwrap();
        form.min_items = "2".into();
        form.types = [JsonType::Array].into_iter().collect();
        state.update_selected(&form).unwrap();
        assert!(state.save().is_ok());

        // 手工写入非法取值，模拟不合法文档
        let invalid = json!({"type": "object", "properties": {"a": {"minItems": -1}}});
        state.document = SchemaDocument::from_value(invalid).unwrap();
        let on_disk = std::fs::read_to_string(file.path()).unwrap();
        let result = state.save();
        assert!(matches!(result, Err(AppError::InvalidSchema(_))));
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), on_disk, "不合法时不应写文件");
    }

    #[test]
    fn test_save_then_close_document() {
        let (mut state, _file) = loaded();
        state.select_row(1).unwrap();
        state.save().expect("保存失败");

        state.new_document();
        assert!(state.file_path.is_none(), "关闭后不应保留文件路径");
        assert!(state.selected.is_none());
        assert_eq!(state.tree_flat.len(), 1, "新文档只有根节点");
        assert_eq!(state.document, SchemaDocument::new());
    }

    #[test]
    fn test_save_without_path() {
        let mut state = EditorState::default();
        assert!(matches!(state.save(), Err(AppError::State(_))));
    }

    #[test]
    fn test_validate_data_file() {
        let (state, _file) = loaded();
        let good = create_test_json_file(r#"{"name": "张三"}"#);
        assert!(state.validate_data_file(good.path()).unwrap().is_valid());

        let bad = create_test_json_file(r#"{"name": 1}"#);
        let report = state.validate_data_file(bad.path()).unwrap();
        assert_eq!(report.lines().len(), 1);
        assert!(report.lines()[0].starts_with("At $[\"name\"], "));
    }
}
