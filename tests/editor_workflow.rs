//! 集成测试：用 tests/data 下的样例文件走一遍 打开 → 校验 → 编辑 → 保存

use std::path::PathBuf;

use json_schema_editor::model::json_type::JsonType;
use json_schema_editor::model::validation::{format_path, ReportTarget};
use json_schema_editor::{AppError, ChildKind, EditorState, Transfer};
use serde_json::{json, Value};
use tempfile::tempdir;

fn data_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn open(name: &str) -> EditorState {
    let mut state = EditorState::default();
    state.load_file(&data_file(name)).expect("加载样例文件失败");
    state
}

fn row_named(state: &EditorState, name: &str) -> usize {
    state
        .tree_flat
        .iter()
        .position(|n| n.name == name)
        .unwrap_or_else(|| panic!("树中没有 {}", name))
}

#[test]
fn test_open_builds_tree_in_document_order() {
    let state = open("user_profile.json");
    let names: Vec<&str> = state.tree_flat.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "root", "username", "email", "age", "score", "tags", "<element>", "address", "city",
            "zip"
        ]
    );
    let markers: Vec<&str> = state.tree_flat.iter().map(|n| n.marker.as_str()).collect();
    assert_eq!(markers, vec!["*", "*", "", "*", "", "", "E", "", "*", ""]);
    assert_eq!(state.tree_flat[4].type_label, "number | null");
}

#[test]
fn test_self_check_on_sample_schemas() {
    let valid = open("user_profile.json");
    assert!(valid.validate_schema().is_ok(), "样例 Schema 应该合法");

    let invalid = open("invalid_schema.json");
    let report = invalid.validate_schema().unwrap_err();
    assert_eq!(report.target, ReportTarget::Schema);
    let lines = report.lines();
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0].starts_with("At schema[\"properties\"][\"tags\"][\"minItems\"], "),
        "实际为: {}",
        lines[0]
    );
}

#[test]
fn test_validate_sample_data() {
    let state = open("user_profile.json");

    let ok = state.validate_data_file(&data_file("valid_data.json")).unwrap();
    assert!(ok.is_valid(), "合法数据不应报错: {}", ok);

    let report = state.validate_data_file(&data_file("invalid_data.json")).unwrap();
    assert_eq!(report.target, ReportTarget::Instance);
    let paths: Vec<String> = report
        .issues
        .iter()
        .map(|issue| format_path("$", &issue.path))
        .collect();
    assert_eq!(
        paths,
        vec![
            "$[\"address\"]",
            "$[\"address\"][\"zip\"]",
            "$[\"age\"]",
            "$[\"score\"]",
            "$[\"tags\"][1]",
            "$[\"username\"]",
        ],
        "错误应按路径排序"
    );
    assert!(report.lines().iter().all(|l| l.starts_with("At $[") && l.ends_with('.')));

    // 结果可重复
    let again = state.validate_data_file(&data_file("invalid_data.json")).unwrap();
    assert_eq!(again, report);
}

#[test]
fn test_validate_data_with_invalid_schema() {
    let state = open("invalid_schema.json");
    let result = state.validate_data_file(&data_file("valid_data.json"));
    assert!(matches!(result, Err(AppError::InvalidSchema(_))));
}

#[test]
fn test_save_round_trip_is_identical() {
    let mut state = open("user_profile.json");
    let dir = tempdir().expect("创建临时目录失败");
    let target = dir.path().join("copy.json");

    state.save_to_file(&target).expect("保存失败");
    assert_eq!(state.file_path.as_deref(), Some(target.as_path()));

    let original = std::fs::read_to_string(data_file("user_profile.json")).unwrap();
    let saved = std::fs::read_to_string(&target).unwrap();
    assert_eq!(saved, original, "加载后直接保存应逐字节一致");
}

#[test]
fn test_invalid_schema_is_not_saved() {
    let mut state = open("invalid_schema.json");
    let dir = tempdir().expect("创建临时目录失败");
    let target = dir.path().join("never.json");

    let result = state.save_to_file(&target);
    assert!(matches!(result, Err(AppError::InvalidSchema(_))));
    assert!(!target.exists(), "不合法的 Schema 不应写文件");
    assert_eq!(state.file_path, Some(data_file("invalid_schema.json")));
}

#[test]
fn test_edit_then_save_and_reopen() {
    let mut state = open("user_profile.json");

    // 重命名必需字段：required 中原位替换
    state.select_row(row_named(&state, "username")).unwrap();
    let mut form = state.selected_form().unwrap();
    form.field_name = "login".into();
    state.update_selected(&form).unwrap();

    // 给 address 加一个新字段并设为必需的整数
    state.select_row(row_named(&state, "address")).unwrap();
    state
        .add_child_to_selected(ChildKind::ObjectProperty, "floor")
        .unwrap();
    let mut form = state.selected_form().unwrap();
    form.required = true;
    form.types = [JsonType::Integer].into_iter().collect();
    form.minimum = "1".into();
    state.update_selected(&form).unwrap();

    // 把 email 移动到 address 下
    state.select_row(row_named(&state, "email")).unwrap();
    let destinations = state.destination_tree();
    let address_row = destinations
        .iter()
        .position(|n| n.name == "address")
        .unwrap();
    let moved = state
        .transfer_selected(&destinations, address_row, Transfer::Move)
        .unwrap();
    assert_eq!(moved.to_pointer(), "/properties/address/properties/email");

    // 删除 score
    state.select_row(row_named(&state, "score")).unwrap();
    state.delete_selected().unwrap();

    let dir = tempdir().expect("创建临时目录失败");
    let target = dir.path().join("edited.json");
    state.save_to_file(&target).expect("编辑后的 Schema 应该可以保存");

    let mut reopened = EditorState::default();
    reopened.load_file(&target).unwrap();
    let doc: &Value = reopened.document.as_value();

    assert_eq!(doc["required"], json!(["login", "age"]));
    let keys: Vec<&String> = doc["properties"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["login", "age", "tags", "address"], "重命名应保持字段位置");
    assert_eq!(doc["properties"]["login"]["pattern"], json!("^[a-z][a-z0-9_]*$"));

    let address = &doc["properties"]["address"];
    assert_eq!(address["required"], json!(["city", "floor"]));
    assert_eq!(address["properties"]["floor"], json!({"type": "integer", "minimum": 1}));
    assert_eq!(address["properties"]["email"]["format"], json!("email"));

    // 编辑后的 Schema 仍能校验数据
    let report = reopened
        .validate_data_file(&data_file("valid_data.json"))
        .unwrap();
    let paths: Vec<String> = report
        .issues
        .iter()
        .map(|issue| format_path("$", &issue.path))
        .collect();
    assert_eq!(paths, vec!["$", "$[\"address\"]"], "缺少 login 与 floor");
}

#[test]
fn test_move_into_own_descendant_rejected() {
    let mut state = open("user_profile.json");
    state.select_row(row_named(&state, "address")).unwrap();
    let before = state.document.clone();

    let destinations = state.destination_tree();
    let own_row = destinations.iter().position(|n| n.name == "address").unwrap();
    let result = state.transfer_selected(&destinations, own_row, Transfer::Move);
    assert!(matches!(result, Err(AppError::Edit(_))));
    assert_eq!(state.document, before, "被拒绝的移动不应修改文档");
}
