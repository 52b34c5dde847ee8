//! 程序入口：解析命令行、初始化日志、加载 Slint UI 并绑定 VM 回调

use std::{
    cell::{Cell, RefCell},
    path::{Path, PathBuf},
    rc::Rc,
};

use clap::Parser;
use slint::{ComponentHandle, ModelRc, SharedString, VecModel};
use tracing_subscriber::fmt::SubscriberBuilder;

use json_schema_editor::model::editor::needs_child_kind_choice;
use json_schema_editor::model::node_form::{NodeForm, NodeRole};
use json_schema_editor::utils::clipboard::copy_to_clipboard;
use json_schema_editor::vm::bridge::*;
use json_schema_editor::{AppError, ChildKind, EditorState, SchemaTreeNode, Transfer};

slint::include_modules!();

/// Draft-07 JSON Schema 图形编辑器
#[derive(Parser, Debug)]
#[command(name = "json-schema-editor", version, about)]
struct Cli {
    /// 启动时打开的 Schema 文件
    schema: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

// TreeNodeData转换实现：row 为行在完整扁平树中的下标
impl From<(usize, &SchemaTreeNode)> for TreeNodeData {
    fn from((row, node): (usize, &SchemaTreeNode)) -> Self {
        Self {
            name: node.name.clone().into(),
            marker: node.marker.clone().into(),
            kind: node.type_label.clone().into(),
            description: node.description.clone().into(),
            depth: node.depth as i32,
            expandable: node.expandable,
            expanded: node.expanded,
            row: row as i32,
        }
    }
}

/// 只保留可见行
fn tree_rows(tree: &[SchemaTreeNode]) -> Vec<TreeNodeData> {
    tree.iter()
        .enumerate()
        .filter(|(_, node)| node.visible)
        .map(TreeNodeData::from)
        .collect()
}

/// VM桥接器：管理UI与数据层的交互
struct ViewModelBridge {
    app_state: Rc<RefCell<EditorState>>,
    // 移动/复制对话框打开期间的待定操作
    pending_transfer: Rc<Cell<Transfer>>,
    destination_tree: Rc<RefCell<Vec<SchemaTreeNode>>>,
}

impl ViewModelBridge {
    /// 创建新的VM桥接器并绑定所有回调
    fn new(app_window: &AppWindow, app_state: Rc<RefCell<EditorState>>) -> Self {
        let bridge = Self {
            app_state,
            pending_transfer: Rc::new(Cell::new(Transfer::Copy)),
            destination_tree: Rc::new(RefCell::new(Vec::new())),
        };
        bridge.setup_callbacks(app_window);
        bridge
    }

    /// 设置所有UI回调函数
    fn setup_callbacks(&self, app_window: &AppWindow) {
        let app_state = self.app_state.clone();

        // === 文件操作 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_new_file(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_new_file(&app_window, &app_state);
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_open_file(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    if let Some(path) = Self::show_open_dialog("打开 Schema 文件") {
                        Self::handle_open_file(&app_window, &app_state, &path);
                    }
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_save_file(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_save(&app_window, &app_state, false);
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_save_as_file(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_save(&app_window, &app_state, true);
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_save_and_close(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    // 关闭的是文档：保存成功后回到新建状态
                    if Self::handle_save(&app_window, &app_state, false) {
                        Self::handle_new_file(&app_window, &app_state);
                    }
                }
            });
        }

        // === 树操作 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_node_selected(move |row| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_node_selected(&app_window, &app_state, row);
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_toggle_node_expanded(move |row| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    if let Ok(row) = usize::try_from(row) {
                        app_state.borrow_mut().toggle_node_expanded(row);
                        Self::rebuild_tree_model(&app_window, &app_state);
                    }
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_expand_all(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    app_state.borrow_mut().set_all_expanded(true);
                    Self::rebuild_tree_model(&app_window, &app_state);
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_collapse_all(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    app_state.borrow_mut().set_all_expanded(false);
                    Self::rebuild_tree_model(&app_window, &app_state);
                }
            });
        }

        // === 节点编辑 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_update_node(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_update_node(&app_window, &app_state);
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_add_child(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_add_child(&app_window, &app_state);
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_child_kind_chosen(move |array_element| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    app_window.set_choice_visible(false);
                    if array_element {
                        Self::add_child(&app_window, &app_state, ChildKind::ArrayItems, "");
                    } else {
                        Self::show_prompt(&app_window);
                    }
                }
            });
        }
        {
            let app_window_weak = app_window.as_weak();
            app_window.on_choice_cancelled(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    app_window.set_choice_visible(false);
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_prompt_accepted(move |name| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    app_window.set_prompt_visible(false);
                    Self::add_child(&app_window, &app_state, ChildKind::ObjectProperty, name.trim());
                }
            });
        }
        {
            let app_window_weak = app_window.as_weak();
            app_window.on_prompt_cancelled(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    app_window.set_prompt_visible(false);
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_delete_node(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_delete_node(&app_window, &app_state);
                }
            });
        }

        // === 移动 / 复制 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            let pending_transfer = self.pending_transfer.clone();
            let destination_tree = self.destination_tree.clone();
            app_window.on_move_node(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    pending_transfer.set(Transfer::Move);
                    Self::show_destination_dialog(&app_window, &app_state, &destination_tree, Transfer::Move);
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            let pending_transfer = self.pending_transfer.clone();
            let destination_tree = self.destination_tree.clone();
            app_window.on_copy_node(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    pending_transfer.set(Transfer::Copy);
                    Self::show_destination_dialog(&app_window, &app_state, &destination_tree, Transfer::Copy);
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            let pending_transfer = self.pending_transfer.clone();
            let destination_tree = self.destination_tree.clone();
            app_window.on_destination_accepted(move |row| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_destination_accepted(
                        &app_window,
                        &app_state,
                        &destination_tree,
                        pending_transfer.get(),
                        row,
                    );
                }
            });
        }
        {
            let app_window_weak = app_window.as_weak();
            let destination_tree = self.destination_tree.clone();
            app_window.on_destination_cancelled(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    app_window.set_destination_visible(false);
                    destination_tree.borrow_mut().clear();
                }
            });
        }

        // === 剪贴板 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_copy_json(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_copy_json(&app_window, &app_state);
                }
            });
        }

        // === 校验 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_validate_schema(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_validate_schema(&app_window, &app_state);
                }
            });
        }
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_validate_data(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_validate_data(&app_window, &app_state);
                }
            });
        }

        // === 消息对话框回调 ===
        {
            let app_window_weak = app_window.as_weak();
            app_window.on_close_message_dialog(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    app_window.set_message_dialog_visible(false);
                }
            });
        }
    }

    /// 初始化UI状态
    fn initialize_ui(&self, app_window: &AppWindow) {
        app_window.set_status_message(STATUS_READY.into());
        Self::refresh_all(app_window, &self.app_state);
    }

    fn show_message(app_window: &AppWindow, title: &str, text: &str) {
        app_window.set_message_dialog_title(title.into());
        app_window.set_message_dialog_text(text.into());
        app_window.set_message_dialog_visible(true);
    }

    /// 错误同时显示在状态栏与消息对话框中
    fn report_error(app_window: &AppWindow, title: &str, e: &AppError) {
        let error_msg = format!("{}{}", STATUS_ERROR_PREFIX, e);
        app_window.set_status_message(error_msg.into());
        Self::show_message(app_window, title, &e.to_string());
        match e {
            AppError::Edit(_) | AppError::State(_) | AppError::InvalidSchema(_) => {
                tracing::warn!("{}: {}", title, e)
            }
            _ => tracing::error!("{}: {}", title, e),
        }
    }

    /// 显示文件选择对话框
    fn show_open_dialog(title: &str) -> Option<PathBuf> {
        let file_path = rfd::FileDialog::new()
            .add_filter("JSON文件", &["json"])
            .add_filter("所有文件", &["*"])
            .set_title(title)
            .pick_file();

        match file_path {
            Some(path) => {
                tracing::info!("用户选择了文件: {}", path.display());
                Some(path)
            }
            None => {
                tracing::info!("用户取消了文件选择");
                None
            }
        }
    }

    fn show_save_dialog() -> Option<PathBuf> {
        let file_path = rfd::FileDialog::new()
            .add_filter("JSON文件", &["json"])
            .set_title("保存 Schema 文件")
            .set_file_name("schema.json")
            .save_file();
        if file_path.is_none() {
            tracing::info!("用户取消了保存");
        }
        file_path
    }

    /// 重新构建树模型（只含可见行）
    fn rebuild_tree_model(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        let (tree_data, selected_row) = {
            let state = app_state.borrow();
            (tree_rows(&state.tree_flat), state.selected_row())
        };
        app_window.set_tree_model(ModelRc::new(VecModel::from(tree_data)));
        app_window.set_selected_row(selected_row.map(|r| r as i32).unwrap_or(-1));
    }

    /// 树、表单、标题栏路径一起刷新
    fn refresh_all(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        Self::rebuild_tree_model(app_window, app_state);
        Self::fill_form(app_window, app_state);
        let path_str = app_state
            .borrow()
            .file_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        app_window.set_current_path(path_str.into());
    }

    /// 把选中节点读入侧栏表单；未选中时清空并禁用
    fn fill_form(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        let (role, form) = {
            let state = app_state.borrow();
            match state.selected_path() {
                Ok(path) => {
                    let role = NodeRole::of(path);
                    match state.selected_form() {
                        Ok(form) => (Some(role), form),
                        Err(e) => {
                            tracing::warn!("读取节点失败: {}", e);
                            (None, NodeForm::default())
                        }
                    }
                }
                Err(_) => (None, NodeForm::default()),
            }
        };

        app_window.set_field_enabled(role.map(NodeRole::has_field_name).unwrap_or(false));
        app_window.set_types_enabled(role.map(NodeRole::types_editable).unwrap_or(false));
        app_window.set_field_name(form.field_name.into());
        app_window.set_required(form.required);

        let [string, number, boolean, integer, object, array, null] = flags_from_types(&form.types);
        app_window.set_type_string(string);
        app_window.set_type_number(number);
        app_window.set_type_boolean(boolean);
        app_window.set_type_integer(integer);
        app_window.set_type_object(object);
        app_window.set_type_array(array);
        app_window.set_type_null(null);

        app_window.set_description(form.description.into());
        app_window.set_pattern(form.pattern.into());
        let options = format_options(&form.format);
        app_window.set_format_index(format_index(&options, &form.format));
        let options: Vec<SharedString> = options.into_iter().map(SharedString::from).collect();
        app_window.set_format_options(ModelRc::new(VecModel::from(options)));

        app_window.set_minimum(form.minimum.into());
        app_window.set_exclusive_minimum(form.exclusive_minimum);
        app_window.set_maximum(form.maximum.into());
        app_window.set_exclusive_maximum(form.exclusive_maximum);
        app_window.set_multiple_of(form.multiple_of.into());
        app_window.set_min_items(form.min_items.into());
        app_window.set_max_items(form.max_items.into());
    }

    /// 从侧栏表单收集用户输入
    fn read_form(app_window: &AppWindow) -> NodeForm {
        use slint::Model;

        let options: Vec<String> = app_window
            .get_format_options()
            .iter()
            .map(|s| s.to_string())
            .collect();
        NodeForm {
            field_name: app_window.get_field_name().trim().to_string(),
            required: app_window.get_required(),
            types: types_from_flags([
                app_window.get_type_string(),
                app_window.get_type_number(),
                app_window.get_type_boolean(),
                app_window.get_type_integer(),
                app_window.get_type_object(),
                app_window.get_type_array(),
                app_window.get_type_null(),
            ]),
            description: app_window.get_description().to_string(),
            pattern: app_window.get_pattern().to_string(),
            format: format_at(&options, app_window.get_format_index()),
            minimum: app_window.get_minimum().to_string(),
            exclusive_minimum: app_window.get_exclusive_minimum(),
            maximum: app_window.get_maximum().to_string(),
            exclusive_maximum: app_window.get_exclusive_maximum(),
            multiple_of: app_window.get_multiple_of().to_string(),
            min_items: app_window.get_min_items().to_string(),
            max_items: app_window.get_max_items().to_string(),
        }
    }

    fn handle_new_file(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        app_state.borrow_mut().new_document();
        Self::refresh_all(app_window, app_state);
        app_window.set_status_message(STATUS_NEW.into());
        tracing::info!("新建 Schema 文档");
    }

    /// 处理加载文件操作；失败时保留当前文档
    fn handle_open_file(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>, path: &Path) {
        let load_result = app_state.borrow_mut().load_file(path);
        match load_result {
            Ok(()) => {
                Self::refresh_all(app_window, app_state);
                app_window.set_status_message(STATUS_LOADED.into());
                tracing::info!(
                    "文件加载成功: {}，{} 行",
                    path.display(),
                    app_state.borrow().tree_flat.len()
                );
            }
            Err(e) => Self::report_error(app_window, DIALOG_TITLE_FILE, &e),
        }
    }

    /// 保存；`choose_path` 为另存为。返回是否已写入文件
    fn handle_save(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>, choose_path: bool) -> bool {
        let current = app_state.borrow().file_path.clone();
        let target = match current {
            Some(path) if !choose_path => path,
            _ => match Self::show_save_dialog() {
                Some(path) => path,
                None => {
                    app_window.set_status_message("未选择保存位置".into());
                    return false;
                }
            },
        };

        let save_result = app_state.borrow_mut().save_to_file(&target);
        match save_result {
            Ok(()) => {
                app_window.set_current_path(target.to_string_lossy().to_string().into());
                app_window.set_status_message(format!("{}: {}", STATUS_SAVED, target.display()).into());
                tracing::info!("文件保存成功: {}", target.display());
                true
            }
            Err(e) => {
                let title = match e {
                    AppError::InvalidSchema(_) => DIALOG_TITLE_VALIDATOR,
                    _ => DIALOG_TITLE_FILE,
                };
                Self::report_error(app_window, title, &e);
                false
            }
        }
    }

    /// 处理节点选择操作
    fn handle_node_selected(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>, row: i32) {
        let Ok(row) = usize::try_from(row) else {
            return;
        };
        let select_result = app_state.borrow_mut().select_row(row);
        match select_result {
            Ok(path) => {
                app_window.set_selected_row(row as i32);
                Self::fill_form(app_window, app_state);
                app_window.set_status_message(path.to_string().into());
                tracing::debug!("选中节点: {}", path);
            }
            Err(e) => Self::report_error(app_window, DIALOG_TITLE_SELECTOR, &e),
        }
    }

    fn handle_update_node(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        let form = Self::read_form(app_window);
        let update_result = app_state.borrow_mut().update_selected(&form);
        match update_result {
            Ok(path) => {
                Self::refresh_all(app_window, app_state);
                app_window.set_status_message(format!("{}: {}", STATUS_UPDATED, path).into());
                tracing::info!("节点已更新: {}", path);
            }
            Err(e) => Self::report_error(app_window, "更新", &e),
        }
    }

    /// 添加子节点：array 直接加元素，object 询问字段名，两者皆是时先让用户选择
    fn handle_add_child(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        let kind = app_state.borrow().selected_child_kind();
        match kind {
            Ok(ChildKind::ArrayItems) => Self::add_child(app_window, app_state, ChildKind::ArrayItems, ""),
            Ok(ChildKind::ObjectProperty) => Self::show_prompt(app_window),
            Err(e) if needs_child_kind_choice(&e) => app_window.set_choice_visible(true),
            Err(e) => Self::report_error(app_window, "添加子节点", &e),
        }
    }

    fn show_prompt(app_window: &AppWindow) {
        app_window.set_prompt_text("".into());
        app_window.set_prompt_visible(true);
    }

    fn add_child(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>, kind: ChildKind, name: &str) {
        let add_result = app_state.borrow_mut().add_child_to_selected(kind, name);
        match add_result {
            Ok(path) => {
                Self::refresh_all(app_window, app_state);
                app_window.set_status_message(format!("已添加: {}", path).into());
                tracing::info!("添加子节点: {}", path);
            }
            Err(e) => Self::report_error(app_window, "添加子节点", &e),
        }
    }

    fn handle_delete_node(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        let delete_result = app_state.borrow_mut().delete_selected();
        match delete_result {
            Ok(path) => {
                Self::refresh_all(app_window, app_state);
                app_window.set_status_message(format!("已删除: {}", path).into());
                tracing::info!("删除节点: {}", path);
            }
            Err(e) => Self::report_error(app_window, "删除", &e),
        }
    }

    /// 打开目标选择器（只列出 object/array 节点）
    fn show_destination_dialog(
        app_window: &AppWindow,
        app_state: &Rc<RefCell<EditorState>>,
        destination_tree: &Rc<RefCell<Vec<SchemaTreeNode>>>,
        mode: Transfer,
    ) {
        let tree = {
            let state = app_state.borrow();
            state.selected_path().map(|_| state.destination_tree())
        };
        let tree = match tree {
            Ok(tree) => tree,
            Err(e) => {
                Self::report_error(app_window, DIALOG_TITLE_SELECTOR, &e);
                return;
            }
        };

        let title = match mode {
            Transfer::Move => "移动到:",
            Transfer::Copy => "复制到:",
        };
        app_window.set_destination_title(title.into());
        app_window.set_destination_model(ModelRc::new(VecModel::from(tree_rows(&tree))));
        app_window.set_destination_selected(-1);
        app_window.set_destination_visible(true);
        *destination_tree.borrow_mut() = tree;
    }

    fn handle_destination_accepted(
        app_window: &AppWindow,
        app_state: &Rc<RefCell<EditorState>>,
        destination_tree: &Rc<RefCell<Vec<SchemaTreeNode>>>,
        mode: Transfer,
        row: i32,
    ) {
        let Ok(row) = usize::try_from(row) else {
            app_window.set_status_message(format!("{}未选择目标节点", STATUS_ERROR_PREFIX).into());
            return;
        };
        app_window.set_destination_visible(false);

        let tree = std::mem::take(&mut *destination_tree.borrow_mut());
        let transfer_result = app_state.borrow_mut().transfer_selected(&tree, row, mode);
        match transfer_result {
            Ok(path) => {
                Self::refresh_all(app_window, app_state);
                let action = match mode {
                    Transfer::Move => "已移动到",
                    Transfer::Copy => "已复制到",
                };
                app_window.set_status_message(format!("{}: {}", action, path).into());
                tracing::info!("{}: {}", action, path);
            }
            Err(e) => Self::report_error(app_window, DIALOG_TITLE_SELECTOR, &e),
        }
    }

    /// 复制选中节点的 JSON 到剪贴板
    fn handle_copy_json(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        let text = match app_state.borrow().selected_pretty() {
            Ok(text) => text,
            Err(e) => {
                Self::report_error(app_window, "复制 JSON", &e);
                return;
            }
        };

        match copy_to_clipboard(&text) {
            Ok(()) => {
                app_window.set_status_message(STATUS_COPIED.into());
                tracing::info!("内容已复制到剪贴板，长度: {} 字符", text.len());
            }
            Err(e) => {
                let error_msg = format!("{}{}", STATUS_ERROR_PREFIX, e);
                app_window.set_status_message(error_msg.into());
                tracing::error!("复制失败: {}", e);
            }
        }
    }

    fn handle_validate_schema(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        let check_result = app_state.borrow().validate_schema();
        match check_result {
            Ok(()) => {
                app_window.set_status_message(STATUS_SCHEMA_VALID.into());
                Self::show_message(app_window, DIALOG_TITLE_VALIDATOR, STATUS_SCHEMA_VALID);
                tracing::info!("Schema 自检通过");
            }
            Err(report) => {
                let e = AppError::InvalidSchema(report);
                Self::report_error(app_window, DIALOG_TITLE_VALIDATOR, &e);
            }
        }
    }

    /// 选择实例数据文件并用当前 Schema 校验
    fn handle_validate_data(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        let Some(path) = Self::show_open_dialog("选择要校验的数据文件") else {
            app_window.set_status_message("未选择文件".into());
            return;
        };

        let validate_result = app_state.borrow().validate_data_file(&path);
        match validate_result {
            Ok(report) if report.is_valid() => {
                app_window.set_status_message(STATUS_DATA_VALID.into());
                Self::show_message(app_window, DIALOG_TITLE_VALIDATOR, STATUS_DATA_VALID);
                tracing::info!("数据校验通过: {}", path.display());
            }
            Ok(report) => {
                let count = report.issues.len();
                app_window.set_status_message(format!("{}数据不符合 Schema（{} 处）", STATUS_ERROR_PREFIX, count).into());
                Self::show_message(app_window, DIALOG_TITLE_VALIDATOR, &report.to_string());
                tracing::warn!("数据校验失败: {}，{} 处错误", path.display(), count);
            }
            Err(e) => Self::report_error(app_window, DIALOG_TITLE_VALIDATOR, &e),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志输出
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = SubscriberBuilder::default().with_max_level(level).try_init();

    let app = AppWindow::new()?;
    app.set_window_title(WINDOW_TITLE.into());
    let state = Rc::new(RefCell::new(EditorState::default()));

    // 创建VM桥接器并绑定UI回调
    let bridge = ViewModelBridge::new(&app, state.clone());
    bridge.initialize_ui(&app);

    if let Some(path) = cli.schema.as_deref() {
        ViewModelBridge::handle_open_file(&app, &state, path);
    }

    tracing::info!("应用启动成功，UI已初始化");
    app.run()?;
    Ok(())
}
