pub mod document;
pub mod editor;
pub mod error;
pub mod json_type;
pub mod node_form;
pub mod path;
pub mod schema_tree;
pub mod validation;
