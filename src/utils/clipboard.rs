//! Clipboard: 把选中节点的 Schema 片段复制到系统剪贴板

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard error: {0}")]
    Clip(String),
}

/// 将文本复制到系统剪贴板
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    use copypasta::{ClipboardContext, ClipboardProvider};
    let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))?;
    ctx.set_contents(text.to_string())
        .map_err(|e| ClipboardError::Clip(e.to_string()))
}

/// 从系统剪贴板获取文本（用于测试）
#[cfg(test)]
pub fn get_clipboard_contents() -> Result<String, ClipboardError> {
    use copypasta::{ClipboardContext, ClipboardProvider};
    let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))?;
    ctx.get_contents()
        .map_err(|e| ClipboardError::Clip(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::SchemaDocument;
    use crate::model::path::SchemaPath;

    #[test]
    #[ignore = "需要桌面会话提供剪贴板"]
    fn test_copy_node_json() {
        let doc = SchemaDocument::new();
        let text = doc.node_pretty(&SchemaPath::root()).unwrap();

        copy_to_clipboard(&text).expect("复制到剪贴板应该成功");
        let clipboard_content = get_clipboard_contents().expect("从剪贴板读取应该成功");
        assert_eq!(clipboard_content, text, "剪贴板内容应该与复制的文本一致");
    }

    #[test]
    #[ignore = "需要桌面会话提供剪贴板"]
    fn test_clipboard_unicode() {
        let unicode_text = "{\"description\": \"用户资料 ✨\"}";
        copy_to_clipboard(unicode_text).expect("复制Unicode文本应该成功");
        let clipboard_content = get_clipboard_contents().unwrap();
        assert_eq!(clipboard_content, unicode_text, "剪贴板应该正确处理Unicode字符");
    }
}
