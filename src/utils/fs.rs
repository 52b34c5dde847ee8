//! IO helper: safe file read/write for JSON

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};

use crate::model::error::AppError;

/// 保存时的缩进：4 个空格
const INDENT: &[u8] = b"    ";

/// 从文件读取JSON数据
pub fn read_json_file(p: &Path) -> Result<Value, AppError> {
    let f = File::open(p)?;
    let rdr = BufReader::new(f);
    let v: Value = serde_json::from_reader(rdr)?;
    Ok(v)
}

/// 格式化为 4 空格缩进的 JSON 文本；非 ASCII 字符原样输出
pub fn to_pretty_string(value: &Value) -> Result<String, AppError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    // serde_json 只输出合法 UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// 将JSON数据保存到文件（4 空格缩进，UTF-8）
pub fn write_json_file(p: &Path, value: &Value) -> Result<(), AppError> {
    let text = to_pretty_string(value)?;
    let f = File::create(p)?;
    let mut w = BufWriter::new(f);
    w.write_all(text.as_bytes())?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_pretty_uses_four_spaces_and_keeps_unicode() {
        let text = to_pretty_string(&json!({"title": "用户资料", "n": [1]})).unwrap();
        assert_eq!(text, "{\n    \"title\": \"用户资料\",\n    \"n\": [\n        1\n    ]\n}\n");
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().expect("创建临时目录失败");
        let path = dir.path().join("schema.json");
        let value = json!({"z": 1, "a": {"y": true, "b": null}});
        write_json_file(&path, &value).unwrap();
        let back = read_json_file(&path).unwrap();
        assert_eq!(back, value);
        let keys: Vec<&String> = back.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a"], "键顺序应该保持");
    }

    #[test]
    fn test_read_missing_and_malformed() {
        let dir = tempdir().expect("创建临时目录失败");
        let missing = dir.path().join("missing.json");
        assert!(matches!(read_json_file(&missing), Err(AppError::Io(_))));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{\"a\": ").unwrap();
        assert!(matches!(read_json_file(&broken), Err(AppError::Parse(_))));
    }
}
