//! 校验委托：Schema 自检与实例数据校验均交给 `jsonschema`（Draft-07），
//! 这里只负责把错误位置格式化为稳定、可读的路径并排序

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

use crate::model::error::AppError;

/// 错误位置中的一段：数组下标或对象键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

/// 报告针对的文档：Schema 本身（`schema[...]`）或实例数据（`$[...]`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTarget {
    Schema,
    Instance,
}

impl ReportTarget {
    fn label(self) -> &'static str {
        match self {
            ReportTarget::Schema => "schema",
            ReportTarget::Instance => "$",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: Vec<PathSegment>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub target: ReportTarget,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// 每个问题一行：`At $["a"][0], <message>.`
    pub fn lines(&self) -> Vec<String> {
        self.issues
            .iter()
            .map(|issue| {
                format!(
                    "At {}, {}.",
                    format_path(self.target.label(), &issue.path),
                    issue.message
                )
            })
            .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// 把路径段拼成 `label["key"][0]` 形式：键加双引号，下标不加
pub fn format_path(label: &str, path: &[PathSegment]) -> String {
    let mut out = label.to_string();
    for seg in path {
        match seg {
            PathSegment::Index(i) => out.push_str(&format!("[{}]", i)),
            PathSegment::Key(k) => out.push_str(&format!("[\"{}\"]", k)),
        }
    }
    out
}

/// 把校验器给出的 JSON Pointer 还原为路径段
///
/// 指针本身无法区分 `"0"` 键与下标 0，因此沿着被校验的文档逐段判断：
/// 当前值为数组时按下标解释
pub fn pointer_segments(document: &Value, pointer: &str) -> Vec<PathSegment> {
    let Some(rest) = pointer.strip_prefix('/') else {
        return Vec::new();
    };
    let mut current = Some(document);
    rest.split('/')
        .map(|raw| raw.replace("~1", "/").replace("~0", "~"))
        .map(|key| {
            let seg = match (current, key.parse::<usize>()) {
                (Some(Value::Array(_)), Ok(i)) => PathSegment::Index(i),
                _ => PathSegment::Key(key),
            };
            current = match (&seg, current) {
                (PathSegment::Index(i), Some(v)) => v.get(*i),
                (PathSegment::Key(k), Some(v)) => v.get(k.as_str()),
                (_, None) => None,
            };
            seg
        })
        .collect()
}

fn compare_issues(a: &ValidationIssue, b: &ValidationIssue) -> Ordering {
    a.path.cmp(&b.path)
}

/// 按 Draft-07 元模式自检 Schema
pub fn check_schema(schema: &Value) -> Result<(), ValidationReport> {
    match jsonschema::draft7::meta::validate(schema) {
        Ok(()) => Ok(()),
        Err(error) => {
            let pointer = error.instance_path.to_string();
            let issue = ValidationIssue {
                path: pointer_segments(schema, &pointer),
                message: error.to_string(),
            };
            tracing::debug!("Schema 自检失败: {} {}", pointer, issue.message);
            Err(ValidationReport {
                target: ReportTarget::Schema,
                issues: vec![issue],
            })
        }
    }
}

/// 用当前 Schema 校验实例数据，返回按路径排序的问题列表（可能为空）
///
/// Schema 本身不合法时返回 `AppError::InvalidSchema`
pub fn validate_instance(schema: &Value, instance: &Value) -> Result<ValidationReport, AppError> {
    check_schema(schema).map_err(AppError::InvalidSchema)?;
    // format 只作标注，不参与实例校验
    let validator = jsonschema::options()
        .with_draft(jsonschema::Draft::Draft7)
        .should_validate_formats(false)
        .build(schema)
        .map_err(|e| AppError::State(format!("无法构建校验器: {}", e)))?;

    let mut issues: Vec<ValidationIssue> = validator
        .iter_errors(instance)
        .map(|error| ValidationIssue {
            path: pointer_segments(instance, &error.instance_path.to_string()),
            message: error.to_string(),
        })
        .collect();
    // 稳定排序：同一路径下保持校验器给出的顺序
    issues.sort_by(compare_issues);

    Ok(ValidationReport {
        target: ReportTarget::Instance,
        issues,
    })
}
