//! 配置校验模块
//!
//! 校验规则：
//! - 字段级规则 (validator derive)：路径非空、分组列非空、top_n >= 0 等
//! - 分隔符为单字节 ASCII，且不是换行或引号
//! - 声明列名唯一
//! - 连接列非空白
//! - sink 名称唯一

use std::collections::HashSet;

use contracts::{ContractError, SourceConfig, WalkthroughBlueprint};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// 校验 WalkthroughBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &WalkthroughBlueprint) -> Result<(), ContractError> {
    validate_fields(blueprint)?;
    validate_source("sources.customers", &blueprint.sources.customers)?;
    validate_source("sources.orders", &blueprint.sources.orders)?;
    validate_join(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

/// 运行 derive 生成的字段级规则
fn validate_fields(blueprint: &WalkthroughBlueprint) -> Result<(), ContractError> {
    match blueprint.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let mut flat = Vec::new();
            flatten_errors("", &errors, &mut flat);
            // HashMap 顺序不稳定，按路径排序后取第一个
            flat.sort();
            let (field, message) = flat
                .into_iter()
                .next()
                .unwrap_or_else(|| (String::new(), "invalid configuration".to_string()));
            Err(ContractError::config_validation(field, message))
        }
    }
}

fn flatten_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    out.push((path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    flatten_errors(&format!("{path}[{idx}]"), nested, out);
                }
            }
        }
    }
}

/// 校验单个数据源的读取选项
fn validate_source(field: &str, source: &SourceConfig) -> Result<(), ContractError> {
    let delimiter = source.delimiter;
    if !delimiter.is_ascii() || matches!(delimiter, '\n' | '\r' | '"') {
        return Err(ContractError::config_validation(
            format!("{field}.delimiter"),
            format!(
                "delimiter must be a single-byte ASCII character other than newline or quote, \
                 got {delimiter:?}"
            ),
        ));
    }

    if let Some(columns) = &source.columns {
        if columns.is_empty() {
            return Err(ContractError::config_validation(
                format!("{field}.columns"),
                "declared columns cannot be empty",
            ));
        }
        let mut seen = HashSet::new();
        for column in columns {
            if !seen.insert(column.name.as_str()) {
                return Err(ContractError::config_validation(
                    format!("{field}.columns[name={}]", column.name),
                    "duplicate column name",
                ));
            }
        }
    }

    Ok(())
}

/// 校验连接列
fn validate_join(blueprint: &WalkthroughBlueprint) -> Result<(), ContractError> {
    if blueprint.join.on.trim().is_empty() {
        return Err(ContractError::config_validation(
            "join.on",
            "join column cannot be blank",
        ));
    }
    Ok(())
}

/// 校验 sink 配置
fn validate_sinks(blueprint: &WalkthroughBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for sink in &blueprint.sinks {
        if !seen.insert(&sink.name) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
    }
    Ok(())
}
