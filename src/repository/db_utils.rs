// ==========================================
// 沉睡账号点赞分拣系统 - 仓储公共工具
// ==========================================
// 职责: 行映射中的时间/枚举解析, IN 子句占位符
// ==========================================

use crate::db::parse_datetime;
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::Row;

/// 生成 `col IN (?, ?, ?)` 片段；空列表返回永假条件
pub fn in_clause(column_name: &str, len: usize) -> String {
    if len == 0 {
        return "1 = 0".to_string();
    }
    let placeholders = vec!["?"; len].join(", ");
    format!("{} IN ({})", column_name, placeholders)
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

/// 读取 TEXT 时间列
pub fn column_datetime(row: &Row, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    parse_datetime(&raw).ok_or_else(|| conversion_error(idx, format!("无效时间: {}", raw)))
}

/// 读取可空 TEXT 时间列
pub fn column_datetime_opt(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(raw) => parse_datetime(&raw)
            .map(Some)
            .ok_or_else(|| conversion_error(idx, format!("无效时间: {}", raw))),
        None => Ok(None),
    }
}

/// 读取枚举列（通过解析函数）
pub fn column_enum<T>(
    row: &Row,
    idx: usize,
    parse: impl Fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| conversion_error(idx, format!("无效枚举值: {}", raw)))
}
