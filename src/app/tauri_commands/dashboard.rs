use crate::app::state::AppState;

use super::common::{map_api_error, to_json};

// ==========================================
// 看板与审计相关命令
// ==========================================

/// 当日汇总
#[tauri::command(rename_all = "snake_case")]
pub async fn get_today_summary(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state
        .dashboard_api
        .get_today_summary()
        .await
        .map_err(map_api_error)?;

    to_json(&result)
}

/// 按操作员查询审计记录
#[tauri::command(rename_all = "snake_case")]
pub async fn list_audit_by_operator(
    state: tauri::State<'_, AppState>,
    operator_id: String,
    limit: Option<i64>,
) -> Result<String, String> {
    let result = state
        .dashboard_api
        .list_audit_by_operator(&operator_id, limit)
        .await
        .map_err(map_api_error)?;

    to_json(&result)
}

/// 按账号查询审计记录
#[tauri::command(rename_all = "snake_case")]
pub async fn list_audit_by_subject(
    state: tauri::State<'_, AppState>,
    subject_id: String,
    limit: Option<i64>,
) -> Result<String, String> {
    let result = state
        .dashboard_api
        .list_audit_by_subject(&subject_id, limit)
        .await
        .map_err(map_api_error)?;

    to_json(&result)
}

/// 按时间窗口统计处理数
#[tauri::command(rename_all = "snake_case")]
pub async fn count_audit_by_date_range(
    state: tauri::State<'_, AppState>,
    start: String,
    end: String,
) -> Result<String, String> {
    let result = state
        .dashboard_api
        .count_by_date_range(&start, &end)
        .map_err(map_api_error)?;

    to_json(&result)
}
