use crate::app::state::AppState;

use super::common::{map_api_error, to_json};

// ==========================================
// 配置管理相关命令
// ==========================================

/// 查询分拣配置
#[tauri::command(rename_all = "snake_case")]
pub async fn get_triage_config(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state
        .config_api
        .get_triage_config()
        .await
        .map_err(map_api_error)?;

    to_json(&result)
}

/// 更新分拣配置项
#[tauri::command(rename_all = "snake_case")]
pub async fn update_triage_config(
    state: tauri::State<'_, AppState>,
    key: String,
    value: String,
) -> Result<String, String> {
    let result = state
        .config_api
        .update_triage_config(&key, &value)
        .await
        .map_err(map_api_error)?;

    to_json(&result)
}
