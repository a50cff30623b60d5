use crate::app::state::AppState;
use crate::engine::BatchRequest;

use super::common::{map_api_error, to_json};

// ==========================================
// 分拣相关命令
// ==========================================

/// 分页查询可分拣账号
#[tauri::command(rename_all = "snake_case")]
pub async fn list_eligible_subjects(
    state: tauri::State<'_, AppState>,
    inactivity_days: Option<i64>,
    page: Option<i64>,
    limit: Option<i64>,
) -> Result<String, String> {
    let result = state
        .triage_api
        .list_eligible_subjects(inactivity_days, page, limit)
        .await
        .map_err(map_api_error)?;

    to_json(&result)
}

/// 查询账号下的待处理点赞
#[tauri::command(rename_all = "snake_case")]
pub async fn list_pending_likes(
    state: tauri::State<'_, AppState>,
    subject_id: String,
) -> Result<String, String> {
    let result = state
        .triage_api
        .list_pending_likes(&subject_id)
        .map_err(map_api_error)?;

    to_json(&result)
}

/// 查询账号冷却状态
#[tauri::command(rename_all = "snake_case")]
pub async fn get_cooldown_status(
    state: tauri::State<'_, AppState>,
    subject_id: String,
) -> Result<String, String> {
    let result = state
        .triage_api
        .get_cooldown_status(&subject_id)
        .map_err(map_api_error)?;

    to_json(&result)
}

/// 提交批次
#[tauri::command(rename_all = "snake_case")]
pub async fn submit_batch(
    state: tauri::State<'_, AppState>,
    subject_id: String,
    operator_id: String,
    like_ids: Vec<String>,
    rejection_rate: f64,
) -> Result<String, String> {
    let request = BatchRequest {
        subject_id,
        operator_id,
        like_ids,
        rejection_rate,
    };
    let result = state
        .triage_api
        .submit_batch(request)
        .await
        .map_err(map_api_error)?;

    to_json(&result)
}

/// 查询批次详情
#[tauri::command(rename_all = "snake_case")]
pub async fn get_batch(
    state: tauri::State<'_, AppState>,
    batch_id: String,
) -> Result<String, String> {
    let result = state.triage_api.get_batch(&batch_id).map_err(map_api_error)?;

    to_json(&result)
}

/// 查询账号的最近批次
#[tauri::command(rename_all = "snake_case")]
pub async fn list_batches_by_subject(
    state: tauri::State<'_, AppState>,
    subject_id: String,
    limit: Option<i64>,
) -> Result<String, String> {
    let result = state
        .triage_api
        .list_batches_by_subject(&subject_id, limit)
        .await
        .map_err(map_api_error)?;

    to_json(&result)
}
