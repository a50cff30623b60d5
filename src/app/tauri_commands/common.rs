use crate::api::error::ApiError;
use crate::i18n;
use serde::{Deserialize, Serialize};

// ==========================================
// 公共工具：错误映射、序列化
// ==========================================

/// 错误响应（返回给前端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

/// 将ApiError转换为JSON字符串（Tauri要求）
pub(super) fn map_api_error(err: ApiError) -> String {
    let error_response = ErrorResponse {
        code: err.reason_code().to_string(),
        message: err.to_string(),
        details: match &err {
            ApiError::CooldownActive {
                remaining_minutes,
                can_process_at,
            } => Some(serde_json::json!({
                "remainingMinutes": remaining_minutes,
                "canProcessAt": can_process_at,
                "hint": i18n::cooldown_hint(*remaining_minutes),
            })),
            ApiError::TooManySelected { count, max } => Some(serde_json::json!({
                "count": count,
                "max": max,
            })),
            ApiError::StaleOrForeignLike(like_id) | ApiError::DuplicateSelection(like_id) => {
                Some(serde_json::json!({ "likeId": like_id }))
            }
            ApiError::BatchFailed { batch_id, .. } => {
                Some(serde_json::json!({ "batchId": batch_id, "retryable": true }))
            }
            _ => None,
        },
    };

    serde_json::to_string(&error_response).unwrap_or_else(|_| err.to_string())
}

/// 序列化命令结果
pub(super) fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("序列化失败: {}", e))
}
