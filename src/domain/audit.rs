// ==========================================
// 沉睡账号点赞分拣系统 - 审计条目领域模型
// ==========================================
// 红线: 只追加, 永不修改/删除
// 每个 COMPLETED 批次的每条点赞写入一条
// ==========================================

use crate::domain::types::ActionType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub entry_id: String,
    pub batch_id: String,
    pub subject_id: String,
    pub operator_id: String,
    pub like_id: String,
    pub action_type: ActionType,
    pub created_at: NaiveDateTime,
}

// ==========================================
// AuditCounts - 审计计数（按时间窗口）
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditCounts {
    pub processed: i64,
    pub viewed: i64,
    pub rejected: i64,
}
