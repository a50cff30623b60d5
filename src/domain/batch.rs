// ==========================================
// 沉睡账号点赞分拣系统 - 处理批次领域模型
// ==========================================
// 红线: 全有或全无; 终态后不可变
// ==========================================

use crate::domain::types::{ActionType, BatchStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 单批最多可选点赞数
pub const MAX_BATCH_SIZE: usize = 5;

// ==========================================
// ProcessingBatch - 处理批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingBatch {
    pub batch_id: String,
    pub subject_id: String,
    pub operator_id: String,
    pub requested_like_ids: Vec<String>, // 有序、去重、1..=5
    pub rejection_rate: f64,             // 0..=1
    pub status: BatchStatus,
    pub outcomes: Vec<BatchItemOutcome>,
    pub failure_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub finished_at: Option<NaiveDateTime>,
}

impl ProcessingBatch {
    pub fn viewed_count(&self) -> usize {
        self.count_success(ActionType::Viewed)
    }

    pub fn rejected_count(&self) -> usize {
        self.count_success(ActionType::Rejected)
    }

    pub fn processed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    fn count_success(&self, action: ActionType) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.success && o.action_type == action)
            .count()
    }
}

// ==========================================
// BatchItemOutcome - 单条点赞处理结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemOutcome {
    pub like_id: String,
    pub action_type: ActionType,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
