// ==========================================
// 沉睡账号点赞分拣系统 - API 数据传输对象
// ==========================================
// 约束: 字段一律 camelCase, 与前端约定一致
// ==========================================

use crate::domain::batch::{BatchItemOutcome, ProcessingBatch};
use crate::domain::subject::DormantSubject;
use crate::engine::dormancy::EligibleSubjectPage;
use serde::{Deserialize, Serialize};

// ==========================================
// 准入账号列表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleSubjectsResponse {
    pub total_pending_likes: i64,
    pub today_processed_count: i64,
    pub today_viewed_count: i64,
    pub today_rejected_count: i64,
    pub users: Vec<DormantSubject>,
    pub total_users: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl From<EligibleSubjectPage> for EligibleSubjectsResponse {
    fn from(page: EligibleSubjectPage) -> Self {
        Self {
            total_pending_likes: page.total_pending_likes,
            today_processed_count: page.today.processed,
            today_viewed_count: page.today.viewed,
            today_rejected_count: page.today.rejected,
            users: page.users,
            total_users: page.total_users,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        }
    }
}

// ==========================================
// 批次提交结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub batch_id: String,
    pub processed_count: usize,
    pub viewed_count: usize,
    pub rejected_count: usize,
    pub details: Vec<BatchItemOutcome>,
}

impl From<ProcessingBatch> for BatchResponse {
    fn from(batch: ProcessingBatch) -> Self {
        Self {
            processed_count: batch.processed_count(),
            viewed_count: batch.viewed_count(),
            rejected_count: batch.rejected_count(),
            batch_id: batch.batch_id,
            details: batch.outcomes,
        }
    }
}

// ==========================================
// 分拣配置视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageConfigView {
    pub lockout_minutes: i64,
    pub inactivity_days: i64,
    pub default_page_size: i64,
    pub max_page_size: i64,
}
