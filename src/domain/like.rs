// ==========================================
// 沉睡账号点赞分拣系统 - 待处理点赞领域模型
// ==========================================
// 红线: 只由批处理器修改, 永不删除, 状态单调
// ==========================================

use crate::domain::types::LikeState;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingLike {
    pub id: String,
    pub subject_id: String,    // 被点赞的沉睡账号
    pub originator_id: String, // 发起点赞的用户
    pub liked_at: NaiveDateTime,
    pub state: LikeState,
}

impl PendingLike {
    pub fn is_pending(&self) -> bool {
        self.state == LikeState::Pending
    }
}
