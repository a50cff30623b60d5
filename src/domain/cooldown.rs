// ==========================================
// 沉睡账号点赞分拣系统 - 冷却记录领域模型
// ==========================================
// 记录缺失 ⇒ 立即可处理
// 仅在批次 COMPLETED 时写入（覆盖旧记录）
// ==========================================

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

// ==========================================
// CooldownRecord - 冷却记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CooldownRecord {
    pub subject_id: String,
    pub last_batch_at: NaiveDateTime,
    pub lockout_minutes: i64, // 写入时的锁定时长快照
}

impl CooldownRecord {
    /// 最早可再次处理的时间（超出可表示范围时为 None）
    pub fn can_process_at(&self) -> Option<NaiveDateTime> {
        TimeDelta::try_minutes(self.lockout_minutes)
            .and_then(|span| self.last_batch_at.checked_add_signed(span))
    }
}

// ==========================================
// CooldownStatus - 冷却状态（读模型）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CooldownStatus {
    pub is_on_cooldown: bool,
    pub remaining_minutes: i64,
    pub last_processed_at: Option<NaiveDateTime>,
    pub can_process_at: Option<NaiveDateTime>,
}

impl CooldownStatus {
    /// 无冷却记录时的状态
    pub fn idle() -> Self {
        Self {
            is_on_cooldown: false,
            remaining_minutes: 0,
            last_processed_at: None,
            can_process_at: None,
        }
    }
}
