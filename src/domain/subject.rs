// ==========================================
// 沉睡账号点赞分拣系统 - 沉睡账号领域模型
// ==========================================
// 准入: now - last_seen_at >= 不活跃阈值 且 余额 > 0 且 待处理点赞 > 0
// ==========================================

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

// ==========================================
// DormantSubject - 沉睡账号
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DormantSubject {
    pub id: String,
    pub display_name: String,
    pub contact_handle: String,
    pub credit_balance: i64,         // 可消费余额
    pub last_seen_at: NaiveDateTime, // 最后活跃时间
    pub pending_like_count: i64,     // 派生: 当前 PENDING 点赞数
}

impl DormantSubject {
    /// 是否满足分拣准入条件
    ///
    /// # 参数
    /// - now: 当前时间
    /// - inactivity_days: 不活跃天数阈值（超出可表示范围时视为无人达到）
    pub fn is_eligible(&self, now: NaiveDateTime, inactivity_days: i64) -> bool {
        TimeDelta::try_days(inactivity_days).is_some_and(|threshold| now - self.last_seen_at >= threshold)
            && self.credit_balance > 0
            && self.pending_like_count > 0
    }
}
