// ==========================================
// 沉睡账号点赞分拣系统 - 拒绝分配器
// ==========================================
// 红线: 纯函数, 无随机性, 结果可复现可审计
// ==========================================
// 规则: rejectCount = round_half_up(n * rate), 夹取到 [0, n]
//       前 rejectCount 条拒绝, 其余标记已读
// ==========================================

use crate::domain::types::ActionType;
use serde::{Deserialize, Serialize};

// ==========================================
// Allocation - 分配结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub reject_count: usize,
    pub view_count: usize,
}

// ==========================================
// RejectionAllocator - 拒绝分配器
// ==========================================
pub struct RejectionAllocator;

impl RejectionAllocator {
    /// 计算拒绝/已读条数
    ///
    /// # 参数
    /// - n: 批次条数（调用方保证 n >= 1）
    /// - rate: 拒绝比例 [0, 1]
    pub fn allocate(n: usize, rate: f64) -> Allocation {
        let raw = (n as f64 * rate).round();
        let reject_count = if raw.is_finite() && raw > 0.0 {
            (raw as usize).min(n)
        } else {
            0
        };

        Allocation {
            reject_count,
            view_count: n - reject_count,
        }
    }

    /// 按校验后的顺序给出每条点赞的动作
    pub fn assign(like_ids: &[String], rate: f64) -> Vec<(String, ActionType)> {
        let allocation = Self::allocate(like_ids.len(), rate);
        like_ids
            .iter()
            .enumerate()
            .map(|(idx, like_id)| {
                let action = if idx < allocation.reject_count {
                    ActionType::Rejected
                } else {
                    ActionType::Viewed
                };
                (like_id.clone(), action)
            })
            .collect()
    }
}
