// ==========================================
// 沉睡账号点赞分拣系统 - 领域类型定义
// ==========================================
// 红线: 点赞状态单调流转, PENDING 一旦离开不可回退
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 点赞状态 (Like State)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LikeState {
    Pending,  // 未处理
    Viewed,   // 已查看（被动确认）
    Rejected, // 已拒绝
}

impl LikeState {
    /// 从数据库字符串解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(LikeState::Pending),
            "VIEWED" => Some(LikeState::Viewed),
            "REJECTED" => Some(LikeState::Rejected),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            LikeState::Pending => "PENDING",
            LikeState::Viewed => "VIEWED",
            LikeState::Rejected => "REJECTED",
        }
    }

    /// 是否已终结（非 PENDING）
    pub fn is_resolved(&self) -> bool {
        !matches!(self, LikeState::Pending)
    }

    /// 状态流转是否合法
    ///
    /// 只允许 PENDING → VIEWED / REJECTED；已终结状态不接受任何流转
    pub fn can_transition_to(&self, next: LikeState) -> bool {
        matches!(
            (self, next),
            (LikeState::Pending, LikeState::Viewed) | (LikeState::Pending, LikeState::Rejected)
        )
    }
}

impl fmt::Display for LikeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 批次状态 (Batch Status)
// ==========================================
// RUNNING → COMPLETED / FAILED, 终态不可再变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Running,
    Completed,
    Failed,
}

impl BatchStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "RUNNING" => Some(BatchStatus::Running),
            "COMPLETED" => Some(BatchStatus::Completed),
            "FAILED" => Some(BatchStatus::Failed),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            BatchStatus::Running => "RUNNING",
            BatchStatus::Completed => "COMPLETED",
            BatchStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BatchStatus::Running)
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 处理动作 (Action Type)
// ==========================================
// 每个点赞在批次中的处理结果, 同时写入审计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Viewed,
    Rejected,
}

impl ActionType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "VIEWED" => Some(ActionType::Viewed),
            "REJECTED" => Some(ActionType::Rejected),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            ActionType::Viewed => "VIEWED",
            ActionType::Rejected => "REJECTED",
        }
    }

    /// 动作对应的目标点赞状态
    pub fn target_state(&self) -> LikeState {
        match self {
            ActionType::Viewed => LikeState::Viewed,
            ActionType::Rejected => LikeState::Rejected,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
