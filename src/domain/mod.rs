// ==========================================
// 沉睡账号点赞分拣系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod audit;
pub mod batch;
pub mod cooldown;
pub mod like;
pub mod subject;
pub mod types;

// 重导出核心类型
pub use audit::{AuditCounts, AuditEntry};
pub use batch::{BatchItemOutcome, ProcessingBatch, MAX_BATCH_SIZE};
pub use cooldown::{CooldownRecord, CooldownStatus};
pub use like::PendingLike;
pub use subject::DormantSubject;
pub use types::{ActionType, BatchStatus, LikeState};
