// ==========================================
// 沉睡账号点赞分拣系统 - 引擎层
// ==========================================
// 职责: 实现分拣业务规则, 不拼 SQL
// 红线: 点赞状态的任何变更只经由 BatchProcessor
// ==========================================

pub mod batch_processor;
pub mod cooldown_guard;
pub mod dashboard_aggregator;
pub mod dormancy;
pub mod error;
pub mod rejection_allocator;
pub mod selection_validator;

// 重导出核心引擎
pub use batch_processor::{BatchError, BatchProcessor, BatchRequest};
pub use cooldown_guard::CooldownGuard;
pub use dashboard_aggregator::{DashboardAggregator, TodaySummary};
pub use dormancy::{DormancyClassifier, EligibleQuery, EligibleSubjectPage};
pub use error::{EngineError, EngineResult};
pub use rejection_allocator::{Allocation, RejectionAllocator};
pub use selection_validator::{BatchSelectionValidator, SelectionRejection, ValidSelection};
