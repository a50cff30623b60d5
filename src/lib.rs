// ==========================================
// 沉睡账号点赞分拣系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite (+ 可选 Tauri)
// 系统定位: 运营人员代沉睡账号批量处理点赞通知
// 红线: 冷却强制、全有或全无、审计只追加
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分拣规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装与 Tauri 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型与实体
pub use domain::{
    ActionType, AuditCounts, AuditEntry, BatchItemOutcome, BatchStatus, CooldownRecord,
    CooldownStatus, DormantSubject, LikeState, PendingLike, ProcessingBatch,
};

// 引擎
pub use engine::{
    BatchError, BatchProcessor, BatchRequest, BatchSelectionValidator, CooldownGuard,
    DashboardAggregator, DormancyClassifier, RejectionAllocator,
};

// API
pub use api::{ApiError, ConfigApi, DashboardApi, TriageApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "沉睡账号点赞分拣系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
