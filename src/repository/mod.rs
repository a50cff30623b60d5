// ==========================================
// 沉睡账号点赞分拣系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// 约束: 批处理事务内的读写走 `*_tx` 关联函数
// ==========================================

pub mod audit_log_repo;
pub mod batch_repo;
pub mod cooldown_repo;
pub mod db_utils;
pub mod error;
pub mod like_repo;
pub mod subject_repo;

// 重导出核心仓储
pub use audit_log_repo::AuditLogRepository;
pub use batch_repo::BatchRepository;
pub use cooldown_repo::CooldownRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use like_repo::LikeRepository;
pub use subject_repo::SubjectRepository;
