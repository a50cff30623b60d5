// ==========================================
// 沉睡账号点赞分拣系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型, 将引擎/仓储错误转换为带原因码的错误
// 约束: 前置条件错误与 BatchFailed 必须可区分（原因码稳定）
// ==========================================

use crate::engine::batch_processor::BatchError;
use crate::engine::error::EngineError;
use crate::engine::selection_validator::SelectionRejection;
use crate::repository::error::RepositoryError;
use chrono::NaiveDateTime;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 分拣前置条件错误（不自动重试）
    // ==========================================
    #[error("账号冷却中, 剩余 {remaining_minutes} 分钟")]
    CooldownActive {
        remaining_minutes: i64,
        can_process_at: Option<NaiveDateTime>,
    },

    #[error("选择数量超限: {count} > {max}")]
    TooManySelected { count: usize, max: usize },

    #[error("未选择任何点赞")]
    EmptySelection,

    #[error("点赞已处理或不属于该账号: {0}")]
    StaleOrForeignLike(String),

    #[error("重复选择: {0}")]
    DuplicateSelection(String),

    // ==========================================
    // 批次失败（已回滚, 可安全重试）
    // ==========================================
    #[error("批次失败: batch_id={batch_id}, {reason}")]
    BatchFailed { batch_id: String, reason: String },

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("只追加数据不可修改: {0}")]
    AppendOnlyViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定的原因码（前端据此分支）
    pub fn reason_code(&self) -> &'static str {
        match self {
            ApiError::CooldownActive { .. } => "COOLDOWN_ACTIVE",
            ApiError::TooManySelected { .. } => "TOO_MANY_SELECTED",
            ApiError::EmptySelection => "EMPTY_SELECTION",
            ApiError::StaleOrForeignLike(_) => "STALE_OR_FOREIGN_LIKE",
            ApiError::DuplicateSelection(_) => "DUPLICATE_SELECTION",
            ApiError::BatchFailed { .. } => "BATCH_FAILED",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            ApiError::AppendOnlyViolation(_) => "APPEND_ONLY_VIOLATION",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
            ApiError::DatabaseTransactionError(_) => "DATABASE_TRANSACTION_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "UNKNOWN_ERROR",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::InvalidInput(format!("外键约束违反: {}", msg))
            }
            RepositoryError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }
            RepositoryError::AppendOnlyViolation(msg) => ApiError::AppendOnlyViolation(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从引擎错误转换
// ==========================================
impl From<SelectionRejection> for ApiError {
    fn from(err: SelectionRejection) -> Self {
        match err {
            SelectionRejection::EmptySelection => ApiError::EmptySelection,
            SelectionRejection::TooManySelected { count, max } => {
                ApiError::TooManySelected { count, max }
            }
            SelectionRejection::StaleOrForeignLike { like_id } => {
                ApiError::StaleOrForeignLike(like_id)
            }
            SelectionRejection::DuplicateSelection { like_id } => {
                ApiError::DuplicateSelection(like_id)
            }
        }
    }
}

impl From<BatchError> for ApiError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::CooldownActive {
                remaining_minutes,
                can_process_at,
            } => ApiError::CooldownActive {
                remaining_minutes,
                can_process_at,
            },
            BatchError::Selection(rejection) => rejection.into(),
            BatchError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            BatchError::Failed { batch_id, reason } => ApiError::BatchFailed { batch_id, reason },
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Repository(e) => e.into(),
            EngineError::Config(msg) => ApiError::InternalError(format!("配置读取失败: {}", msg)),
            EngineError::InvalidInput(msg) => ApiError::InvalidInput(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
