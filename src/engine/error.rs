// ==========================================
// 沉睡账号点赞分拣系统 - 引擎层错误
// ==========================================
// 只读引擎（准入分类、看板汇总）的统一错误
// 批处理错误见 batch_processor::BatchError
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("仓储错误: {0}")]
    Repository(#[from] RepositoryError),

    #[error("配置读取失败: {0}")]
    Config(String),

    #[error("参数非法: {0}")]
    InvalidInput(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<Box<dyn std::error::Error + Send + Sync>> for EngineError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        EngineError::Config(err.to_string())
    }
}
