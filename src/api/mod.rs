// ==========================================
// 沉睡账号点赞分拣系统 - API 层
// ==========================================
// 职责: 对外读写接口, 统一错误原因码
// ==========================================

pub mod config_api;
pub mod dashboard_api;
pub mod dto;
pub mod error;
pub mod triage_api;

pub use config_api::ConfigApi;
pub use dashboard_api::DashboardApi;
pub use dto::{BatchResponse, EligibleSubjectsResponse, TriageConfigView};
pub use error::{ApiError, ApiResult};
pub use triage_api::TriageApi;
