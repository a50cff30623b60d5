// ==========================================
// 沉睡账号点赞分拣系统 - 看板与审计 API
// ==========================================
// 职责: 当日汇总 + 审计日志只读投影
// 红线: 本模块无任何写路径
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::TriageConfigReader;
use crate::db::parse_datetime;
use crate::domain::audit::{AuditCounts, AuditEntry};
use crate::engine::{DashboardAggregator, TodaySummary};
use crate::repository::AuditLogRepository;
use chrono::NaiveDateTime;
use std::sync::Arc;

// ==========================================
// DashboardApi
// ==========================================
pub struct DashboardApi<C>
where
    C: TriageConfigReader,
{
    config: Arc<C>,
    aggregator: Arc<DashboardAggregator<C>>,
    audit_repo: Arc<AuditLogRepository>,
}

impl<C> DashboardApi<C>
where
    C: TriageConfigReader,
{
    pub fn new(
        config: Arc<C>,
        aggregator: Arc<DashboardAggregator<C>>,
        audit_repo: Arc<AuditLogRepository>,
    ) -> Self {
        Self {
            config,
            aggregator,
            audit_repo,
        }
    }

    /// 当日汇总（按本地自然日）
    pub async fn get_today_summary(&self) -> ApiResult<TodaySummary> {
        let now = chrono::Local::now().naive_local();
        Ok(self.aggregator.today_summary(now).await?)
    }

    /// 按操作员查询审计记录（新 → 旧）
    pub async fn list_audit_by_operator(
        &self,
        operator_id: &str,
        limit: Option<i64>,
    ) -> ApiResult<Vec<AuditEntry>> {
        if operator_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("operator_id 不能为空".to_string()));
        }
        let limit = self.resolve_limit(limit).await?;
        Ok(self.audit_repo.list_by_operator(operator_id, limit)?)
    }

    /// 按账号查询审计记录（新 → 旧）
    pub async fn list_audit_by_subject(
        &self,
        subject_id: &str,
        limit: Option<i64>,
    ) -> ApiResult<Vec<AuditEntry>> {
        if subject_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("subject_id 不能为空".to_string()));
        }
        let limit = self.resolve_limit(limit).await?;
        Ok(self.audit_repo.list_by_subject(subject_id, limit)?)
    }

    /// 按批次查询审计记录（提交顺序）
    pub fn list_audit_by_batch(&self, batch_id: &str) -> ApiResult<Vec<AuditEntry>> {
        Ok(self.audit_repo.list_by_batch(batch_id)?)
    }

    /// 统计时间窗口 [start, end) 内的处理数
    ///
    /// # 参数
    /// - start / end: "YYYY-MM-DD HH:MM:SS"
    pub fn count_by_date_range(&self, start: &str, end: &str) -> ApiResult<AuditCounts> {
        let start = parse_bound("start", start)?;
        let end = parse_bound("end", end)?;
        if end <= start {
            return Err(ApiError::InvalidInput(format!(
                "时间窗口非法: start={} end={}",
                start, end
            )));
        }
        Ok(self.audit_repo.count_by_date_range(start, end)?)
    }

    async fn resolve_limit(&self, limit: Option<i64>) -> ApiResult<i64> {
        let default_limit = self
            .config
            .get_default_page_size()
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        let max_limit = self
            .config
            .get_max_page_size()
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        Ok(limit.filter(|l| *l > 0).unwrap_or(default_limit).min(max_limit).max(1))
    }
}

fn parse_bound(field: &str, raw: &str) -> ApiResult<NaiveDateTime> {
    parse_datetime(raw.trim())
        .ok_or_else(|| ApiError::InvalidInput(format!("{} 时间格式错误: {}", field, raw)))
}
