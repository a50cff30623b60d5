// ==========================================
// 沉睡账号点赞分拣系统 - 看板汇总
// ==========================================
// 职责: 按调用方的自然日窗口汇总处理量
// 红线: 只读, 不写任何数据
// 数据源: totalPending 实时计数; 当日数据来自审计日志
// ==========================================

use crate::config::TriageConfigReader;
use crate::domain::audit::AuditCounts;
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::{AuditLogRepository, SubjectRepository};
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// TodaySummary - 当日汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    pub total_pending: i64,
    pub processed_today: i64,
    pub viewed_today: i64,
    pub rejected_today: i64,
}

/// 自然日窗口 [当日 00:00, 次日 00:00)
pub fn day_window(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let start = now.date().and_time(NaiveTime::default());
    let end = start
        .checked_add_signed(TimeDelta::days(1))
        .unwrap_or(NaiveDateTime::MAX);
    (start, end)
}

/// 不活跃天数对应的最后活跃时间上限
///
/// 天数超出可表示的时间范围时返回 InvalidInput
pub fn inactivity_cutoff(now: NaiveDateTime, inactivity_days: i64) -> EngineResult<NaiveDateTime> {
    TimeDelta::try_days(inactivity_days)
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or_else(|| {
            EngineError::InvalidInput(format!("inactivity_days 超出范围: {}", inactivity_days))
        })
}

// ==========================================
// DashboardAggregator
// ==========================================
pub struct DashboardAggregator<C>
where
    C: TriageConfigReader,
{
    config: Arc<C>,
    subject_repo: Arc<SubjectRepository>,
    audit_repo: Arc<AuditLogRepository>,
}

impl<C> DashboardAggregator<C>
where
    C: TriageConfigReader,
{
    pub fn new(
        config: Arc<C>,
        subject_repo: Arc<SubjectRepository>,
        audit_repo: Arc<AuditLogRepository>,
    ) -> Self {
        Self {
            config,
            subject_repo,
            audit_repo,
        }
    }

    /// 当日汇总
    #[instrument(skip(self))]
    pub async fn today_summary(&self, now: NaiveDateTime) -> EngineResult<TodaySummary> {
        let inactivity_days = self.config.get_default_inactivity_days().await?;
        let cutoff = inactivity_cutoff(now, inactivity_days)?;

        let total_pending = self.subject_repo.count_pending_likes_of_eligible(cutoff)?;
        let today = self.today_counts(now)?;

        Ok(TodaySummary {
            total_pending,
            processed_today: today.processed,
            viewed_today: today.viewed,
            rejected_today: today.rejected,
        })
    }

    /// 当日审计计数
    pub fn today_counts(&self, now: NaiveDateTime) -> EngineResult<AuditCounts> {
        let (start, end) = day_window(now);
        Ok(self.audit_repo.count_by_date_range(start, end)?)
    }
}
