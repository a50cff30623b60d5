// ==========================================
// 沉睡账号点赞分拣系统 - 沉睡准入分类
// ==========================================
// 准入: now - lastSeenAt >= 不活跃天数 ∧ creditBalance > 0 ∧ pendingLikeCount > 0
// 红线: 无状态只读
// 附带当日处理计数（仅供参考, 来自审计日志）
// ==========================================

use crate::config::TriageConfigReader;
use crate::domain::audit::AuditCounts;
use crate::domain::subject::DormantSubject;
use crate::engine::dashboard_aggregator::{day_window, inactivity_cutoff};
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::{AuditLogRepository, SubjectRepository};
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// EligibleSubjectPage - 准入账号分页结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleSubjectPage {
    pub users: Vec<DormantSubject>,
    pub total_users: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub total_pending_likes: i64,
    pub today: AuditCounts,
}

/// 分页参数（None 表示使用默认值）
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibleQuery {
    pub inactivity_days: Option<i64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// ==========================================
// DormancyClassifier
// ==========================================
pub struct DormancyClassifier<C>
where
    C: TriageConfigReader,
{
    config: Arc<C>,
    subject_repo: Arc<SubjectRepository>,
    audit_repo: Arc<AuditLogRepository>,
}

impl<C> DormancyClassifier<C>
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

    /// 分页列出可分拣的沉睡账号
    ///
    /// # 分页规则
    /// - page 从 1 开始, 0 或负数按 1 处理
    /// - limit 缺省取配置默认值, 上限为配置最大值
    #[instrument(skip(self))]
    pub async fn list_eligible_subjects(
        &self,
        query: EligibleQuery,
        now: NaiveDateTime,
    ) -> EngineResult<EligibleSubjectPage> {
        let inactivity_days = match query.inactivity_days {
            Some(days) if days < 0 => {
                return Err(EngineError::InvalidInput(format!(
                    "inactivity_days 不能为负数: {}",
                    days
                )))
            }
            Some(days) => days,
            None => self.config.get_default_inactivity_days().await?,
        };
        let default_limit = self.config.get_default_page_size().await?;
        let max_limit = self.config.get_max_page_size().await?;

        let limit = query
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(default_limit)
            .min(max_limit)
            .max(1);
        let page = query.page.unwrap_or(1).max(1);
        let offset = (page - 1).saturating_mul(limit);

        let cutoff = inactivity_cutoff(now, inactivity_days)?;
        let users = self.subject_repo.list_eligible(cutoff, limit, offset)?;
        let total_users = self.subject_repo.count_eligible(cutoff)?;
        let total_pending_likes = self.subject_repo.count_pending_likes_of_eligible(cutoff)?;

        let (start, end) = day_window(now);
        let today = self.audit_repo.count_by_date_range(start, end)?;

        tracing::debug!(
            inactivity_days,
            page,
            limit,
            total_users,
            returned = users.len(),
            "准入账号查询完成"
        );

        Ok(EligibleSubjectPage {
            users,
            total_users,
            page,
            limit,
            total_pages: (total_users + limit - 1) / limit,
            total_pending_likes,
            today,
        })
    }
}
