// ==========================================
// 沉睡账号点赞分拣系统 - 分拣 API
// ==========================================
// 职责: 准入列表、待处理点赞、冷却状态、批次提交与查询
// 说明: 当前时间取本地时钟, 引擎层一律显式传入
// ==========================================

use crate::api::dto::{BatchResponse, EligibleSubjectsResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::config::TriageConfigReader;
use crate::domain::batch::ProcessingBatch;
use crate::domain::cooldown::CooldownStatus;
use crate::domain::like::PendingLike;
use crate::engine::{
    BatchProcessor, BatchRequest, CooldownGuard, DormancyClassifier, EligibleQuery,
};
use crate::repository::{BatchRepository, LikeRepository, SubjectRepository};
use chrono::NaiveDateTime;
use std::sync::Arc;

// ==========================================
// TriageApi - 分拣 API
// ==========================================
pub struct TriageApi<C>
where
    C: TriageConfigReader,
{
    config: Arc<C>,
    subject_repo: Arc<SubjectRepository>,
    like_repo: Arc<LikeRepository>,
    batch_repo: Arc<BatchRepository>,
    classifier: Arc<DormancyClassifier<C>>,
    cooldown_guard: Arc<CooldownGuard>,
    batch_processor: Arc<BatchProcessor<C>>,
}

impl<C> TriageApi<C>
where
    C: TriageConfigReader,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<C>,
        subject_repo: Arc<SubjectRepository>,
        like_repo: Arc<LikeRepository>,
        batch_repo: Arc<BatchRepository>,
        classifier: Arc<DormancyClassifier<C>>,
        cooldown_guard: Arc<CooldownGuard>,
        batch_processor: Arc<BatchProcessor<C>>,
    ) -> Self {
        Self {
            config,
            subject_repo,
            like_repo,
            batch_repo,
            classifier,
            cooldown_guard,
            batch_processor,
        }
    }

    fn now() -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    fn ensure_subject(&self, subject_id: &str) -> ApiResult<()> {
        if subject_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("subject_id 不能为空".to_string()));
        }
        match self.subject_repo.find_by_id(subject_id)? {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound(format!("DormantSubject(id={})不存在", subject_id))),
        }
    }

    // ==========================================
    // 读接口
    // ==========================================

    /// 分页查询可分拣账号
    pub async fn list_eligible_subjects(
        &self,
        inactivity_days: Option<i64>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> ApiResult<EligibleSubjectsResponse> {
        let query = EligibleQuery {
            inactivity_days,
            page,
            limit,
        };
        let page = self.classifier.list_eligible_subjects(query, Self::now()).await?;
        Ok(page.into())
    }

    /// 查询账号下的 PENDING 点赞（顺序即分配规则使用的顺序）
    pub fn list_pending_likes(&self, subject_id: &str) -> ApiResult<Vec<PendingLike>> {
        self.ensure_subject(subject_id)?;
        Ok(self.like_repo.list_pending_by_subject(subject_id)?)
    }

    /// 查询账号冷却状态
    pub fn get_cooldown_status(&self, subject_id: &str) -> ApiResult<CooldownStatus> {
        self.ensure_subject(subject_id)?;
        Ok(self.cooldown_guard.status(subject_id, Self::now())?)
    }

    /// 查询批次（含逐条结果）
    pub fn get_batch(&self, batch_id: &str) -> ApiResult<ProcessingBatch> {
        self.batch_repo
            .find_by_id(batch_id)?
            .ok_or_else(|| ApiError::NotFound(format!("ProcessingBatch(id={})不存在", batch_id)))
    }

    /// 查询账号最近的批次
    pub async fn list_batches_by_subject(
        &self,
        subject_id: &str,
        limit: Option<i64>,
    ) -> ApiResult<Vec<ProcessingBatch>> {
        self.ensure_subject(subject_id)?;
        let limit = self.resolve_limit(limit).await?;
        Ok(self.batch_repo.list_by_subject(subject_id, limit)?)
    }

    // ==========================================
    // 写接口
    // ==========================================

    /// 提交批次
    pub async fn submit_batch(&self, request: BatchRequest) -> ApiResult<BatchResponse> {
        self.ensure_subject(&request.subject_id)?;
        let batch = self.batch_processor.submit(request, Self::now()).await?;
        Ok(batch.into())
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
