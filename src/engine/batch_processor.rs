// ==========================================
// 沉睡账号点赞分拣系统 - 批处理器
// ==========================================
// 状态机: RUNNING → {COMPLETED, FAILED}（终态不可再变）
// 红线: 全有或全无, 外部读者永远看不到部分结果
// ==========================================
// 流程（单个 BEGIN IMMEDIATE 事务内）:
//   1. 冷却判定       → CooldownActive, 零变更
//   2. 选择校验       → Selection(..), 零变更
//   3. 拒绝分配       → 前 k 条拒绝
//   4. 逐条 CAS 流转  PENDING → REJECTED|VIEWED
//   5. 写冷却记录 + 审计条目 + COMPLETED 批次, 提交
// 校验通过之后失败（配置不可用、CAS 冲突、存储故障）: 事务回滚, 另起事务写入 FAILED 批次
// 校验之前的存储故障: 事务回滚, 返回 Failed, 不写批次
// ==========================================

use crate::config::TriageConfigReader;
use crate::domain::audit::AuditEntry;
use crate::domain::batch::{BatchItemOutcome, ProcessingBatch};
use crate::domain::types::BatchStatus;
use crate::engine::cooldown_guard::CooldownGuard;
use crate::engine::rejection_allocator::RejectionAllocator;
use crate::engine::selection_validator::{BatchSelectionValidator, SelectionRejection};
use crate::i18n;
use crate::repository::{AuditLogRepository, BatchRepository, LikeRepository, RepositoryError};
use chrono::NaiveDateTime;
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

// ==========================================
// BatchRequest - 批次提交请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub subject_id: String,
    pub operator_id: String,
    pub like_ids: Vec<String>,
    pub rejection_rate: f64,
}

// ==========================================
// BatchError - 批处理错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BatchError {
    /// 前置条件: 冷却中（不自动重试）
    #[error("账号冷却中, 剩余 {remaining_minutes} 分钟")]
    CooldownActive {
        remaining_minutes: i64,
        can_process_at: Option<NaiveDateTime>,
    },

    /// 前置条件: 选择不合法（不自动重试）
    #[error(transparent)]
    Selection(#[from] SelectionRejection),

    /// 请求参数非法（不产生批次）
    #[error("请求参数非法: {0}")]
    InvalidInput(String),

    /// 并发冲突或存储故障, 已整体回滚（可安全重试）
    #[error("批次 {batch_id} 失败: {reason}")]
    Failed { batch_id: String, reason: String },
}

impl BatchError {
    /// 是否为可安全重试的失败
    pub fn is_retryable(&self) -> bool {
        matches!(self, BatchError::Failed { .. })
    }
}

// 事务内执行失败的分类
enum ExecutionFailure {
    Precondition(BatchError),
    // 选择尚未校验, 请求内容不可作为批次记录
    Unvalidated(String),
    ConfigUnavailable(String),
    Conflict { like_id: String },
    Storage(String),
}

impl ExecutionFailure {
    fn unvalidated(err: impl std::fmt::Display) -> Self {
        ExecutionFailure::Unvalidated(err.to_string())
    }
}

impl From<RepositoryError> for ExecutionFailure {
    fn from(err: RepositoryError) -> Self {
        ExecutionFailure::Storage(err.to_string())
    }
}

impl From<rusqlite::Error> for ExecutionFailure {
    fn from(err: rusqlite::Error) -> Self {
        ExecutionFailure::Storage(err.to_string())
    }
}

// ==========================================
// BatchProcessor
// ==========================================
pub struct BatchProcessor<C>
where
    C: TriageConfigReader,
{
    conn: Arc<Mutex<Connection>>,
    config: Arc<C>,
    batch_repo: Arc<BatchRepository>,
}

impl<C> BatchProcessor<C>
where
    C: TriageConfigReader,
{
    pub fn new(conn: Arc<Mutex<Connection>>, config: Arc<C>, batch_repo: Arc<BatchRepository>) -> Self {
        Self {
            conn,
            config,
            batch_repo,
        }
    }

    /// 提交批次
    ///
    /// # 返回
    /// - Ok(ProcessingBatch): 状态为 COMPLETED, 含逐条结果
    /// - Err(BatchError): 前置条件失败（零变更）或 Failed（已回滚, FAILED 批次已记录）
    #[instrument(
        skip(self, request),
        fields(subject_id = %request.subject_id, operator_id = %request.operator_id)
    )]
    pub async fn submit(
        &self,
        request: BatchRequest,
        now: NaiveDateTime,
    ) -> Result<ProcessingBatch, BatchError> {
        Self::check_request(&request)?;

        let batch_id = Uuid::new_v4().to_string();

        // 配置故障留到前置条件之后再报告, 冷却与选择错误优先
        let lockout_minutes = self
            .config
            .get_lockout_minutes()
            .await
            .map_err(|e| e.to_string());

        match self.execute(&batch_id, &request, lockout_minutes, now) {
            Ok(batch) => {
                tracing::info!(
                    batch_id = %batch.batch_id,
                    processed = batch.processed_count(),
                    viewed = batch.viewed_count(),
                    rejected = batch.rejected_count(),
                    "批次已提交"
                );
                Ok(batch)
            }
            Err(ExecutionFailure::Precondition(err)) => {
                tracing::warn!(reason = %err, "批次前置条件未通过");
                Err(err)
            }
            Err(ExecutionFailure::Unvalidated(detail)) => {
                let reason = i18n::storage_failed(&detail);
                tracing::warn!(batch_id = %batch_id, reason = %reason, "批次失败(校验前), 不记录批次");
                Err(BatchError::Failed { batch_id, reason })
            }
            Err(ExecutionFailure::ConfigUnavailable(detail)) => {
                let reason = i18n::config_unavailable(&detail);
                let outcomes = Self::rolled_back_outcomes(&request, None);
                Err(self.record_failure(&batch_id, &request, outcomes, reason, now))
            }
            Err(ExecutionFailure::Conflict { like_id }) => {
                let reason = i18n::item_conflict(&like_id);
                let outcomes =
                    Self::rolled_back_outcomes(&request, Some((like_id.as_str(), reason.as_str())));
                Err(self.record_failure(&batch_id, &request, outcomes, reason, now))
            }
            Err(ExecutionFailure::Storage(detail)) => {
                let reason = i18n::storage_failed(&detail);
                let outcomes = Self::rolled_back_outcomes(&request, None);
                Err(self.record_failure(&batch_id, &request, outcomes, reason, now))
            }
        }
    }

    fn check_request(request: &BatchRequest) -> Result<(), BatchError> {
        if request.operator_id.trim().is_empty() {
            return Err(BatchError::InvalidInput("operator_id 不能为空".to_string()));
        }
        if request.subject_id.trim().is_empty() {
            return Err(BatchError::InvalidInput("subject_id 不能为空".to_string()));
        }
        let rate = request.rejection_rate;
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(BatchError::InvalidInput(format!(
                "rejection_rate 必须在 [0, 1] 内: {}",
                rate
            )));
        }
        Ok(())
    }

    // ==========================================
    // 事务内执行（同步, 不跨 await 持锁）
    // ==========================================
    fn execute(
        &self,
        batch_id: &str,
        request: &BatchRequest,
        lockout_minutes: Result<i64, String>,
        now: NaiveDateTime,
    ) -> Result<ProcessingBatch, ExecutionFailure> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| ExecutionFailure::Unvalidated(format!("锁获取失败: {}", e)))?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(ExecutionFailure::unvalidated)?;
        let subject_id = request.subject_id.as_str();

        // === 步骤 1: 冷却 ===
        let cooldown =
            CooldownGuard::status_tx(&tx, subject_id, now).map_err(ExecutionFailure::unvalidated)?;
        if cooldown.is_on_cooldown {
            return Err(ExecutionFailure::Precondition(BatchError::CooldownActive {
                remaining_minutes: cooldown.remaining_minutes,
                can_process_at: cooldown.can_process_at,
            }));
        }

        // === 步骤 2: 选择校验 ===
        let current = LikeRepository::find_by_ids_tx(&tx, &request.like_ids)
            .map_err(ExecutionFailure::unvalidated)?;
        let selection = BatchSelectionValidator::validate(subject_id, &request.like_ids, &current)
            .map_err(|e| ExecutionFailure::Precondition(e.into()))?;
        let lockout_minutes = lockout_minutes.map_err(ExecutionFailure::ConfigUnavailable)?;

        // === 步骤 3/4: 分配 + 逐条流转 ===
        let plan = RejectionAllocator::assign(selection.like_ids(), request.rejection_rate);
        let mut outcomes = Vec::with_capacity(plan.len());
        for (like_id, action) in plan {
            let moved =
                LikeRepository::transition_tx(&tx, &like_id, subject_id, action.target_state(), now)?;
            if !moved {
                return Err(ExecutionFailure::Conflict { like_id });
            }
            outcomes.push(BatchItemOutcome {
                like_id,
                action_type: action,
                success: true,
                error: None,
            });
        }

        // === 步骤 5: 冷却 + 审计 + 批次 ===
        CooldownGuard::record_tx(&tx, subject_id, now, lockout_minutes)?;

        let entries: Vec<AuditEntry> = outcomes
            .iter()
            .map(|outcome| AuditEntry {
                entry_id: Uuid::new_v4().to_string(),
                batch_id: batch_id.to_string(),
                subject_id: subject_id.to_string(),
                operator_id: request.operator_id.clone(),
                like_id: outcome.like_id.clone(),
                action_type: outcome.action_type,
                created_at: now,
            })
            .collect();
        AuditLogRepository::append_tx(&tx, &entries)?;

        let batch = ProcessingBatch {
            batch_id: batch_id.to_string(),
            subject_id: subject_id.to_string(),
            operator_id: request.operator_id.clone(),
            requested_like_ids: selection.like_ids().to_vec(),
            rejection_rate: request.rejection_rate,
            status: BatchStatus::Completed,
            outcomes,
            failure_reason: None,
            created_at: now,
            finished_at: Some(now),
        };
        BatchRepository::insert_tx(&tx, &batch)?;

        tx.commit()?;
        Ok(batch)
    }

    // ==========================================
    // 失败处理
    // ==========================================

    /// 回滚后逐条结果: 全部未生效
    ///
    /// 只在选择校验通过后调用, request.like_ids 即已校验的快照
    fn rolled_back_outcomes(
        request: &BatchRequest,
        culprit: Option<(&str, &str)>,
    ) -> Vec<BatchItemOutcome> {
        let rolled_back = i18n::item_rolled_back();
        RejectionAllocator::assign(&request.like_ids, request.rejection_rate)
            .into_iter()
            .map(|(like_id, action_type)| {
                let error = match culprit {
                    Some((id, reason)) if id == like_id => reason.to_string(),
                    _ => rolled_back.clone(),
                };
                BatchItemOutcome {
                    like_id,
                    action_type,
                    success: false,
                    error: Some(error),
                }
            })
            .collect()
    }

    /// 记录 FAILED 批次并生成错误（记录失败只告警, 不影响返回）
    fn record_failure(
        &self,
        batch_id: &str,
        request: &BatchRequest,
        outcomes: Vec<BatchItemOutcome>,
        reason: String,
        now: NaiveDateTime,
    ) -> BatchError {
        let batch = ProcessingBatch {
            batch_id: batch_id.to_string(),
            subject_id: request.subject_id.clone(),
            operator_id: request.operator_id.clone(),
            requested_like_ids: request.like_ids.clone(),
            rejection_rate: request.rejection_rate,
            status: BatchStatus::Failed,
            outcomes,
            failure_reason: Some(reason.clone()),
            created_at: now,
            finished_at: Some(now),
        };

        if let Err(e) = self.batch_repo.insert(&batch) {
            tracing::warn!(batch_id = batch_id, error = %e, "FAILED 批次记录写入失败");
        }
        tracing::warn!(batch_id = batch_id, reason = %reason, "批次失败, 已回滚");

        BatchError::Failed {
            batch_id: batch_id.to_string(),
            reason,
        }
    }
}
