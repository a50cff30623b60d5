// ==========================================
// 沉睡账号点赞分拣系统 - 冷却守卫
// ==========================================
// 规则: remaining = max(0, lockout - 已过分钟数), onCooldown = remaining > 0
// 红线: 冷却判定与记录必须与点赞流转处于同一事务（见 BatchProcessor）
// 说明: 惰性求值, 无后台调度
// ==========================================

use crate::domain::cooldown::{CooldownRecord, CooldownStatus};
use crate::repository::cooldown_repo::CooldownRepository;
use crate::repository::error::RepositoryResult;
use chrono::NaiveDateTime;
use rusqlite::Transaction;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// CooldownGuard - 冷却守卫
// ==========================================
pub struct CooldownGuard {
    cooldown_repo: Arc<CooldownRepository>,
}

impl CooldownGuard {
    pub fn new(cooldown_repo: Arc<CooldownRepository>) -> Self {
        Self { cooldown_repo }
    }

    /// 查询账号冷却状态（只读, 幂等）
    #[instrument(skip(self), level = "debug")]
    pub fn status(&self, subject_id: &str, now: NaiveDateTime) -> RepositoryResult<CooldownStatus> {
        let record = self.cooldown_repo.find_by_subject(subject_id)?;
        Ok(Self::evaluate(record.as_ref(), now))
    }

    /// 事务内查询冷却状态
    pub fn status_tx(
        tx: &Transaction,
        subject_id: &str,
        now: NaiveDateTime,
    ) -> RepositoryResult<CooldownStatus> {
        let record = CooldownRepository::find_by_subject_tx(tx, subject_id)?;
        Ok(Self::evaluate(record.as_ref(), now))
    }

    /// 事务内记录一次完成的批次（覆盖旧记录）
    pub fn record_tx(
        tx: &Transaction,
        subject_id: &str,
        at: NaiveDateTime,
        lockout_minutes: i64,
    ) -> RepositoryResult<CooldownRecord> {
        let record = CooldownRecord {
            subject_id: subject_id.to_string(),
            last_batch_at: at,
            lockout_minutes,
        };
        CooldownRepository::upsert_tx(tx, &record)?;
        Ok(record)
    }

    /// 纯计算: 由冷却记录推导状态
    ///
    /// 已过分钟数按整分钟截断; 时钟回拨（now 早于记录时间）按 0 分钟计
    pub fn evaluate(record: Option<&CooldownRecord>, now: NaiveDateTime) -> CooldownStatus {
        let record = match record {
            Some(record) => record,
            None => return CooldownStatus::idle(),
        };

        let elapsed = (now - record.last_batch_at).num_minutes().max(0);
        let remaining_minutes = record.lockout_minutes.saturating_sub(elapsed).max(0);

        CooldownStatus {
            is_on_cooldown: remaining_minutes > 0,
            remaining_minutes,
            last_processed_at: Some(record.last_batch_at),
            can_process_at: record.can_process_at(),
        }
    }
}
