// ==========================================
// 沉睡账号点赞分拣系统 - 处理批次数据仓储
// ==========================================
// 红线: 批次只以终态写入一次, 之后不可变（触发器兜底）
// 存储: processing_batch + batch_item_outcome
// ==========================================

use crate::db::format_datetime;
use crate::domain::batch::{BatchItemOutcome, ProcessingBatch};
use crate::domain::types::{ActionType, BatchStatus};
use crate::repository::db_utils::{column_datetime, column_datetime_opt, column_enum};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};

const BATCH_COLUMNS: &str = r#"
    batch_id, subject_id, operator_id, requested_like_ids, rejection_rate,
    status, failure_reason, created_at, finished_at
"#;

pub struct BatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BatchRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 事务内写入批次及逐条结果
    pub fn insert_tx(tx: &Transaction, batch: &ProcessingBatch) -> RepositoryResult<()> {
        if !batch.status.is_terminal() {
            return Err(RepositoryError::InvalidStateTransition {
                from: batch.status.to_string(),
                to: "PERSISTED".to_string(),
            });
        }

        let requested = serde_json::to_string(&batch.requested_like_ids)
            .map_err(|e| RepositoryError::InternalError(e.to_string()))?;

        tx.execute(
            &format!(
                "INSERT INTO processing_batch ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                BATCH_COLUMNS
            ),
            params![
                batch.batch_id,
                batch.subject_id,
                batch.operator_id,
                requested,
                batch.rejection_rate,
                batch.status.to_db_str(),
                batch.failure_reason,
                format_datetime(&batch.created_at),
                batch.finished_at.as_ref().map(format_datetime),
            ],
        )?;

        let mut stmt = tx.prepare(
            r#"
            INSERT INTO batch_item_outcome (batch_id, seq_no, like_id, action_type, success, error)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )?;
        for (seq_no, outcome) in batch.outcomes.iter().enumerate() {
            stmt.execute(params![
                batch.batch_id,
                seq_no as i64,
                outcome.like_id,
                outcome.action_type.to_db_str(),
                outcome.success as i32,
                outcome.error,
            ])?;
        }

        Ok(())
    }

    /// 独立事务写入批次（用于回滚之后记录 FAILED 批次）
    pub fn insert(&self, batch: &ProcessingBatch) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        Self::insert_tx(&tx, batch)?;
        tx.commit()?;
        Ok(())
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find_by_id(&self, batch_id: &str) -> RepositoryResult<Option<ProcessingBatch>> {
        let conn = self.get_conn()?;
        let batch = conn
            .query_row(
                &format!("SELECT {} FROM processing_batch WHERE batch_id = ?1", BATCH_COLUMNS),
                params![batch_id],
                map_row,
            )
            .optional()?;

        match batch {
            Some(mut batch) => {
                batch.outcomes = Self::load_outcomes(&conn, &batch.batch_id)?;
                Ok(Some(batch))
            }
            None => Ok(None),
        }
    }

    /// 查询账号最近的批次（新 → 旧）
    pub fn list_by_subject(&self, subject_id: &str, limit: i64) -> RepositoryResult<Vec<ProcessingBatch>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM processing_batch
            WHERE subject_id = ?1
            ORDER BY created_at DESC, batch_id DESC
            LIMIT ?2
            "#,
            BATCH_COLUMNS
        ))?;
        let mut batches = stmt
            .query_map(params![subject_id, limit], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        for batch in batches.iter_mut() {
            batch.outcomes = Self::load_outcomes(&conn, &batch.batch_id)?;
        }
        Ok(batches)
    }

    fn load_outcomes(conn: &Connection, batch_id: &str) -> RepositoryResult<Vec<BatchItemOutcome>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT like_id, action_type, success, error
            FROM batch_item_outcome
            WHERE batch_id = ?1
            ORDER BY seq_no ASC
            "#,
        )?;
        let outcomes = stmt
            .query_map(params![batch_id], |row| {
                Ok(BatchItemOutcome {
                    like_id: row.get(0)?,
                    action_type: column_enum(row, 1, ActionType::from_str)?,
                    success: row.get::<_, i32>(2)? != 0,
                    error: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(outcomes)
    }
}

fn map_row(row: &Row) -> SqliteResult<ProcessingBatch> {
    let requested_raw: String = row.get(3)?;
    let requested_like_ids: Vec<String> = serde_json::from_str(&requested_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(ProcessingBatch {
        batch_id: row.get(0)?,
        subject_id: row.get(1)?,
        operator_id: row.get(2)?,
        requested_like_ids,
        rejection_rate: row.get(4)?,
        status: column_enum(row, 5, BatchStatus::from_str)?,
        outcomes: Vec::new(),
        failure_reason: row.get(6)?,
        created_at: column_datetime(row, 7)?,
        finished_at: column_datetime_opt(row, 8)?,
    })
}
