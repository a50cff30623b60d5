use crate::db::format_datetime;
use crate::domain::audit::AuditEntry;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Transaction};
use std::sync::{Arc, Mutex};

// ==========================================
// AuditLogRepository - 审计日志仓储
// ==========================================
pub struct AuditLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AuditLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作（只追加）
    // ==========================================

    /// 追加审计条目（独立事务）
    ///
    /// # 返回
    /// - `Ok(count)`: 写入条数
    pub fn append(&self, entries: &[AuditEntry]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let count = Self::append_tx(&tx, entries)?;
        tx.commit()?;
        Ok(count)
    }

    /// 事务内追加审计条目（批处理提交时使用）
    pub fn append_tx(tx: &Transaction, entries: &[AuditEntry]) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO audit_entry (
                entry_id, batch_id, subject_id, operator_id, like_id, action_type, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )?;

        let mut count = 0;
        for entry in entries {
            stmt.execute(params![
                entry.entry_id,
                entry.batch_id,
                entry.subject_id,
                entry.operator_id,
                entry.like_id,
                entry.action_type.to_db_str(),
                format_datetime(&entry.created_at),
            ])?;
            count += 1;
        }

        Ok(count)
    }
}
