// ==========================================
// 沉睡账号点赞分拣系统 - 冷却记录数据仓储
// ==========================================
// 红线: 写入只发生在批处理事务内（upsert_tx）
// 存储: cooldown_record 表, subject_id → 记录
// ==========================================

use crate::db::format_datetime;
use crate::domain::cooldown::CooldownRecord;
use crate::repository::db_utils::column_datetime;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row, Transaction};
use std::sync::{Arc, Mutex};

pub struct CooldownRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CooldownRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 查询账号冷却记录
    pub fn find_by_subject(&self, subject_id: &str) -> RepositoryResult<Option<CooldownRecord>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Self::query_one(&conn, subject_id)
    }

    /// 事务内查询（与点赞流转共享同一事务）
    pub fn find_by_subject_tx(
        tx: &Transaction,
        subject_id: &str,
    ) -> RepositoryResult<Option<CooldownRecord>> {
        Self::query_one(tx, subject_id)
    }

    /// 覆盖写入冷却记录
    pub fn upsert_tx(tx: &Transaction, record: &CooldownRecord) -> RepositoryResult<()> {
        tx.execute(
            r#"
            INSERT INTO cooldown_record (subject_id, last_batch_at, lockout_minutes)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(subject_id) DO UPDATE SET
                last_batch_at = excluded.last_batch_at,
                lockout_minutes = excluded.lockout_minutes
            "#,
            params![
                record.subject_id,
                format_datetime(&record.last_batch_at),
                record.lockout_minutes,
            ],
        )?;
        Ok(())
    }

    fn query_one(conn: &Connection, subject_id: &str) -> RepositoryResult<Option<CooldownRecord>> {
        let record = conn
            .query_row(
                r#"
                SELECT subject_id, last_batch_at, lockout_minutes
                FROM cooldown_record
                WHERE subject_id = ?1
                "#,
                params![subject_id],
                map_row,
            )
            .optional()?;
        Ok(record)
    }
}

fn map_row(row: &Row) -> SqliteResult<CooldownRecord> {
    Ok(CooldownRecord {
        subject_id: row.get(0)?,
        last_batch_at: column_datetime(row, 1)?,
        lockout_minutes: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_upsert_overwrites_previous_record() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO dormant_subject VALUES ('S1', 'n', '@n', 10, '2026-01-01 00:00:00')",
            [],
        )
        .unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let repo = CooldownRepository::new(conn.clone());

        assert!(repo.find_by_subject("S1").unwrap().is_none());

        let first = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
        let second = first + chrono::Duration::hours(3);
        for (at, lockout) in [(first, 60), (second, 90)] {
            let mut guard = conn.lock().unwrap();
            let tx = guard.transaction().unwrap();
            CooldownRepository::upsert_tx(
                &tx,
                &CooldownRecord {
                    subject_id: "S1".to_string(),
                    last_batch_at: at,
                    lockout_minutes: lockout,
                },
            )
            .unwrap();
            tx.commit().unwrap();
        }

        let record = repo.find_by_subject("S1").unwrap().unwrap();
        assert_eq!(record.last_batch_at, second);
        assert_eq!(record.lockout_minutes, 90);
    }
}
