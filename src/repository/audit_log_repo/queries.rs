use super::core::AuditLogRepository;
use crate::db::format_datetime;
use crate::domain::audit::{AuditCounts, AuditEntry};
use crate::domain::types::ActionType;
use crate::repository::db_utils::{column_datetime, column_enum};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDateTime;
use rusqlite::{params, Result as SqliteResult, Row};

const AUDIT_COLUMNS: &str =
    "entry_id, batch_id, subject_id, operator_id, like_id, action_type, created_at";

impl AuditLogRepository {
    // ==========================================
    // 查询操作（只读投影）
    // ==========================================

    /// 查询操作人的审计记录（新 → 旧）
    pub fn list_by_operator(&self, operator_id: &str, limit: i64) -> RepositoryResult<Vec<AuditEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM audit_entry
            WHERE operator_id = ?1
            ORDER BY created_at DESC, entry_id ASC
            LIMIT ?2
            "#,
            AUDIT_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![operator_id, limit], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(entries)
    }

    /// 查询账号的审计记录（新 → 旧）
    pub fn list_by_subject(&self, subject_id: &str, limit: i64) -> RepositoryResult<Vec<AuditEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM audit_entry
            WHERE subject_id = ?1
            ORDER BY created_at DESC, entry_id ASC
            LIMIT ?2
            "#,
            AUDIT_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![subject_id, limit], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(entries)
    }

    /// 查询批次的审计记录
    pub fn list_by_batch(&self, batch_id: &str) -> RepositoryResult<Vec<AuditEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM audit_entry WHERE batch_id = ?1 ORDER BY rowid ASC",
            AUDIT_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![batch_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(entries)
    }

    /// 统计时间窗口 [start, end) 内的处理数
    pub fn count_by_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<AuditCounts> {
        let conn = self.get_conn()?;
        let counts = conn.query_row(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN action_type = 'VIEWED' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN action_type = 'REJECTED' THEN 1 ELSE 0 END), 0)
            FROM audit_entry
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
            params![format_datetime(&start), format_datetime(&end)],
            |row| {
                Ok(AuditCounts {
                    processed: row.get(0)?,
                    viewed: row.get(1)?,
                    rejected: row.get(2)?,
                })
            },
        )?;
        Ok(counts)
    }
}

fn map_row(row: &Row) -> SqliteResult<AuditEntry> {
    Ok(AuditEntry {
        entry_id: row.get(0)?,
        batch_id: row.get(1)?,
        subject_id: row.get(2)?,
        operator_id: row.get(3)?,
        like_id: row.get(4)?,
        action_type: column_enum(row, 5, ActionType::from_str)?,
        created_at: column_datetime(row, 6)?,
    })
}
