// ==========================================
// 沉睡账号点赞分拣系统 - 点赞数据仓储
// ==========================================
// 红线: 点赞行永不删除; 状态流转只走 compare-and-set
// 约束: 列表顺序 (liked_at ASC, like_id ASC) 是分配规则依赖的顺序
// ==========================================

use crate::db::format_datetime;
use crate::domain::like::PendingLike;
use crate::domain::types::LikeState;
use crate::repository::db_utils::{column_datetime, column_enum, in_clause};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqliteResult, Row, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};

const LIKE_COLUMNS: &str = "like_id, subject_id, originator_id, liked_at, state";

// ==========================================
// LikeRepository - 点赞仓储
// ==========================================
pub struct LikeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LikeRepository {
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

    /// 登记一条点赞（外部点赞事件入口）
    pub fn insert(&self, like: &PendingLike) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            &format!("INSERT INTO pending_like ({}) VALUES (?1, ?2, ?3, ?4, ?5)", LIKE_COLUMNS),
            params![
                like.id,
                like.subject_id,
                like.originator_id,
                format_datetime(&like.liked_at),
                like.state.to_db_str(),
            ],
        )?;
        Ok(())
    }

    /// compare-and-set: PENDING → target
    ///
    /// # 返回
    /// - Ok(true): 本次调用完成了流转
    /// - Ok(false): 该点赞已不是 PENDING 或不属于该账号（被并发批次抢先）
    pub fn transition_tx(
        tx: &Transaction,
        like_id: &str,
        subject_id: &str,
        target: LikeState,
        resolved_at: NaiveDateTime,
    ) -> RepositoryResult<bool> {
        if !LikeState::Pending.can_transition_to(target) {
            return Err(RepositoryError::InvalidStateTransition {
                from: LikeState::Pending.to_string(),
                to: target.to_string(),
            });
        }

        let rows = tx.execute(
            r#"
            UPDATE pending_like
            SET state = ?1, resolved_at = ?2
            WHERE like_id = ?3 AND subject_id = ?4 AND state = 'PENDING'
            "#,
            params![
                target.to_db_str(),
                format_datetime(&resolved_at),
                like_id,
                subject_id,
            ],
        )?;
        Ok(rows == 1)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find_by_id(&self, like_id: &str) -> RepositoryResult<Option<PendingLike>> {
        let conn = self.get_conn()?;
        let like = conn
            .query_row(
                &format!("SELECT {} FROM pending_like WHERE like_id = ?1", LIKE_COLUMNS),
                params![like_id],
                map_row,
            )
            .optional()?;
        Ok(like)
    }

    /// 查询账号下的 PENDING 点赞（稳定顺序）
    pub fn list_pending_by_subject(&self, subject_id: &str) -> RepositoryResult<Vec<PendingLike>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM pending_like
            WHERE subject_id = ?1 AND state = 'PENDING'
            ORDER BY liked_at ASC, like_id ASC
            "#,
            LIKE_COLUMNS
        ))?;
        let likes = stmt
            .query_map(params![subject_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(likes)
    }

    /// 事务内按 ID 批量读取（不限账号/状态，由校验器判定）
    pub fn find_by_ids_tx(tx: &Transaction, like_ids: &[String]) -> RepositoryResult<Vec<PendingLike>> {
        if like_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {} FROM pending_like WHERE {}",
            LIKE_COLUMNS,
            in_clause("like_id", like_ids.len())
        );
        let mut stmt = tx.prepare(&sql)?;
        let likes = stmt
            .query_map(params_from_iter(like_ids.iter()), map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(likes)
    }
}

fn map_row(row: &Row) -> SqliteResult<PendingLike> {
    Ok(PendingLike {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        originator_id: row.get(2)?,
        liked_at: column_datetime(row, 3)?,
        state: column_enum(row, 4, LikeState::from_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn setup() -> (Arc<Mutex<Connection>>, LikeRepository) {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO dormant_subject VALUES ('S1', 'n', '@n', 10, '2026-01-01 00:00:00')",
            [],
        )
        .unwrap();
        let conn = Arc::new(Mutex::new(conn));
        (conn.clone(), LikeRepository::new(conn))
    }

    fn like(id: &str, liked_at: NaiveDateTime) -> PendingLike {
        PendingLike {
            id: id.to_string(),
            subject_id: "S1".to_string(),
            originator_id: format!("fan-{}", id),
            liked_at,
            state: LikeState::Pending,
        }
    }

    #[test]
    fn test_pending_list_is_stably_ordered() {
        let (_conn, repo) = setup();
        repo.insert(&like("b", ts(10, 0))).unwrap();
        repo.insert(&like("a", ts(10, 0))).unwrap();
        repo.insert(&like("c", ts(9, 0))).unwrap();

        let ids: Vec<_> = repo
            .list_pending_by_subject("S1")
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_transition_is_compare_and_set() {
        let (conn, repo) = setup();
        repo.insert(&like("l1", ts(8, 0))).unwrap();

        let mut guard = conn.lock().unwrap();
        let tx = guard.transaction().unwrap();
        assert!(LikeRepository::transition_tx(&tx, "l1", "S1", LikeState::Rejected, ts(12, 0)).unwrap());
        // 第二次已不是 PENDING
        assert!(!LikeRepository::transition_tx(&tx, "l1", "S1", LikeState::Viewed, ts(12, 1)).unwrap());
        tx.commit().unwrap();
        drop(guard);

        assert_eq!(repo.find_by_id("l1").unwrap().unwrap().state, LikeState::Rejected);
    }

    #[test]
    fn test_transition_rejects_foreign_subject_and_pending_target() {
        let (conn, repo) = setup();
        repo.insert(&like("l1", ts(8, 0))).unwrap();

        let mut guard = conn.lock().unwrap();
        let tx = guard.transaction().unwrap();
        assert!(!LikeRepository::transition_tx(&tx, "l1", "OTHER", LikeState::Viewed, ts(9, 0)).unwrap());
        assert!(matches!(
            LikeRepository::transition_tx(&tx, "l1", "S1", LikeState::Pending, ts(9, 0)),
            Err(RepositoryError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_storage_refuses_return_to_pending() {
        let (conn, repo) = setup();
        let mut resolved = like("l1", ts(8, 0));
        resolved.state = LikeState::Viewed;
        repo.insert(&resolved).unwrap();

        let guard = conn.lock().unwrap();
        let result = guard.execute("UPDATE pending_like SET state = 'PENDING' WHERE like_id = 'l1'", []);
        assert!(result.is_err());
        assert!(guard.execute("DELETE FROM pending_like WHERE like_id = 'l1'", []).is_err());
    }

    #[test]
    fn test_find_by_ids_tx_returns_only_existing() {
        let (conn, repo) = setup();
        repo.insert(&like("l1", ts(8, 0))).unwrap();
        repo.insert(&like("l2", ts(8, 5))).unwrap();

        let mut guard = conn.lock().unwrap();
        let tx = guard.transaction().unwrap();
        let found = LikeRepository::find_by_ids_tx(
            &tx,
            &["l2".to_string(), "ghost".to_string()],
        )
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "l2");
    }
}
