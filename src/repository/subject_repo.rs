// ==========================================
// 沉睡账号点赞分拣系统 - 沉睡账号数据仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// 说明: pending_like_count 为派生字段, 由 JOIN 实时计算
// ==========================================

use crate::db::format_datetime;
use crate::domain::subject::DormantSubject;
use crate::repository::db_utils::column_datetime;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SUBJECT_COLUMNS: &str = r#"
    s.subject_id, s.display_name, s.contact_handle, s.credit_balance, s.last_seen_at,
    (SELECT COUNT(*) FROM pending_like l
      WHERE l.subject_id = s.subject_id AND l.state = 'PENDING') AS pending_like_count
"#;

// 准入条件（参数 ?1 = 最后活跃时间上限）
const ELIGIBLE_FILTER: &str = r#"
    s.last_seen_at <= ?1
    AND s.credit_balance > 0
    AND EXISTS (SELECT 1 FROM pending_like l
                 WHERE l.subject_id = s.subject_id AND l.state = 'PENDING')
"#;

// ==========================================
// SubjectRepository - 沉睡账号仓储
// ==========================================
pub struct SubjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SubjectRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入账号（pending_like_count 字段忽略）
    pub fn insert(&self, subject: &DormantSubject) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO dormant_subject (
                subject_id, display_name, contact_handle, credit_balance, last_seen_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                subject.id,
                subject.display_name,
                subject.contact_handle,
                subject.credit_balance,
                format_datetime(&subject.last_seen_at),
            ],
        )?;
        Ok(())
    }

    /// 按 ID 查询
    pub fn find_by_id(&self, subject_id: &str) -> RepositoryResult<Option<DormantSubject>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM dormant_subject s WHERE s.subject_id = ?1",
            SUBJECT_COLUMNS
        );
        let subject = conn
            .query_row(&sql, params![subject_id], map_row)
            .optional()?;
        Ok(subject)
    }

    /// 分页查询满足准入条件的账号
    ///
    /// 排序: 待处理点赞数降序 → 最后活跃时间升序 → ID 升序（稳定）
    pub fn list_eligible(
        &self,
        last_seen_before: NaiveDateTime,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<DormantSubject>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {} FROM dormant_subject s
            WHERE {}
            ORDER BY pending_like_count DESC, s.last_seen_at ASC, s.subject_id ASC
            LIMIT ?2 OFFSET ?3
            "#,
            SUBJECT_COLUMNS, ELIGIBLE_FILTER
        );
        let mut stmt = conn.prepare(&sql)?;
        let subjects = stmt
            .query_map(
                params![format_datetime(&last_seen_before), limit, offset],
                map_row,
            )?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(subjects)
    }

    /// 满足准入条件的账号总数
    pub fn count_eligible(&self, last_seen_before: NaiveDateTime) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT COUNT(*) FROM dormant_subject s WHERE {}",
            ELIGIBLE_FILTER
        );
        let count = conn.query_row(&sql, params![format_datetime(&last_seen_before)], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    /// 满足准入条件的账号下 PENDING 点赞总数（实时）
    pub fn count_pending_likes_of_eligible(
        &self,
        last_seen_before: NaiveDateTime,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM pending_like l
            JOIN dormant_subject s ON s.subject_id = l.subject_id
            WHERE l.state = 'PENDING'
              AND s.last_seen_at <= ?1
              AND s.credit_balance > 0
            "#,
            params![format_datetime(&last_seen_before)],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn map_row(row: &Row) -> SqliteResult<DormantSubject> {
    Ok(DormantSubject {
        id: row.get(0)?,
        display_name: row.get(1)?,
        contact_handle: row.get(2)?,
        credit_balance: row.get(3)?,
        last_seen_at: column_datetime(row, 4)?,
        pending_like_count: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn setup() -> (Arc<Mutex<Connection>>, SubjectRepository) {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        (conn.clone(), SubjectRepository::new(conn))
    }

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 4, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn subject(id: &str, credit: i64, last_seen: NaiveDateTime) -> DormantSubject {
        DormantSubject {
            id: id.to_string(),
            display_name: format!("name-{}", id),
            contact_handle: format!("@{}", id),
            credit_balance: credit,
            last_seen_at: last_seen,
            pending_like_count: 0,
        }
    }

    fn add_like(conn: &Arc<Mutex<Connection>>, like_id: &str, subject_id: &str, state: &str) {
        conn.lock()
            .unwrap()
            .execute(
                "INSERT INTO pending_like (like_id, subject_id, originator_id, liked_at, state)
                 VALUES (?1, ?2, 'fan', '2026-04-01 00:00:00', ?3)",
                params![like_id, subject_id, state],
            )
            .unwrap();
    }

    #[test]
    fn test_list_eligible_applies_all_three_conditions() {
        let (conn, repo) = setup();
        repo.insert(&subject("dormant", 10, day(1))).unwrap();
        repo.insert(&subject("broke", 0, day(1))).unwrap();
        repo.insert(&subject("active", 10, day(20))).unwrap();
        repo.insert(&subject("no_likes", 10, day(1))).unwrap();

        add_like(&conn, "l1", "dormant", "PENDING");
        add_like(&conn, "l2", "broke", "PENDING");
        add_like(&conn, "l3", "active", "PENDING");
        add_like(&conn, "l4", "no_likes", "VIEWED");

        let cutoff = day(10);
        let found = repo.list_eligible(cutoff, 20, 0).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "dormant");
        assert_eq!(found[0].pending_like_count, 1);
        assert_eq!(repo.count_eligible(cutoff).unwrap(), 1);
        assert_eq!(repo.count_pending_likes_of_eligible(cutoff).unwrap(), 1);
    }

    #[test]
    fn test_list_eligible_orders_by_pending_count() {
        let (conn, repo) = setup();
        repo.insert(&subject("a", 5, day(2))).unwrap();
        repo.insert(&subject("b", 5, day(1))).unwrap();
        add_like(&conn, "a1", "a", "PENDING");
        add_like(&conn, "a2", "a", "PENDING");
        add_like(&conn, "b1", "b", "PENDING");

        let found = repo.list_eligible(day(10), 20, 0).unwrap();
        let ids: Vec<_> = found.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let second_page = repo.list_eligible(day(10), 1, 1).unwrap();
        assert_eq!(second_page[0].id, "b");
    }

    #[test]
    fn test_find_by_id_missing() {
        let (_conn, repo) = setup();
        assert!(repo.find_by_id("nobody").unwrap().is_none());
    }
}
