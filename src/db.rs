// ==========================================
// 沉睡账号点赞分拣系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，并发批次写入时排队而不是立即报 busy
// - 建表幂等，审计表/点赞表的约束由触发器兜底
// ==========================================

use chrono::NaiveDateTime;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 数据库中时间字段的统一格式
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 格式化时间（写库）
pub fn format_datetime(ts: &NaiveDateTime) -> String {
    ts.format(DATETIME_FORMAT).to_string()
}

/// 解析时间（读库）
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).ok()
}

/// 初始化 schema（幂等）
///
/// 说明：
/// - audit_entry 通过触发器禁止 UPDATE / DELETE，仓储层也不提供对应方法
/// - pending_like 通过触发器禁止从终态回到 PENDING
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_scope (
            scope_id TEXT PRIMARY KEY,
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(scope_type, scope_key)
        );

        INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
        VALUES ('global', 'GLOBAL', 'global');

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS dormant_subject (
            subject_id TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            contact_handle TEXT NOT NULL,
            credit_balance INTEGER NOT NULL DEFAULT 0,
            last_seen_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS pending_like (
            like_id TEXT PRIMARY KEY,
            subject_id TEXT NOT NULL REFERENCES dormant_subject(subject_id),
            originator_id TEXT NOT NULL,
            liked_at TEXT NOT NULL,
            state TEXT NOT NULL DEFAULT 'PENDING'
                CHECK (state IN ('PENDING', 'VIEWED', 'REJECTED')),
            resolved_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_pending_like_subject_state
            ON pending_like(subject_id, state, liked_at);

        CREATE TRIGGER IF NOT EXISTS trg_pending_like_monotonic
        BEFORE UPDATE OF state ON pending_like
        WHEN OLD.state <> 'PENDING' AND NEW.state <> OLD.state
        BEGIN
            SELECT RAISE(ABORT, 'pending_like state is terminal');
        END;

        CREATE TRIGGER IF NOT EXISTS trg_pending_like_no_delete
        BEFORE DELETE ON pending_like
        BEGIN
            SELECT RAISE(ABORT, 'pending_like rows are never deleted');
        END;

        CREATE TABLE IF NOT EXISTS cooldown_record (
            subject_id TEXT PRIMARY KEY REFERENCES dormant_subject(subject_id),
            last_batch_at TEXT NOT NULL,
            lockout_minutes INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS processing_batch (
            batch_id TEXT PRIMARY KEY,
            subject_id TEXT NOT NULL,
            operator_id TEXT NOT NULL,
            requested_like_ids TEXT NOT NULL,
            rejection_rate REAL NOT NULL,
            status TEXT NOT NULL CHECK (status IN ('RUNNING', 'COMPLETED', 'FAILED')),
            failure_reason TEXT,
            created_at TEXT NOT NULL,
            finished_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_processing_batch_subject
            ON processing_batch(subject_id, created_at);

        CREATE TRIGGER IF NOT EXISTS trg_processing_batch_terminal
        BEFORE UPDATE ON processing_batch
        WHEN OLD.status <> 'RUNNING'
        BEGIN
            SELECT RAISE(ABORT, 'processing_batch is terminal');
        END;

        CREATE TABLE IF NOT EXISTS batch_item_outcome (
            batch_id TEXT NOT NULL REFERENCES processing_batch(batch_id),
            seq_no INTEGER NOT NULL,
            like_id TEXT NOT NULL,
            action_type TEXT NOT NULL,
            success INTEGER NOT NULL,
            error TEXT,
            PRIMARY KEY (batch_id, seq_no)
        );

        CREATE TABLE IF NOT EXISTS audit_entry (
            entry_id TEXT PRIMARY KEY,
            batch_id TEXT NOT NULL,
            subject_id TEXT NOT NULL,
            operator_id TEXT NOT NULL,
            like_id TEXT NOT NULL,
            action_type TEXT NOT NULL CHECK (action_type IN ('VIEWED', 'REJECTED')),
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_audit_entry_created_at ON audit_entry(created_at);
        CREATE INDEX IF NOT EXISTS idx_audit_entry_operator ON audit_entry(operator_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_audit_entry_subject ON audit_entry(subject_id, created_at);

        CREATE TRIGGER IF NOT EXISTS trg_audit_entry_no_update
        BEFORE UPDATE ON audit_entry
        BEGIN
            SELECT RAISE(ABORT, 'audit_entry is append-only');
        END;

        CREATE TRIGGER IF NOT EXISTS trg_audit_entry_no_delete
        BEFORE DELETE ON audit_entry
        BEGIN
            SELECT RAISE(ABORT, 'audit_entry is append-only');
        END;
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}
