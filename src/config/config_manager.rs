// ==========================================
// 沉睡账号点赞分拣系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 说明: 冷却时长为全局单值, 写入冷却记录时按当时的值快照
// ==========================================

use crate::config::triage_config_trait::{ConfigResult, TriageConfigReader};
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（独立连接）
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        Ok(self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?)
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        tracing::info!(key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 读取整数配置，缺失、非法或越界时回退默认值
    fn get_bounded_i64(&self, key: &str, default: i64) -> ConfigResult<i64> {
        let raw = match self.get_global_config_value(key)? {
            Some(raw) => raw,
            None => return Ok(default),
        };
        match raw.trim().parse::<i64>() {
            Ok(v) if limits::allowed_range(key).map_or(v > 0, |range| range.contains(&v)) => Ok(v),
            _ => {
                tracing::warn!(key = key, value = %raw, default, "配置值非法或越界, 使用默认值");
                Ok(default)
            }
        }
    }
}

// ==========================================
// TriageConfigReader Trait 实现
// ==========================================
#[async_trait]
impl TriageConfigReader for ConfigManager {
    async fn get_lockout_minutes(&self) -> ConfigResult<i64> {
        self.get_bounded_i64(config_keys::LOCKOUT_MINUTES, defaults::LOCKOUT_MINUTES)
    }

    async fn get_default_inactivity_days(&self) -> ConfigResult<i64> {
        self.get_bounded_i64(config_keys::INACTIVITY_DAYS, defaults::INACTIVITY_DAYS)
    }

    async fn get_default_page_size(&self) -> ConfigResult<i64> {
        self.get_bounded_i64(config_keys::DEFAULT_PAGE_SIZE, defaults::DEFAULT_PAGE_SIZE)
    }

    async fn get_max_page_size(&self) -> ConfigResult<i64> {
        self.get_bounded_i64(config_keys::MAX_PAGE_SIZE, defaults::MAX_PAGE_SIZE)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 冷却
    pub const LOCKOUT_MINUTES: &str = "lockout_minutes";

    // 沉睡判定
    pub const INACTIVITY_DAYS: &str = "inactivity_days";

    // 分页
    pub const DEFAULT_PAGE_SIZE: &str = "default_page_size";
    pub const MAX_PAGE_SIZE: &str = "max_page_size";

    /// 允许通过 API 修改的键
    pub const EDITABLE: [&str; 4] = [LOCKOUT_MINUTES, INACTIVITY_DAYS, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE];
}

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const LOCKOUT_MINUTES: i64 = 60;
    pub const INACTIVITY_DAYS: i64 = 30;
    pub const DEFAULT_PAGE_SIZE: i64 = 20;
    pub const MAX_PAGE_SIZE: i64 = 100;
}

// ==========================================
// 取值范围
// ==========================================
pub mod limits {
    use super::config_keys;
    use std::ops::RangeInclusive;

    /// 冷却最长 7 天
    pub const LOCKOUT_MINUTES: RangeInclusive<i64> = 1..=10_080;
    pub const INACTIVITY_DAYS: RangeInclusive<i64> = 1..=3_650;
    pub const PAGE_SIZE: RangeInclusive<i64> = 1..=500;

    pub fn allowed_range(key: &str) -> Option<RangeInclusive<i64>> {
        match key {
            config_keys::LOCKOUT_MINUTES => Some(LOCKOUT_MINUTES),
            config_keys::INACTIVITY_DAYS => Some(INACTIVITY_DAYS),
            config_keys::DEFAULT_PAGE_SIZE | config_keys::MAX_PAGE_SIZE => Some(PAGE_SIZE),
            _ => None,
        }
    }
}
