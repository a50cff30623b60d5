// ==========================================
// 沉睡账号点赞分拣系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 约束: 全进程共享一个数据库连接, 所有仓储/引擎经由它访问
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{ConfigApi, DashboardApi, TriageApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::engine::{
    BatchProcessor, CooldownGuard, DashboardAggregator, DormancyClassifier,
};
use crate::repository::{
    AuditLogRepository, BatchRepository, CooldownRepository, LikeRepository, SubjectRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
/// 在Tauri应用中作为全局状态管理
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享连接（测试与种子工具直接使用）
    pub conn: Arc<Mutex<Connection>>,

    /// 分拣API
    pub triage_api: Arc<TriageApi<ConfigManager>>,

    /// 看板与审计API
    pub dashboard_api: Arc<DashboardApi<ConfigManager>>,

    /// 配置API
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 初始化成功
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开连接并建表（幂等）
    /// 2. 初始化所有Repository与Engine
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;

        match read_schema_version(&conn) {
            Ok(Some(version)) if version == CURRENT_SCHEMA_VERSION => {}
            Ok(version) => tracing::warn!(
                found = ?version,
                expected = CURRENT_SCHEMA_VERSION,
                "数据库 schema 版本不一致"
            ),
            Err(e) => tracing::warn!("读取 schema 版本失败(将继续启动): {}", e),
        }

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let subject_repo = Arc::new(SubjectRepository::new(conn.clone()));
        let like_repo = Arc::new(LikeRepository::new(conn.clone()));
        let cooldown_repo = Arc::new(CooldownRepository::new(conn.clone()));
        let batch_repo = Arc::new(BatchRepository::new(conn.clone()));
        let audit_repo = Arc::new(AuditLogRepository::new(conn.clone()));

        // 配置管理器（共享连接）
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let classifier = Arc::new(DormancyClassifier::new(
            config_manager.clone(),
            subject_repo.clone(),
            audit_repo.clone(),
        ));
        let cooldown_guard = Arc::new(CooldownGuard::new(cooldown_repo));
        let batch_processor = Arc::new(BatchProcessor::new(
            conn.clone(),
            config_manager.clone(),
            batch_repo.clone(),
        ));
        let aggregator = Arc::new(DashboardAggregator::new(
            config_manager.clone(),
            subject_repo.clone(),
            audit_repo.clone(),
        ));

        // ==========================================
        // 初始化API层
        // ==========================================
        let triage_api = Arc::new(TriageApi::new(
            config_manager.clone(),
            subject_repo,
            like_repo,
            batch_repo,
            classifier,
            cooldown_guard,
            batch_processor,
        ));
        let dashboard_api = Arc::new(DashboardApi::new(
            config_manager.clone(),
            aggregator,
            audit_repo,
        ));
        let config_api = Arc::new(ConfigApi::new(config_manager));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            conn,
            triage_api,
            dashboard_api,
            config_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 LIKE_TRIAGE_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("LIKE_TRIAGE_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./like_triage.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("like-triage-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("like-triage");

        // best-effort: 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("like_triage.db");
        }
    }

    path.to_string_lossy().to_string()
}
