// ==========================================
// 沉睡账号点赞分拣系统 - 分拣配置读取 Trait
// ==========================================
// 职责: 定义引擎层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// 配置读取结果
pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// TriageConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait TriageConfigReader: Send + Sync {
    /// 批次完成后的冷却时长（分钟）
    ///
    /// # 默认值
    /// - 60
    async fn get_lockout_minutes(&self) -> ConfigResult<i64>;

    /// 判定沉睡的默认不活跃天数
    ///
    /// # 默认值
    /// - 30
    async fn get_default_inactivity_days(&self) -> ConfigResult<i64>;

    /// 列表默认分页大小
    ///
    /// # 默认值
    /// - 20
    async fn get_default_page_size(&self) -> ConfigResult<i64>;

    /// 列表最大分页大小
    ///
    /// # 默认值
    /// - 100
    async fn get_max_page_size(&self) -> ConfigResult<i64>;
}
