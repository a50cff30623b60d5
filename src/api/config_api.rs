// ==========================================
// 沉睡账号点赞分拣系统 - 配置管理 API
// ==========================================
// 职责: 分拣配置查询与更新
// 说明: 冷却时长的变更只影响之后完成的批次, 已写入的冷却记录保留原值
// ==========================================

use crate::api::dto::TriageConfigView;
use crate::api::error::{ApiError, ApiResult};
use crate::config::{config_keys, limits, ConfigManager, TriageConfigReader};
use std::sync::Arc;

// ==========================================
// ConfigApi - 配置管理 API
// ==========================================
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询当前生效的分拣配置
    pub async fn get_triage_config(&self) -> ApiResult<TriageConfigView> {
        let cm = &self.config_manager;
        let map = |e: Box<dyn std::error::Error + Send + Sync>| ApiError::InternalError(e.to_string());

        Ok(TriageConfigView {
            lockout_minutes: cm.get_lockout_minutes().await.map_err(map)?,
            inactivity_days: cm.get_default_inactivity_days().await.map_err(map)?,
            default_page_size: cm.get_default_page_size().await.map_err(map)?,
            max_page_size: cm.get_max_page_size().await.map_err(map)?,
        })
    }

    /// 更新单个配置项
    ///
    /// # 约束
    /// - key 必须属于可编辑键
    /// - value 必须为该键取值范围内的整数
    pub async fn update_triage_config(&self, key: &str, value: &str) -> ApiResult<TriageConfigView> {
        let range = match limits::allowed_range(key) {
            Some(range) if config_keys::EDITABLE.contains(&key) => range,
            _ => return Err(ApiError::InvalidInput(format!("不支持的配置键: {}", key))),
        };
        let parsed = value
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|v| range.contains(v))
            .ok_or_else(|| {
                ApiError::InvalidInput(format!(
                    "配置值必须为 {}..={} 内的整数: {}={}",
                    range.start(),
                    range.end(),
                    key,
                    value
                ))
            })?;

        self.config_manager
            .set_global_config_value(key, &parsed.to_string())
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        self.get_triage_config().await
    }

    /// 全部配置快照（JSON）
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        self.config_manager
            .get_config_snapshot()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }
}
