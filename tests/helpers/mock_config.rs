// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use like_triage::config::TriageConfigReader;
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub lockout_minutes: i64,
    pub inactivity_days: i64,
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub lockout_unavailable: bool,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            lockout_minutes: 60,
            inactivity_days: 30,
            default_page_size: 20,
            max_page_size: 100,
            lockout_unavailable: false,
        }
    }

    pub fn with_lockout(lockout_minutes: i64) -> Self {
        Self {
            lockout_minutes,
            ..Self::default()
        }
    }

    /// 冷却配置读取失败
    pub fn lockout_unavailable() -> Self {
        Self {
            lockout_unavailable: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl TriageConfigReader for MockConfig {
    async fn get_lockout_minutes(&self) -> Result<i64, Box<dyn Error + Send + Sync>> {
        if self.lockout_unavailable {
            return Err("config store down".into());
        }
        Ok(self.lockout_minutes)
    }

    async fn get_default_inactivity_days(&self) -> Result<i64, Box<dyn Error + Send + Sync>> {
        Ok(self.inactivity_days)
    }

    async fn get_default_page_size(&self) -> Result<i64, Box<dyn Error + Send + Sync>> {
        Ok(self.default_page_size)
    }

    async fn get_max_page_size(&self) -> Result<i64, Box<dyn Error + Send + Sync>> {
        Ok(self.max_page_size)
    }
}
