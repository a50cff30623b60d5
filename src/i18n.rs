// ==========================================
// 沉睡账号点赞分拣系统 - 国际化
// ==========================================
// 使用 rust-i18n, 词条见 locales/*.yml
// 批次失败原因、逐条错误、冷却提示都会持久化或返回给前端,
// 因此统一从这里取文案, 不在调用处拼接
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 语言环境变量
pub const LOCALE_ENV: &str = "LIKE_TRIAGE_LOCALE";

/// 支持的语言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    ZhCn,
    En,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::En => "en",
        }
    }

    /// 解析语言代码（大小写、下划线不敏感）
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "zh-cn" | "zh" => Some(Locale::ZhCn),
            "en" | "en-us" | "en-gb" => Some(Locale::En),
            _ => None,
        }
    }
}

/// 当前语言（未知代码按默认中文处理）
pub fn current_locale() -> Locale {
    Locale::parse(&rust_i18n::locale().to_string()).unwrap_or(Locale::ZhCn)
}

pub fn set_locale(locale: Locale) {
    rust_i18n::set_locale(locale.code());
}

/// 按环境变量切换语言, 未设置或不支持时保持默认
pub fn init_from_env() -> Locale {
    if let Ok(raw) = std::env::var(LOCALE_ENV) {
        match Locale::parse(&raw) {
            Some(locale) => set_locale(locale),
            None => tracing::warn!(value = %raw, "不支持的语言, 使用默认语言"),
        }
    }
    current_locale()
}

// ==========================================
// 业务文案
// ==========================================

/// 回滚后未生效的逐条结果
pub fn item_rolled_back() -> String {
    rust_i18n::t!("batch.item_rolled_back").to_string()
}

/// 逐条 compare-and-set 失败（被并发批次抢先）
pub fn item_conflict(like_id: &str) -> String {
    rust_i18n::t!("batch.item_conflict", like_id = like_id).to_string()
}

/// 存储故障导致整批回滚
pub fn storage_failed(detail: &str) -> String {
    rust_i18n::t!("batch.storage_failed", detail = detail).to_string()
}

/// 冷却配置不可用, 整批未执行
pub fn config_unavailable(detail: &str) -> String {
    rust_i18n::t!("batch.config_unavailable", detail = detail).to_string()
}

/// 冷却中提示
pub fn cooldown_hint(remaining_minutes: i64) -> String {
    rust_i18n::t!("batch.cooldown_hint", minutes = remaining_minutes).to_string()
}

pub fn app_ready(db_path: &str) -> String {
    rust_i18n::t!("app.ready", path = db_path).to_string()
}

pub fn tauri_disabled() -> String {
    rust_i18n::t!("app.tauri_disabled").to_string()
}
