// ==========================================
// 沉睡账号点赞分拣系统 - 应用层
// ==========================================
// 职责: 组装各层实例; 可选 Tauri 集成
// ==========================================

pub mod state;
pub mod tauri_commands;

// 重导出
pub use state::{get_default_db_path, AppState};

#[cfg(feature = "tauri-app")]
pub use tauri_commands::*;
