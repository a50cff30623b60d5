// ==========================================
// 沉睡账号点赞分拣系统 - 主入口
// ==========================================
// 启用 tauri-app 特性时启动桌面界面
// 否则仅初始化数据库并退出
// ==========================================

// 禁止控制台窗口 (Windows)
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use like_triage::app::{get_default_db_path, AppState};

#[cfg(feature = "tauri-app")]
fn main() {
    use like_triage::app::tauri_commands::*;

    like_triage::logging::init();
    like_triage::i18n::init_from_env();

    tracing::info!("==================================================");
    tracing::info!("{}", like_triage::APP_NAME);
    tracing::info!("系统版本: {}", like_triage::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("无法初始化AppState: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("启动Tauri应用...");

    let result = tauri::Builder::default()
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            // ==========================================
            // 分拣相关命令
            // ==========================================
            list_eligible_subjects,
            list_pending_likes,
            get_cooldown_status,
            submit_batch,
            get_batch,
            list_batches_by_subject,

            // ==========================================
            // 看板与审计相关命令
            // ==========================================
            get_today_summary,
            list_audit_by_operator,
            list_audit_by_subject,
            count_audit_by_date_range,

            // ==========================================
            // 配置管理相关命令
            // ==========================================
            get_triage_config,
            update_triage_config,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        tracing::error!("Tauri应用异常退出: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Tauri应用已退出");
}

#[cfg(not(feature = "tauri-app"))]
fn main() {
    use like_triage::i18n;

    like_triage::logging::init();
    i18n::init_from_env();

    tracing::info!("{} v{}", like_triage::APP_NAME, like_triage::VERSION);

    let db_path = get_default_db_path();
    match AppState::new(db_path.clone()) {
        Ok(_) => {
            tracing::info!("{}", i18n::app_ready(&db_path));
            tracing::info!("{}", i18n::tauri_disabled());
        }
        Err(e) => {
            tracing::error!("无法初始化AppState: {}", e);
            std::process::exit(1);
        }
    }
}
