// ==========================================
// API 集成测试
// ==========================================
// 职责: 通过 AppState 验证读写接口、错误原因码、看板与配置
// ==========================================


use chrono::{Duration, Local, NaiveDateTime, Timelike};
use like_triage::api::ApiError;
use like_triage::app::AppState;
use like_triage::config::config_keys;
use like_triage::domain::{ActionType, BatchStatus};
use like_triage::engine::BatchRequest;
use tempfile::NamedTempFile;
use test_helpers::*;

fn now() -> NaiveDateTime {
    // 存储精度为秒
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// 场景: D1 (7 条, 沉睡 45 天), D2 (2 条, 沉睡 60 天), ACTIVE (活跃), BROKE (无余额)
fn setup() -> (NamedTempFile, AppState) {
    let (file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();
    let conn = state.conn.clone();

    let liked = now() - Duration::days(1);
    seed_subject(&conn, "D1", now() - Duration::days(45), 100);
    seed_pending_likes(&conn, "D1", 7, liked);
    seed_subject(&conn, "D2", now() - Duration::days(60), 10);
    seed_pending_likes(&conn, "D2", 2, liked);
    seed_subject(&conn, "ACTIVE", now() - Duration::days(3), 100);
    seed_pending_likes(&conn, "ACTIVE", 4, liked);
    seed_subject(&conn, "BROKE", now() - Duration::days(90), 0);
    seed_pending_likes(&conn, "BROKE", 4, liked);

    (file, state)
}

fn request(subject_id: &str, like_ids: Vec<String>, rate: f64) -> BatchRequest {
    BatchRequest {
        subject_id: subject_id.to_string(),
        operator_id: "op-1".to_string(),
        like_ids,
        rejection_rate: rate,
    }
}

#[tokio::test]
async fn test_eligible_subjects_listing_and_paging() {
    let (_file, state) = setup();

    let page = state
        .triage_api
        .list_eligible_subjects(None, None, None)
        .await
        .unwrap();
    let ids: Vec<_> = page.users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["D1", "D2"]);
    assert_eq!(page.total_users, 2);
    assert_eq!(page.total_pending_likes, 9);
    assert_eq!(page.page, 1);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.today_processed_count, 0);

    // 第二页, 每页 1 条; page=0 视为 1
    let second = state
        .triage_api
        .list_eligible_subjects(None, Some(2), Some(1))
        .await
        .unwrap();
    assert_eq!(second.users[0].id, "D2");
    assert_eq!(second.total_pages, 2);
    let first = state
        .triage_api
        .list_eligible_subjects(None, Some(0), Some(1))
        .await
        .unwrap();
    assert_eq!(first.page, 1);
    assert_eq!(first.users[0].id, "D1");

    // 放宽到 2 天, 活跃账号也进入
    let relaxed = state
        .triage_api
        .list_eligible_subjects(Some(2), None, None)
        .await
        .unwrap();
    assert_eq!(relaxed.total_users, 3);

    let json = serde_json::to_value(&page).unwrap();
    for key in [
        "totalPendingLikes",
        "todayProcessedCount",
        "todayViewedCount",
        "todayRejectedCount",
        "users",
        "totalUsers",
        "page",
        "totalPages",
    ] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["users"][0]["pendingLikeCount"], 7);

    assert!(matches!(
        state.triage_api.list_eligible_subjects(Some(-1), None, None).await,
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_submit_flow_end_to_end() {
    let (_file, state) = setup();
    let api = &state.triage_api;

    let pending = api.list_pending_likes("D1").unwrap();
    assert_eq!(pending.len(), 7);
    let selected: Vec<String> = pending.iter().take(5).map(|l| l.id.clone()).collect();

    assert!(!api.get_cooldown_status("D1").unwrap().is_on_cooldown);

    let response = api.submit_batch(request("D1", selected.clone(), 0.2)).await.unwrap();
    assert_eq!(response.processed_count, 5);
    assert_eq!(response.rejected_count, 1);
    assert_eq!(response.viewed_count, 4);
    assert_eq!(response.details[0].like_id, selected[0]);
    assert_eq!(response.details[0].action_type, ActionType::Rejected);

    let cooldown = api.get_cooldown_status("D1").unwrap();
    assert!(cooldown.is_on_cooldown);
    assert!(cooldown.remaining_minutes >= 59 && cooldown.remaining_minutes <= 60);
    assert!(cooldown.can_process_at.is_some());

    assert_eq!(api.list_pending_likes("D1").unwrap().len(), 2);

    let batch = api.get_batch(&response.batch_id).unwrap();
    assert_eq!(batch.status, BatchStatus::Completed);
    assert_eq!(batch.requested_like_ids, selected);
    assert_eq!(api.list_batches_by_subject("D1", None).await.unwrap().len(), 1);

    // 冷却中再次提交
    let rest: Vec<String> = api
        .list_pending_likes("D1")
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    let err = api.submit_batch(request("D1", rest, 0.0)).await.unwrap_err();
    assert_eq!(err.reason_code(), "COOLDOWN_ACTIVE");
    match err {
        ApiError::CooldownActive { remaining_minutes, .. } => {
            assert!(remaining_minutes >= 59 && remaining_minutes <= 60)
        }
        other => panic!("Expected CooldownActive, got {:?}", other),
    }

    // 看板与审计
    let summary = state.dashboard_api.get_today_summary().await.unwrap();
    assert_eq!(summary.processed_today, 5);
    assert_eq!(summary.rejected_today, 1);
    assert_eq!(summary.viewed_today, 4);
    assert_eq!(summary.total_pending, 4);

    let page = api.list_eligible_subjects(None, None, None).await.unwrap();
    assert_eq!(page.today_processed_count, 5);

    let by_operator = state
        .dashboard_api
        .list_audit_by_operator("op-1", None)
        .await
        .unwrap();
    assert_eq!(by_operator.len(), 5);
    let by_subject = state
        .dashboard_api
        .list_audit_by_subject("D1", Some(2))
        .await
        .unwrap();
    assert_eq!(by_subject.len(), 2);
    assert_eq!(
        state.dashboard_api.list_audit_by_batch(&response.batch_id).unwrap().len(),
        5
    );
}

#[tokio::test]
async fn test_selection_errors_carry_reason_codes() {
    let (_file, state) = setup();
    let api = &state.triage_api;
    let d1: Vec<String> = api
        .list_pending_likes("D1")
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    let d2: Vec<String> = api
        .list_pending_likes("D2")
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();

    let cases = vec![
        (request("D1", vec![], 0.5), "EMPTY_SELECTION"),
        (request("D1", d1[..6].to_vec(), 0.5), "TOO_MANY_SELECTED"),
        (request("D1", vec![d1[0].clone(), d2[0].clone()], 0.5), "STALE_OR_FOREIGN_LIKE"),
        (request("D1", vec![d1[0].clone(), d1[0].clone()], 0.5), "DUPLICATE_SELECTION"),
        (request("D1", vec![d1[0].clone()], 2.0), "INVALID_INPUT"),
        (request("NOBODY", vec![d1[0].clone()], 0.5), "NOT_FOUND"),
    ];
    for (req, code) in cases {
        let err = api.submit_batch(req).await.unwrap_err();
        assert_eq!(err.reason_code(), code, "{:?}", err);
    }

    assert!(!api.get_cooldown_status("D1").unwrap().is_on_cooldown);
    assert_eq!(api.list_pending_likes("D1").unwrap().len(), 7);
    assert_eq!(count_rows(&state.conn, "processing_batch"), 0);
}

#[tokio::test]
async fn test_read_errors() {
    let (_file, state) = setup();
    assert!(matches!(
        state.triage_api.list_pending_likes("NOBODY"),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        state.triage_api.get_cooldown_status(""),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        state.triage_api.get_batch("missing"),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        state.dashboard_api.count_by_date_range("2026-01-02 00:00:00", "2026-01-01 00:00:00"),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        state.dashboard_api.count_by_date_range("yesterday", "2026-01-01 00:00:00"),
        Err(ApiError::InvalidInput(_))
    ));
    let counts = state
        .dashboard_api
        .count_by_date_range("2026-01-01 00:00:00", "2026-01-02 00:00:00")
        .unwrap();
    assert_eq!(counts.processed, 0);
}

#[tokio::test]
async fn test_config_update_applies_to_next_batch() {
    let (_file, state) = setup();

    let config = state.config_api.get_triage_config().await.unwrap();
    assert_eq!(config.lockout_minutes, 60);

    let updated = state
        .config_api
        .update_triage_config(config_keys::LOCKOUT_MINUTES, "15")
        .await
        .unwrap();
    assert_eq!(updated.lockout_minutes, 15);

    assert!(matches!(
        state.config_api.update_triage_config("unknown_key", "5").await,
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        state.config_api.update_triage_config(config_keys::MAX_PAGE_SIZE, "0").await,
        Err(ApiError::InvalidInput(_))
    ));

    let d2: Vec<String> = state
        .triage_api
        .list_pending_likes("D2")
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    state
        .triage_api
        .submit_batch(request("D2", d2, 0.0))
        .await
        .unwrap();
    let cooldown = state.triage_api.get_cooldown_status("D2").unwrap();
    assert!(cooldown.remaining_minutes <= 15 && cooldown.remaining_minutes >= 14);

    // 已写入的冷却记录不受之后配置变更影响
    state
        .config_api
        .update_triage_config(config_keys::LOCKOUT_MINUTES, "600")
        .await
        .unwrap();
    let cooldown = state.triage_api.get_cooldown_status("D2").unwrap();
    assert!(cooldown.remaining_minutes <= 15);
}

#[tokio::test]
async fn test_out_of_range_day_and_minute_counts_are_rejected_not_panicking() {
    let (_file, state) = setup();

    // 查询参数超出可表示的时间范围
    for days in [1_000_000_000_000, 100_000_000, i64::MAX] {
        assert!(matches!(
            state.triage_api.list_eligible_subjects(Some(days), None, None).await,
            Err(ApiError::InvalidInput(_))
        ));
    }

    // 配置写入有上限
    for (key, value) in [
        (config_keys::LOCKOUT_MINUTES, "9223372036854775807"),
        (config_keys::LOCKOUT_MINUTES, "10081"),
        (config_keys::INACTIVITY_DAYS, "1000000000000"),
        (config_keys::DEFAULT_PAGE_SIZE, "501"),
    ] {
        assert!(matches!(
            state.config_api.update_triage_config(key, value).await,
            Err(ApiError::InvalidInput(_))
        ));
    }
    let config = state.config_api.get_triage_config().await.unwrap();
    assert_eq!(config.lockout_minutes, 60);
    assert_eq!(config.inactivity_days, 30);

    // 绕过 API 直接写库的越界值按默认值读取
    {
        let conn = state.conn.lock().unwrap();
        for (key, value) in [
            (config_keys::LOCKOUT_MINUTES, "9223372036854775807"),
            (config_keys::INACTIVITY_DAYS, "1000000000000"),
        ] {
            conn.execute(
                "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
                [key, value],
            )
            .unwrap();
        }
    }

    let page = state
        .triage_api
        .list_eligible_subjects(None, None, None)
        .await
        .unwrap();
    assert_eq!(page.total_users, 2);
    state.dashboard_api.get_today_summary().await.unwrap();

    let d2: Vec<String> = state
        .triage_api
        .list_pending_likes("D2")
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    state
        .triage_api
        .submit_batch(request("D2", d2, 0.5))
        .await
        .unwrap();
    let cooldown = state.triage_api.get_cooldown_status("D2").unwrap();
    assert!(cooldown.is_on_cooldown);
    assert!(cooldown.remaining_minutes <= 60);
    assert!(cooldown.can_process_at.is_some());
}
