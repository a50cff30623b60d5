// ==========================================
// 并发批次测试
// ==========================================
// 职责: 验证同一账号的竞争批次恰好一个成功, 败者零变更
// ==========================================


#[path = "helpers/mock_config.rs"]
mod mock_config;

use chrono::Duration;
use like_triage::domain::{BatchStatus, LikeState, ProcessingBatch};
use like_triage::engine::{BatchError, BatchProcessor, BatchRequest, SelectionRejection};
use like_triage::repository::BatchRepository;
use mock_config::MockConfig;
use rusqlite::Connection;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use test_helpers::*;

fn processor(conn: Arc<Mutex<Connection>>) -> Arc<BatchProcessor<MockConfig>> {
    let batch_repo = Arc::new(BatchRepository::new(conn.clone()));
    Arc::new(BatchProcessor::new(conn, Arc::new(MockConfig::default()), batch_repo))
}

fn request(subject_id: &str, operator_id: &str, like_ids: Vec<String>) -> BatchRequest {
    BatchRequest {
        subject_id: subject_id.to_string(),
        operator_id: operator_id.to_string(),
        like_ids,
        rejection_rate: 0.5,
    }
}

/// 两个线程同时提交, 返回各自结果
fn race(
    first: (Arc<BatchProcessor<MockConfig>>, BatchRequest),
    second: (Arc<BatchProcessor<MockConfig>>, BatchRequest),
) -> Vec<Result<ProcessingBatch, BatchError>> {
    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = [first, second]
        .into_iter()
        .map(|(processor, req)| {
            let barrier = barrier.clone();
            thread::spawn(move || {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .unwrap();
                barrier.wait();
                rt.block_on(processor.submit(req, base_time()))
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

fn is_loser_error(err: &BatchError) -> bool {
    matches!(
        err,
        BatchError::CooldownActive { .. }
            | BatchError::Failed { .. }
            | BatchError::Selection(SelectionRejection::StaleOrForeignLike { .. })
    )
}

#[test]
fn test_overlapping_batches_on_separate_connections() {
    let (_file, db_path) = create_test_db().unwrap();
    let setup_conn = open_shared(&db_path);
    seed_subject(&setup_conn, "S1", base_time() - Duration::days(40), 50);
    let likes = seed_pending_likes(&setup_conn, "S1", 7, base_time() - Duration::days(1));

    // 各自独立连接, 模拟两个进程/两个操作员
    let a = processor(open_shared(&db_path));
    let b = processor(open_shared(&db_path));
    let sel_a = likes[0..4].to_vec();
    let sel_b = likes[2..6].to_vec();

    let results = race(
        (a, request("S1", "op-a", sel_a.clone())),
        (b, request("S1", "op-b", sel_b.clone())),
    );

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1, "results: {:?}", results);
    let winner = winners[0];
    assert_eq!(winner.status, BatchStatus::Completed);
    let loser_err = results.iter().find_map(|r| r.as_ref().err()).unwrap();
    assert!(is_loser_error(loser_err), "unexpected: {:?}", loser_err);

    // 败者独占的点赞保持 PENDING
    let loser_only: Vec<&String> = if winner.operator_id == "op-a" {
        sel_b.iter().filter(|id| !sel_a.contains(id)).collect()
    } else {
        sel_a.iter().filter(|id| !sel_b.contains(id)).collect()
    };
    for like_id in loser_only {
        assert_eq!(like_state(&setup_conn, like_id), LikeState::Pending);
    }
    assert_eq!(like_state(&setup_conn, &likes[6]), LikeState::Pending);

    // 只有胜者写入审计
    assert_eq!(count_rows(&setup_conn, "audit_entry"), winner.outcomes.len() as i64);
}

#[test]
fn test_overlapping_batches_on_shared_connection() {
    let (_file, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path);
    seed_subject(&conn, "S1", base_time() - Duration::days(40), 50);
    let likes = seed_pending_likes(&conn, "S1", 5, base_time() - Duration::days(1));

    let shared = processor(conn.clone());
    let results = race(
        (shared.clone(), request("S1", "op-a", likes[0..3].to_vec())),
        (shared, request("S1", "op-b", likes[1..5].to_vec())),
    );

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let loser_err = results.iter().find_map(|r| r.as_ref().err()).unwrap();
    // 共享连接下第二个批次看到的一定是已提交的冷却记录
    assert!(matches!(loser_err, BatchError::CooldownActive { remaining_minutes: 60, .. }));

    let resolved = likes
        .iter()
        .filter(|id| like_state(&conn, id) != LikeState::Pending)
        .count();
    let winner = results.iter().find_map(|r| r.as_ref().ok()).unwrap();
    assert_eq!(resolved, winner.outcomes.len());
}

#[test]
fn test_different_subjects_do_not_contend() {
    let (_file, db_path) = create_test_db().unwrap();
    let setup_conn = open_shared(&db_path);
    seed_subject(&setup_conn, "S1", base_time() - Duration::days(40), 50);
    seed_subject(&setup_conn, "S2", base_time() - Duration::days(40), 50);
    let s1 = seed_pending_likes(&setup_conn, "S1", 3, base_time() - Duration::days(1));
    let s2 = seed_pending_likes(&setup_conn, "S2", 3, base_time() - Duration::days(1));

    let results = race(
        (processor(open_shared(&db_path)), request("S1", "op-a", s1)),
        (processor(open_shared(&db_path)), request("S2", "op-b", s2)),
    );

    assert!(results.iter().all(|r| r.is_ok()), "results: {:?}", results);
    assert_eq!(count_rows(&setup_conn, "audit_entry"), 6);
    assert_eq!(count_rows(&setup_conn, "cooldown_record"), 2);
}
