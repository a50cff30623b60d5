use chrono::{Duration, Local, NaiveDateTime, Timelike};
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use like_triage::app::get_default_db_path;
use like_triage::db::{init_schema, open_sqlite_connection};
use like_triage::domain::{DormantSubject, LikeState, PendingLike};
use like_triage::repository::{LikeRepository, SubjectRepository};

const DEFAULT_SUBJECT_COUNT: usize = 40;

// 账号画像: (距今天数, 余额, 待处理点赞数)
fn profile(idx: usize) -> (i64, i64, usize) {
    match idx % 5 {
        0 => (45, 120, 7),
        1 => (90, 30, 3),
        2 => (31, 5, 12),
        3 => (10, 80, 4), // 活跃账号, 不可分拣
        _ => (60, 0, 6),  // 无余额, 不可分拣
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    like_triage::logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    let subject_count = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_SUBJECT_COUNT)
        .max(5);

    backup_and_reset_db(&db_path)?;

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let subject_repo = SubjectRepository::new(conn.clone());
    let like_repo = LikeRepository::new(conn.clone());

    let now = Local::now().naive_local();
    let mut like_total = 0;
    for idx in 0..subject_count {
        let (days_idle, credit, likes) = profile(idx);
        let subject_id = format!("S{:04}", idx + 1);
        subject_repo.insert(&DormantSubject {
            id: subject_id.clone(),
            display_name: format!("用户{:04}", idx + 1),
            contact_handle: format!("@user{:04}", idx + 1),
            credit_balance: credit,
            last_seen_at: trim_seconds(now - Duration::days(days_idle)),
            pending_like_count: 0,
        })?;

        for n in 0..likes {
            like_repo.insert(&PendingLike {
                id: Uuid::new_v4().to_string(),
                subject_id: subject_id.clone(),
                originator_id: format!("fan-{:05}", (idx * 31 + n * 7) % 10_000),
                liked_at: trim_seconds(now - Duration::hours((n as i64 + 1) * 5)),
                state: LikeState::Pending,
            })?;
            like_total += 1;
        }
    }

    tracing::info!(
        db_path = %db_path,
        subjects = subject_count,
        likes = like_total,
        "演示数据库已生成"
    );
    Ok(())
}

fn trim_seconds(ts: NaiveDateTime) -> NaiveDateTime {
    // 存储精度为秒
    ts.with_nanosecond(0).unwrap_or(ts)
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}
