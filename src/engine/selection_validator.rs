// ==========================================
// 沉睡账号点赞分拣系统 - 批次选择校验器
// ==========================================
// 校验顺序（首个失败即返回）:
//   1. 1 <= 条数 <= 5
//   2. 每条均为该账号下的 PENDING 点赞
//   3. 无重复
// 输出: 保序快照, 即批次的 requested_like_ids
// ==========================================

use crate::domain::batch::MAX_BATCH_SIZE;
use crate::domain::like::PendingLike;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

// ==========================================
// SelectionRejection - 选择被拒原因
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionRejection {
    #[error("未选择任何点赞")]
    EmptySelection,

    #[error("选择数量超限: {count} > {max}")]
    TooManySelected { count: usize, max: usize },

    #[error("点赞已处理或不属于该账号: {like_id}")]
    StaleOrForeignLike { like_id: String },

    #[error("重复选择: {like_id}")]
    DuplicateSelection { like_id: String },
}

impl SelectionRejection {
    /// 稳定的原因码
    pub fn reason_code(&self) -> &'static str {
        match self {
            SelectionRejection::EmptySelection => "EMPTY_SELECTION",
            SelectionRejection::TooManySelected { .. } => "TOO_MANY_SELECTED",
            SelectionRejection::StaleOrForeignLike { .. } => "STALE_OR_FOREIGN_LIKE",
            SelectionRejection::DuplicateSelection { .. } => "DUPLICATE_SELECTION",
        }
    }
}

// ==========================================
// ValidSelection - 校验通过的选择（不可变快照）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSelection {
    subject_id: String,
    like_ids: Vec<String>,
}

impl ValidSelection {
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn like_ids(&self) -> &[String] {
        &self.like_ids
    }

    pub fn len(&self) -> usize {
        self.like_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.like_ids.is_empty()
    }
}

// ==========================================
// BatchSelectionValidator
// ==========================================
pub struct BatchSelectionValidator;

impl BatchSelectionValidator {
    /// 校验选择
    ///
    /// # 参数
    /// - subject_id: 目标账号
    /// - like_ids: 操作员提交的点赞 ID（保序）
    /// - current: 按 like_ids 读取到的当前点赞（不限账号/状态, 不存在的不返回）
    pub fn validate(
        subject_id: &str,
        like_ids: &[String],
        current: &[PendingLike],
    ) -> Result<ValidSelection, SelectionRejection> {
        // 1. 数量
        if like_ids.is_empty() {
            return Err(SelectionRejection::EmptySelection);
        }
        if like_ids.len() > MAX_BATCH_SIZE {
            return Err(SelectionRejection::TooManySelected {
                count: like_ids.len(),
                max: MAX_BATCH_SIZE,
            });
        }

        // 2. 归属 + 状态
        let by_id: HashMap<&str, &PendingLike> =
            current.iter().map(|like| (like.id.as_str(), like)).collect();
        for like_id in like_ids {
            let usable = by_id
                .get(like_id.as_str())
                .map(|like| like.subject_id == subject_id && like.is_pending())
                .unwrap_or(false);
            if !usable {
                return Err(SelectionRejection::StaleOrForeignLike {
                    like_id: like_id.clone(),
                });
            }
        }

        // 3. 去重
        let mut seen = HashSet::with_capacity(like_ids.len());
        for like_id in like_ids {
            if !seen.insert(like_id.as_str()) {
                return Err(SelectionRejection::DuplicateSelection {
                    like_id: like_id.clone(),
                });
            }
        }

        Ok(ValidSelection {
            subject_id: subject_id.to_string(),
            like_ids: like_ids.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::LikeState;
    use chrono::NaiveDate;

    fn like(id: &str, subject_id: &str, state: LikeState) -> PendingLike {
        PendingLike {
            id: id.to_string(),
            subject_id: subject_id.to_string(),
            originator_id: "fan".to_string(),
            liked_at: NaiveDate::from_ymd_opt(2026, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            state,
        }
    }

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn pending_pool() -> Vec<PendingLike> {
        (1..=6)
            .map(|i| like(&format!("l{}", i), "S1", LikeState::Pending))
            .collect()
    }

    #[test]
    fn test_size_bounds() {
        let pool = pending_pool();
        assert_eq!(
            BatchSelectionValidator::validate("S1", &[], &pool),
            Err(SelectionRejection::EmptySelection)
        );
        assert_eq!(
            BatchSelectionValidator::validate("S1", &ids(&["l1", "l2", "l3", "l4", "l5", "l6"]), &pool),
            Err(SelectionRejection::TooManySelected { count: 6, max: 5 })
        );
    }

    #[test]
    fn test_valid_selection_preserves_order() {
        let pool = pending_pool();
        let selection =
            BatchSelectionValidator::validate("S1", &ids(&["l4", "l1", "l2"]), &pool).unwrap();
        assert_eq!(selection.like_ids(), ids(&["l4", "l1", "l2"]).as_slice());
        assert_eq!(selection.subject_id(), "S1");
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_stale_foreign_and_missing_likes() {
        let pool = vec![
            like("l1", "S1", LikeState::Pending),
            like("l2", "S1", LikeState::Viewed),
            like("l3", "S2", LikeState::Pending),
        ];
        for bad in ["l2", "l3", "ghost"] {
            assert_eq!(
                BatchSelectionValidator::validate("S1", &ids(&["l1", bad]), &pool),
                Err(SelectionRejection::StaleOrForeignLike { like_id: bad.to_string() })
            );
        }
    }

    #[test]
    fn test_duplicates_checked_after_staleness() {
        let pool = vec![
            like("l1", "S1", LikeState::Pending),
            like("l2", "S1", LikeState::Rejected),
        ];
        assert_eq!(
            BatchSelectionValidator::validate("S1", &ids(&["l1", "l1"]), &pool),
            Err(SelectionRejection::DuplicateSelection { like_id: "l1".to_string() })
        );
        // 同时存在重复和失效时, 失效优先
        assert_eq!(
            BatchSelectionValidator::validate("S1", &ids(&["l1", "l1", "l2"]), &pool),
            Err(SelectionRejection::StaleOrForeignLike { like_id: "l2".to_string() })
        );
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(SelectionRejection::EmptySelection.reason_code(), "EMPTY_SELECTION");
        assert_eq!(
            SelectionRejection::TooManySelected { count: 6, max: 5 }.reason_code(),
            "TOO_MANY_SELECTED"
        );
    }
}
