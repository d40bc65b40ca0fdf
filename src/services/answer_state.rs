//! 作答状态 - 业务能力层
//!
//! 每道题一个 `Unanswered → Answered` 状态机，第一次选择即最终选择

use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

use crate::models::McqItem;
use crate::services::option_animation::{OptionAnimator, OptionPhase};

/// 单道题的作答状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnswerState {
    #[default]
    Unanswered,
    /// `correct` 在答案返回前为 `None`，返回后原地补全
    Answered {
        selected: String,
        correct: Option<String>,
    },
}

/// 选项的对错显示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionVerdict {
    /// 未作答，或与本次作答无关的选项
    Neutral,
    /// 已选中，答案未返回
    Pending,
    Correct,
    Wrong,
}

impl AnswerState {
    /// 选择一个选项，只在 `Unanswered` 时生效
    ///
    /// # 返回
    /// 本次选择是否被接受
    pub fn select(&mut self, option_id: &str) -> bool {
        match self {
            AnswerState::Unanswered => {
                *self = AnswerState::Answered {
                    selected: option_id.to_string(),
                    correct: None,
                };
                true
            }
            AnswerState::Answered { .. } => false,
        }
    }

    /// 补全正确答案，只补一次
    pub fn resolve(&mut self, correct_id: &str) -> bool {
        match self {
            AnswerState::Answered { correct, .. } if correct.is_none() => {
                *correct = Some(correct_id.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, AnswerState::Answered { .. })
    }

    pub fn selected(&self) -> Option<&str> {
        match self {
            AnswerState::Answered { selected, .. } => Some(selected),
            AnswerState::Unanswered => None,
        }
    }

    pub fn correct(&self) -> Option<&str> {
        match self {
            AnswerState::Answered { correct, .. } => correct.as_deref(),
            AnswerState::Unanswered => None,
        }
    }

    /// 答对与否，答案未返回时为 `None`
    pub fn is_correct(&self) -> Option<bool> {
        match self {
            AnswerState::Answered {
                selected,
                correct: Some(correct),
            } => Some(selected == correct),
            _ => None,
        }
    }

    pub fn verdict(&self, option_id: &str) -> OptionVerdict {
        match self {
            AnswerState::Unanswered => OptionVerdict::Neutral,
            AnswerState::Answered { selected, correct } => match correct.as_deref() {
                None if selected == option_id => OptionVerdict::Pending,
                None => OptionVerdict::Neutral,
                Some(correct) if correct == option_id => OptionVerdict::Correct,
                Some(_) if selected == option_id => OptionVerdict::Wrong,
                Some(_) => OptionVerdict::Neutral,
            },
        }
    }
}

/// 单道题的交互状态：作答 + 选项动画
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInteraction {
    pub answer: AnswerState,
    pub animator: OptionAnimator,
}

impl ItemInteraction {
    fn new(item: &McqItem) -> Self {
        Self {
            answer: AnswerState::Unanswered,
            animator: OptionAnimator::new(&item.options),
        }
    }

    pub fn celebrate(&self) -> bool {
        self.answer
            .selected()
            .is_some_and(|selected| self.animator.celebration_ready(selected))
    }
}

/// 作答记录簿
///
/// 按题目 id 保存交互状态，第一次交互时创建，会话结束时随之销毁
#[derive(Default)]
pub struct AnswerBook {
    entries: Mutex<HashMap<u64, ItemInteraction>>,
}

impl AnswerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录选择
    ///
    /// # 参数
    /// - `item`: 题目
    /// - `option_id`: 选中的选项
    /// - `known_correct`: 已缓存的正确答案（同一道题重复出现时）
    ///
    /// # 返回
    /// 本次选择是否被接受；已作答的题目返回 `false`
    pub fn select(&self, item: &McqItem, option_id: &str, known_correct: Option<&str>) -> bool {
        let mut entries = self.entries.lock();
        let entry = entries
            .entry(item.id)
            .or_insert_with(|| ItemInteraction::new(item));

        if !entry.answer.select(option_id) {
            debug!("题目 {} 已作答，忽略选择 {}", item.id, option_id);
            return false;
        }
        if let Some(correct) = known_correct {
            entry.answer.resolve(correct);
        }
        entry.animator.on_selected(option_id, known_correct);
        true
    }

    /// 补全正确答案并驱动对应选项的动画
    pub fn resolve(&self, item_id: u64, correct: &str) -> bool {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(&item_id) else {
            return false;
        };
        if !entry.answer.resolve(correct) {
            return false;
        }
        if let Some(selected) = entry.answer.selected().map(str::to_string) {
            entry.animator.on_revealed(&selected, correct);
        }
        true
    }

    /// 界面层通知某选项填充完成
    pub fn settle(&self, item_id: u64, option_id: &str) -> bool {
        self.entries
            .lock()
            .get_mut(&item_id)
            .is_some_and(|entry| entry.animator.settle(option_id))
    }

    pub fn answer(&self, item_id: u64) -> AnswerState {
        self.entries
            .lock()
            .get(&item_id)
            .map(|entry| entry.answer.clone())
            .unwrap_or_default()
    }

    pub fn phase(&self, item_id: u64, option_id: &str) -> OptionPhase {
        self.entries
            .lock()
            .get(&item_id)
            .map(|entry| entry.animator.phase(option_id))
            .unwrap_or_default()
    }

    pub fn interaction(&self, item_id: u64) -> Option<ItemInteraction> {
        self.entries.lock().get(&item_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_item;

    #[test]
    fn test_first_selection_is_final() {
        let mut state = AnswerState::default();
        assert!(state.select("a"));
        assert!(!state.select("b"));
        assert_eq!(state.selected(), Some("a"));
        assert_eq!(state.correct(), None);
    }

    #[test]
    fn test_resolve_fills_correct_once() {
        let mut state = AnswerState::Unanswered;
        assert!(!state.resolve("b"), "未作答时不能补全答案");

        state.select("a");
        assert!(state.resolve("b"));
        assert!(!state.resolve("c"));
        assert_eq!(
            state,
            AnswerState::Answered {
                selected: "a".to_string(),
                correct: Some("b".to_string())
            }
        );
        assert_eq!(state.is_correct(), Some(false));
    }

    #[test]
    fn test_verdicts() {
        let mut state = AnswerState::Unanswered;
        assert_eq!(state.verdict("a"), OptionVerdict::Neutral);

        state.select("a");
        assert_eq!(state.verdict("a"), OptionVerdict::Pending);
        assert_eq!(state.verdict("b"), OptionVerdict::Neutral);

        state.resolve("b");
        assert_eq!(state.verdict("a"), OptionVerdict::Wrong);
        assert_eq!(state.verdict("b"), OptionVerdict::Correct);
        assert_eq!(state.verdict("c"), OptionVerdict::Neutral);

        let mut right = AnswerState::Unanswered;
        right.select("c");
        right.resolve("c");
        assert_eq!(right.verdict("c"), OptionVerdict::Correct);
        assert_eq!(right.is_correct(), Some(true));
    }

    #[test]
    fn test_book_keeps_first_selection() {
        let book = AnswerBook::new();
        let item = sample_item(5);

        assert_eq!(book.answer(5), AnswerState::Unanswered);
        assert!(book.select(&item, "5a", None));
        assert!(!book.select(&item, "5c", None));
        assert_eq!(book.answer(5).selected(), Some("5a"));
        assert_eq!(book.phase(5, "5a"), OptionPhase::Filling);
        assert_eq!(book.phase(5, "5c"), OptionPhase::Idle);
    }

    #[test]
    fn test_book_resolve_drives_animation() {
        let book = AnswerBook::new();
        let item = sample_item(6);
        assert!(!book.resolve(6, "6b"), "没有交互记录时不补全");

        book.select(&item, "6a", None);
        assert!(book.resolve(6, "6b"));
        assert_eq!(book.answer(6).correct(), Some("6b"));
        assert_eq!(book.phase(6, "6b"), OptionPhase::Filling);

        assert!(book.settle(6, "6a"));
        assert!(book.interaction(6).unwrap().celebrate());
    }

    #[test]
    fn test_book_uses_known_correct_answer() {
        let book = AnswerBook::new();
        let item = sample_item(7);

        book.select(&item, "7a", Some("7a"));
        assert_eq!(book.answer(7).is_correct(), Some(true));
        assert!(!book.resolve(7, "7a"));
    }
}
