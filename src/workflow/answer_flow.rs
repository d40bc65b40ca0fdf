//! 作答流程 - 流程层
//!
//! 流程顺序：
//! 1. 校验题目和选项
//! 2. 记录选择（立即生效，之后不可更改）
//! 3. 查询正确答案（RevealCache 去重）
//! 4. 答案返回后原地补全

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::services::{AnswerBook, FeedStore, RevealCache};

/// 选择结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// 选择已记录
    Accepted,
    /// 已作答，忽略
    AlreadyAnswered,
    /// 题目不在列表中
    UnknownItem,
    /// 该题没有这个选项
    UnknownOption,
}

/// 作答流程
///
/// - 只编排 FeedStore / AnswerBook / RevealCache
/// - 答案查询失败不会向上抛错，对应题目只是不显示对错
pub struct AnswerFlow {
    store: Arc<FeedStore>,
    book: Arc<AnswerBook>,
    reveals: Arc<RevealCache>,
}

impl AnswerFlow {
    pub fn new(store: Arc<FeedStore>, book: Arc<AnswerBook>, reveals: Arc<RevealCache>) -> Self {
        Self {
            store,
            book,
            reveals,
        }
    }

    /// 记录选择，不发请求
    pub fn record(&self, item_id: u64, option_id: &str) -> SelectOutcome {
        let Some(item) = self.store.get(item_id) else {
            warn!("题目 {} 不在列表中，忽略选择", item_id);
            return SelectOutcome::UnknownItem;
        };
        if !item.has_option(option_id) {
            warn!("题目 {} 没有选项 {}，忽略选择", item_id, option_id);
            return SelectOutcome::UnknownOption;
        }

        let known_correct = self.reveals.cached(item_id);
        if self.book.select(&item, option_id, known_correct.as_deref()) {
            info!("✏️ 题目 {} 选择了 {}", item_id, option_id);
            SelectOutcome::Accepted
        } else {
            SelectOutcome::AlreadyAnswered
        }
    }

    /// 查询正确答案并补全作答状态
    ///
    /// # 返回
    /// 正确选项 id；查询失败时为 `None`
    pub async fn reveal(&self, item_id: u64) -> Option<String> {
        let correct = self.reveals.reveal(item_id).await?;
        if self.book.resolve(item_id, &correct) {
            let verdict = match self.book.answer(item_id).is_correct() {
                Some(true) => "✅ 答对",
                _ => "❌ 答错",
            };
            info!("{} 题目 {}，正确答案 {}", verdict, item_id, correct);
        } else {
            debug!("题目 {} 的答案已补全", item_id);
        }
        Some(correct)
    }

    /// 选择并等待答案返回
    pub async fn select(&self, item_id: u64, option_id: &str) -> SelectOutcome {
        let outcome = self.record(item_id, option_id);
        if outcome == SelectOutcome::Accepted {
            self.reveal(item_id).await;
        }
        outcome
    }
}
