//! 题目流会话 - 编排层
//!
//! 会话内唯一的状态来源：FeedStore + AnswerBook + RevealCache。
//! 界面层只通过 [`FeedSession::snapshot`] 读取状态，通过少数几个入口上报事件。

use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::sync::Arc;

use crate::clients::QuestionSource;
use crate::config::Config;
use crate::models::McqItem;
use crate::services::{
    AnswerBook, AnswerState, FeedStore, OptionPhase, OptionVerdict, RevealCache,
};
use crate::workflow::{
    AnswerFlow, PrefetchDecision, PrefetchPolicy, PrefetchScheduler, SelectOutcome,
};

/// 单个选项的只读视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub id: String,
    pub label: String,
    pub verdict: OptionVerdict,
    pub phase: OptionPhase,
}

/// 单道题的只读视图
#[derive(Debug, Clone)]
pub struct ItemView {
    pub item: Arc<McqItem>,
    pub answer: AnswerState,
    pub options: Vec<OptionView>,
    /// 选中项填充完成，可以播放庆祝效果
    pub celebrate: bool,
}

/// 整个题目流的只读快照
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub items: Vec<ItemView>,
}

impl FeedSnapshot {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.items.iter().map(|v| v.item.id).collect()
    }
}

/// 会话统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub loaded: usize,
    pub answered: usize,
    pub correct: usize,
    pub wrong: usize,
    /// 已作答但答案未返回
    pub unrevealed: usize,
}

/// 题目流会话
pub struct FeedSession {
    store: Arc<FeedStore>,
    book: Arc<AnswerBook>,
    scheduler: PrefetchScheduler,
    flow: Arc<AnswerFlow>,
    initial_load_count: usize,
    started_at: DateTime<Local>,
}

impl FeedSession {
    /// 创建新的会话
    pub fn new(source: Arc<dyn QuestionSource>, config: &Config) -> Self {
        let store = Arc::new(FeedStore::new(source.clone()));
        let book = Arc::new(AnswerBook::new());
        let reveals = Arc::new(RevealCache::new(source));
        let scheduler = PrefetchScheduler::new(store.clone(), PrefetchPolicy::from_config(config));
        let flow = Arc::new(AnswerFlow::new(store.clone(), book.clone(), reveals));

        Self {
            store,
            book,
            scheduler,
            flow,
            initial_load_count: config.initial_load_count,
            started_at: Local::now(),
        }
    }

    /// 首屏加载
    pub async fn start(&self) -> usize {
        self.store.initialize(self.initial_load_count).await
    }

    /// 滑动信号
    pub async fn on_scroll(&self, viewed_index: usize) -> PrefetchDecision {
        self.scheduler.on_scroll(viewed_index).await
    }

    /// 选择选项：立即记录，答案查询在后台进行
    pub fn select(&self, item_id: u64, option_id: &str) -> SelectOutcome {
        let outcome = self.flow.record(item_id, option_id);
        if outcome == SelectOutcome::Accepted {
            let flow = Arc::clone(&self.flow);
            tokio::spawn(async move {
                flow.reveal(item_id).await;
            });
        }
        outcome
    }

    /// 选择选项并等待答案返回
    pub async fn select_and_wait(&self, item_id: u64, option_id: &str) -> SelectOutcome {
        self.flow.select(item_id, option_id).await
    }

    /// 界面层通知选项填充动画结束
    pub fn settle_option(&self, item_id: u64, option_id: &str) -> bool {
        self.book.settle(item_id, option_id)
    }

    /// 当前状态的只读快照
    pub fn snapshot(&self) -> FeedSnapshot {
        let items = self
            .store
            .snapshot()
            .into_iter()
            .map(|item| self.view(item))
            .collect();
        FeedSnapshot { items }
    }

    /// 会话统计，同一道题重复出现只计一次作答
    pub fn stats(&self) -> SessionStats {
        let snapshot = self.snapshot();
        let mut stats = SessionStats {
            loaded: snapshot.len(),
            ..Default::default()
        };

        let mut seen = HashSet::new();
        for view in &snapshot.items {
            if !view.answer.is_answered() || !seen.insert(view.item.id) {
                continue;
            }
            stats.answered += 1;
            match view.answer.is_correct() {
                Some(true) => stats.correct += 1,
                Some(false) => stats.wrong += 1,
                None => stats.unrevealed += 1,
            }
        }
        stats
    }

    /// 本次会话已进行的分钟数
    pub fn minutes_spent(&self) -> i64 {
        self.minutes_since(Local::now())
    }

    fn minutes_since(&self, now: DateTime<Local>) -> i64 {
        (now - self.started_at).num_minutes().max(0)
    }

    fn view(&self, item: Arc<McqItem>) -> ItemView {
        let interaction = self.book.interaction(item.id);
        let answer = interaction
            .as_ref()
            .map(|i| i.answer.clone())
            .unwrap_or_default();

        let options = item
            .options
            .iter()
            .map(|option| OptionView {
                id: option.id.clone(),
                label: option.label.clone(),
                verdict: answer.verdict(&option.id),
                phase: interaction
                    .as_ref()
                    .map(|i| i.animator.phase(&option.id))
                    .unwrap_or_default(),
            })
            .collect();

        ItemView {
            celebrate: interaction.as_ref().is_some_and(|i| i.celebrate()),
            item,
            answer,
            options,
        }
    }
}
