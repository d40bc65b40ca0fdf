//! 预取调度 - 流程层
//!
//! 把"当前看到第几道题"转换成对 `FeedStore::append_one` 的调用。
//! 重叠请求由 FeedStore 的在途标记拦截，这里不再重复实现。

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::Config;
use crate::services::{AppendOutcome, FeedStore};

/// 预取策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchPolicy {
    /// 当前题目之后剩余不超过这么多道时视为接近末尾
    pub threshold: usize,
    /// 当前题目之后最多缓冲的题目数，达到后不再追加
    pub max_lookahead: usize,
}

impl Default for PrefetchPolicy {
    fn default() -> Self {
        Self {
            threshold: 1,
            max_lookahead: 2,
        }
    }
}

impl PrefetchPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold: config.prefetch_threshold,
            max_lookahead: config.max_lookahead,
        }
    }
}

/// 一次滑动信号的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefetchDecision {
    /// 离末尾还远
    NotNearEnd,
    /// 缓冲已满
    LookaheadFull,
    /// 已请求追加
    Requested(AppendOutcome),
}

/// 预取调度器
pub struct PrefetchScheduler {
    store: Arc<FeedStore>,
    policy: PrefetchPolicy,
}

impl PrefetchScheduler {
    pub fn new(store: Arc<FeedStore>, policy: PrefetchPolicy) -> Self {
        Self { store, policy }
    }

    /// 判断当前位置该不该追加
    pub fn decide(&self, viewed_index: usize, len: usize) -> Option<PrefetchDecision> {
        let remaining = len.saturating_sub(viewed_index + 1);
        if remaining > self.policy.threshold {
            return Some(PrefetchDecision::NotNearEnd);
        }
        if remaining >= self.policy.max_lookahead {
            return Some(PrefetchDecision::LookaheadFull);
        }
        None
    }

    /// 处理滑动信号
    ///
    /// # 参数
    /// - `viewed_index`: 当前看到的题目下标（从 0 开始）
    pub async fn on_scroll(&self, viewed_index: usize) -> PrefetchDecision {
        let len = self.store.len();
        if let Some(decision) = self.decide(viewed_index, len) {
            debug!("滑动到 {}/{}: {:?}", viewed_index + 1, len, decision);
            return decision;
        }
        PrefetchDecision::Requested(self.store.append_one().await)
    }

    /// 在后台处理滑动信号，不阻塞调用方
    pub fn spawn_on_scroll(self: &Arc<Self>, viewed_index: usize) -> JoinHandle<PrefetchDecision> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move { scheduler.on_scroll(viewed_index).await })
    }
}
