//! 答案缓存 - 业务能力层
//!
//! 对同一道题的 reveal 请求去重并缓存结果

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::QuestionSource;

type PendingReveal = Shared<BoxFuture<'static, Option<String>>>;

enum RevealEntry {
    /// 请求在途，后来的调用方共享同一个结果
    Pending(PendingReveal),
    /// 已拿到正确答案，会话内不再请求
    Resolved(String),
}

/// 答案缓存
///
/// 职责：
/// - 已缓存的题目直接返回，不发请求
/// - 同一道题同一时刻最多一个在途请求
/// - 失败不缓存，之后的调用可以重新请求
pub struct RevealCache {
    source: Arc<dyn QuestionSource>,
    entries: Mutex<HashMap<u64, RevealEntry>>,
}

impl RevealCache {
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// 查询题目的正确选项
    ///
    /// # 返回
    /// 正确选项 id；请求失败时返回 `None`（错误已记录日志）
    pub async fn reveal(&self, item_id: u64) -> Option<String> {
        let pending = {
            let mut entries = self.entries.lock();
            match entries.get(&item_id) {
                Some(RevealEntry::Resolved(correct)) => return Some(correct.clone()),
                Some(RevealEntry::Pending(pending)) => {
                    debug!("题目 {} 的答案请求在途，等待同一结果", item_id);
                    pending.clone()
                }
                None => {
                    let pending = self.start_fetch(item_id);
                    entries.insert(item_id, RevealEntry::Pending(pending.clone()));
                    pending
                }
            }
        };

        let outcome = pending.clone().await;

        let mut entries = self.entries.lock();
        let still_ours = matches!(
            entries.get(&item_id),
            Some(RevealEntry::Pending(current)) if current.ptr_eq(&pending)
        );
        if still_ours {
            match &outcome {
                Some(correct) => {
                    entries.insert(item_id, RevealEntry::Resolved(correct.clone()));
                }
                None => {
                    entries.remove(&item_id);
                }
            }
        }

        outcome
    }

    /// 已缓存的正确答案，不发请求
    pub fn cached(&self, item_id: u64) -> Option<String> {
        match self.entries.lock().get(&item_id) {
            Some(RevealEntry::Resolved(correct)) => Some(correct.clone()),
            _ => None,
        }
    }

    pub fn is_pending(&self, item_id: u64) -> bool {
        matches!(
            self.entries.lock().get(&item_id),
            Some(RevealEntry::Pending(_))
        )
    }

    fn start_fetch(&self, item_id: u64) -> PendingReveal {
        let source = Arc::clone(&self.source);
        async move {
            debug!("查询题目 {} 的正确答案", item_id);
            match source.fetch_reveal(item_id).await {
                Ok(correct) => Some(correct),
                Err(e) => {
                    warn!("题目 {} 的答案查询失败: {}", item_id, e);
                    None
                }
            }
        }
        .boxed()
        .shared()
    }
}
