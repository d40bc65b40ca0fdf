//! 单元测试用的脚本化题目源

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::clients::QuestionSource;
use crate::error::NetworkError;
use crate::models::{Author, McqItem, McqOption};

/// 构造一道带 4 个选项（`{id}a` ~ `{id}d`）的题
pub(crate) fn sample_item(id: u64) -> McqItem {
    McqItem {
        id,
        kind: "mcq".to_string(),
        question: format!("Question {id}?"),
        options: ["a", "b", "c", "d"]
            .iter()
            .map(|suffix| McqOption {
                id: format!("{id}{suffix}"),
                label: format!("Answer {id}{suffix}"),
            })
            .collect(),
        image: format!("https://example.com/{id}.png"),
        description: "description".to_string(),
        playlist: "playlist".to_string(),
        author: Author {
            name: "author".to_string(),
            avatar_url: "https://example.com/avatar.png".to_string(),
        },
    }
}

/// 按脚本依次返回题目的假题目源
///
/// 脚本中的 `None` 表示该次请求失败；脚本耗尽后所有请求都失败。
pub(crate) struct ScriptedSource {
    items: Mutex<VecDeque<Option<McqItem>>>,
    reveals: Mutex<HashMap<u64, String>>,
    failing_reveals: AtomicUsize,
    fetch_calls: AtomicUsize,
    reveal_calls: AtomicUsize,
    active_fetches: AtomicUsize,
    max_active_fetches: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
    delay: Duration,
}

impl ScriptedSource {
    pub(crate) fn new(script: Vec<Option<McqItem>>) -> Self {
        Self {
            items: Mutex::new(script.into()),
            reveals: Mutex::new(HashMap::new()),
            failing_reveals: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            reveal_calls: AtomicUsize::new(0),
            active_fetches: AtomicUsize::new(0),
            max_active_fetches: AtomicUsize::new(0),
            gate: None,
            delay: Duration::ZERO,
        }
    }

    /// 依次返回给定 id 的题目，每道题的正确答案为 `{id}b`
    pub(crate) fn from_ids(ids: &[u64]) -> Self {
        let source = Self::new(ids.iter().map(|&id| Some(sample_item(id))).collect());
        for &id in ids {
            source.reveals.lock().insert(id, format!("{id}b"));
        }
        source
    }

    pub(crate) fn with_reveal(self, item_id: u64, option_id: &str) -> Self {
        self.reveals.lock().insert(item_id, option_id.to_string());
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// 每个请求都要先拿到一个许可才会返回，返回用于放行的信号量
    pub(crate) fn with_gate(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// 接下来 `n` 次 reveal 请求失败
    pub(crate) fn fail_next_reveals(&self, n: usize) {
        self.failing_reveals.store(n, Ordering::SeqCst);
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn reveal_calls(&self) -> usize {
        self.reveal_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn max_active_fetches(&self) -> usize {
        self.max_active_fetches.load(Ordering::SeqCst)
    }

    async fn wait_turn(&self) {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

fn transport_failure(endpoint: &str) -> NetworkError {
    NetworkError::request_failed(
        endpoint,
        std::io::Error::new(std::io::ErrorKind::ConnectionReset, "scripted failure"),
    )
}

#[async_trait]
impl QuestionSource for ScriptedSource {
    async fn fetch_next(&self) -> Result<McqItem, NetworkError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let active = self.active_fetches.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_fetches.fetch_max(active, Ordering::SeqCst);

        self.wait_turn().await;

        self.active_fetches.fetch_sub(1, Ordering::SeqCst);
        let next = self.items.lock().pop_front().flatten();
        next.ok_or_else(|| transport_failure("for_you"))
    }

    async fn fetch_reveal(&self, item_id: u64) -> Result<String, NetworkError> {
        self.reveal_calls.fetch_add(1, Ordering::SeqCst);

        self.wait_turn().await;

        let failing = self.failing_reveals.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_reveals.store(failing - 1, Ordering::SeqCst);
            return Err(transport_failure("reveal"));
        }

        let correct = self.reveals.lock().get(&item_id).cloned();
        correct.ok_or(NetworkError::EmptyReveal { item_id })
    }
}
