//! 题目流存储 - 业务能力层
//!
//! 持有按到达顺序排列、只追加的题目列表

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clients::QuestionSource;
use crate::models::McqItem;

/// 单次追加的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// 成功追加
    Appended { item_id: u64, len: usize },
    /// 已有请求在途，本次未发请求
    InFlight,
    /// 请求失败，列表未变
    Failed,
}

/// 在途标记守卫，离开作用域（含 future 被丢弃）时清除标记
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// 题目流存储
///
/// 职责：
/// - 首屏顺序加载若干道题
/// - 滑动到底时追加一道题，同一时刻最多一个追加请求
/// - 首屏加载与追加串行执行，先到的追加不会吞掉首屏
/// - 只暴露只读快照，列表只增不减、不重排
/// - 吞掉所有网络错误，只记录日志
pub struct FeedStore {
    source: Arc<dyn QuestionSource>,
    items: RwLock<Vec<Arc<McqItem>>>,
    append_in_flight: AtomicBool,
    initialized: AtomicBool,
    /// 拉取题目的串行锁，首屏与追加共用
    load_lock: Mutex<()>,
}

impl FeedStore {
    /// 创建新的题目流存储
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            source,
            items: RwLock::new(Vec::new()),
            append_in_flight: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            load_lock: Mutex::new(()),
        }
    }

    /// 首屏加载
    ///
    /// 逐个请求 `count` 道题，上一道返回后才发下一道，显示顺序即请求顺序。
    /// 失败的请求跳过不重试，因此结果可能少于 `count` 道。
    /// 已有追加在途时先等它完成再开始，首屏题目排在它之后。
    /// 加载期间占用在途标记，滑动触发的追加会直接返回。
    ///
    /// # 返回
    /// 加载完成后的题目数量
    pub async fn initialize(&self, count: usize) -> usize {
        let _load = self.load_lock.lock().await;

        if self.initialized.swap(true, Ordering::AcqRel) {
            warn!("题目流已初始化，忽略重复的首屏加载");
            return self.len();
        }

        // 抢不到说明有追加正在排队等锁，它会在首屏之后执行
        let _guard = InFlightGuard::try_acquire(&self.append_in_flight);

        info!("📥 开始首屏加载 {} 道题", count);

        let mut fetched = Vec::with_capacity(count);
        for round in 1..=count {
            match self.source.fetch_next().await {
                Ok(item) => {
                    debug!("首屏第 {}/{} 道题: {}", round, count, item);
                    fetched.push(Arc::new(item));
                }
                Err(e) => {
                    warn!("首屏第 {}/{} 道题加载失败，跳过: {}", round, count, e);
                }
            }
        }

        let mut items = self.items.write();
        items.extend(fetched);
        info!("✓ 首屏加载完成: {}/{}", items.len(), count);
        items.len()
    }

    /// 追加一道题
    ///
    /// 已有请求在途时直接返回 [`AppendOutcome::InFlight`]，不发新请求。
    pub async fn append_one(&self) -> AppendOutcome {
        let Some(_guard) = InFlightGuard::try_acquire(&self.append_in_flight) else {
            debug!("追加请求在途，忽略本次触发");
            return AppendOutcome::InFlight;
        };
        let _load = self.load_lock.lock().await;

        info!("📥 已接近列表末尾，追加新题目");

        match self.source.fetch_next().await {
            Ok(item) => {
                let item_id = item.id;
                let mut items = self.items.write();
                items.push(Arc::new(item));
                debug!("追加题目 {}，当前共 {} 道", item_id, items.len());
                AppendOutcome::Appended {
                    item_id,
                    len: items.len(),
                }
            }
            Err(e) => {
                warn!("追加题目失败: {}", e);
                AppendOutcome::Failed
            }
        }
    }

    /// 当前题目列表的只读快照
    pub fn snapshot(&self) -> Vec<Arc<McqItem>> {
        self.items.read().clone()
    }

    /// 按 id 查找题目
    pub fn get(&self, item_id: u64) -> Option<Arc<McqItem>> {
        self.items.read().iter().find(|i| i.id == item_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_append_in_flight(&self) -> bool {
        self.append_in_flight.load(Ordering::Acquire)
    }
}
