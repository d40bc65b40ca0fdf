use async_trait::async_trait;

use crate::error::NetworkError;
use crate::models::McqItem;

/// 题目源
///
/// 职责：
/// - `fetch_next` 拉取下一道题
/// - `fetch_reveal` 查询某道题的正确选项
/// - 不缓存、不重试（分别由 RevealCache 与 RetryingSource 负责）
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// 拉取下一道题
    async fn fetch_next(&self) -> Result<McqItem, NetworkError>;

    /// 查询题目的正确选项 id
    async fn fetch_reveal(&self, item_id: u64) -> Result<String, NetworkError>;
}
