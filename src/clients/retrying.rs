//! 带重试的题目源
//!
//! 在题目源边界上追加"失败重试 + 退避"，不改变错误的传播约定：
//! 重试耗尽后仍然把最后一个 `NetworkError` 交给调用方。

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::clients::QuestionSource;
use crate::config::Config;
use crate::error::NetworkError;
use crate::models::McqItem;

/// 带重试的题目源
pub struct RetryingSource<S> {
    inner: S,
    max_retries: usize,
    backoff: Duration,
}

impl<S: QuestionSource> RetryingSource<S> {
    pub fn new(inner: S, max_retries: usize, backoff: Duration) -> Self {
        Self {
            inner,
            max_retries,
            backoff,
        }
    }

    /// 按配置创建
    pub fn from_config(inner: S, config: &Config) -> Self {
        Self::new(
            inner,
            config.max_retries,
            Duration::from_millis(config.retry_backoff_ms),
        )
    }

    /// 第 `attempt` 次重试前的等待时间，线性增长，溢出时取上限
    fn backoff_for(&self, attempt: usize) -> Duration {
        let factor = u32::try_from(attempt).unwrap_or(u32::MAX);
        self.backoff.saturating_mul(factor)
    }

    async fn with_retry<T, F, Fut>(&self, what: &str, mut call: F) -> Result<T, NetworkError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, NetworkError>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries && e.is_transient() => {
                    attempt += 1;
                    let wait = self.backoff_for(attempt);
                    warn!(
                        "{} 失败 (尝试 {}/{}), {:?} 后重试: {}",
                        what,
                        attempt,
                        self.max_retries + 1,
                        wait,
                        e
                    );
                    sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl<S: QuestionSource> QuestionSource for RetryingSource<S> {
    async fn fetch_next(&self) -> Result<McqItem, NetworkError> {
        self.with_retry("拉取题目", || self.inner.fetch_next()).await
    }

    async fn fetch_reveal(&self, item_id: u64) -> Result<String, NetworkError> {
        self.with_retry("查询答案", || self.inner.fetch_reveal(item_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_item, ScriptedSource};

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let source = ScriptedSource::new(vec![None, None, Some(sample_item(1))]);
        let retrying = RetryingSource::new(source, 2, Duration::from_millis(1));

        let item = retrying.fetch_next().await.unwrap();
        assert_eq!(item.id, 1);
        assert_eq!(retrying.inner.fetch_calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let source = ScriptedSource::new(vec![None, None, None, Some(sample_item(1))]);
        let retrying = RetryingSource::new(source, 1, Duration::from_millis(1));

        assert!(retrying.fetch_next().await.is_err());
        // 1 次原始调用 + 1 次重试
        assert_eq!(retrying.inner.fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_zero_retries_is_pass_through() {
        let source = ScriptedSource::new(vec![None, Some(sample_item(1))]);
        let retrying = RetryingSource::new(source, 0, Duration::from_millis(1));

        assert!(retrying.fetch_next().await.is_err());
        assert_eq!(retrying.inner.fetch_calls(), 1);
    }

    #[test]
    fn test_backoff_grows_linearly_and_saturates() {
        let retrying = RetryingSource::new(ScriptedSource::new(vec![]), 3, Duration::from_millis(500));
        assert_eq!(retrying.backoff_for(1), Duration::from_millis(500));
        assert_eq!(retrying.backoff_for(3), Duration::from_millis(1500));

        let retrying = RetryingSource::new(ScriptedSource::new(vec![]), 3, Duration::MAX);
        assert_eq!(retrying.backoff_for(2), Duration::MAX);
        assert_eq!(retrying.backoff_for(usize::MAX), Duration::MAX);
    }

    #[tokio::test]
    async fn test_malformed_reveal_is_not_retried() {
        // 没有登记答案的题目返回 EmptyReveal，不属于瞬时错误
        let source = ScriptedSource::new(vec![]);
        let retrying = RetryingSource::new(source, 3, Duration::from_millis(1));

        let err = retrying.fetch_reveal(9).await.unwrap_err();
        assert!(matches!(err, NetworkError::EmptyReveal { item_id: 9 }));
        assert_eq!(retrying.inner.reveal_calls(), 1);
    }
}
