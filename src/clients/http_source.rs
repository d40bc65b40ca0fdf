/// 题目服务 HTTP 客户端
///
/// 封装 `/for_you` 与 `/reveal` 两个接口的调用逻辑
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::clients::QuestionSource;
use crate::config::Config;
use crate::error::NetworkError;
use crate::models::{ForYouPayload, McqItem, RevealPayload};

const FOR_YOU_ENDPOINT: &str = "for_you";
const REVEAL_ENDPOINT: &str = "reveal";

/// 题目服务 HTTP 客户端
pub struct HttpQuestionSource {
    client: Client,
    base_url: String,
}

impl HttpQuestionSource {
    /// 创建新的题目服务客户端
    pub fn new(config: &Config) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(NetworkError::ClientBuildFailed)?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// 发送 GET 请求并解析 JSON
    ///
    /// # 参数
    /// - `endpoint`: 接口路径
    /// - `query`: 查询参数
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, NetworkError> {
        let url = self.url(endpoint);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| NetworkError::request_failed(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| NetworkError::request_failed(endpoint, e))?;

        serde_json::from_slice(&body).map_err(|e| NetworkError::malformed(endpoint, e))
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn fetch_next(&self) -> Result<McqItem, NetworkError> {
        let payload: ForYouPayload = self.get_json(FOR_YOU_ENDPOINT, &[]).await?;
        let item =
            McqItem::try_from(payload).map_err(|e| NetworkError::malformed(FOR_YOU_ENDPOINT, e))?;

        debug!("收到题目: {}", item);
        Ok(item)
    }

    async fn fetch_reveal(&self, item_id: u64) -> Result<String, NetworkError> {
        let payload: RevealPayload = self
            .get_json(REVEAL_ENDPOINT, &[("id", item_id.to_string())])
            .await?;

        let correct = payload
            .first_correct()
            .ok_or(NetworkError::EmptyReveal { item_id })?
            .to_string();

        debug!("题目 {} 的正确选项: {}", item_id, correct);
        Ok(correct)
    }
}
