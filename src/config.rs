use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 程序配置
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 题目服务地址（不带结尾斜杠）
    pub api_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 首屏加载的题目数量
    pub initial_load_count: usize,
    /// 距离列表末尾多少页以内视为"接近末尾"
    pub prefetch_threshold: usize,
    /// 当前题目之后最多缓冲的题目数
    pub max_lookahead: usize,
    /// 题目源失败后的重试次数，0 表示不重试
    pub max_retries: usize,
    /// 重试间隔基数（毫秒），按次数线性增长
    pub retry_backoff_ms: u64,
    /// 无界面模式下模拟滑动的页数
    pub demo_pages: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://cross-platform.rp.devfactory.com".to_string(),
            request_timeout_secs: 10,
            initial_load_count: 3,
            prefetch_threshold: 1,
            max_lookahead: 2,
            max_retries: 0,
            retry_backoff_ms: 500,
            demo_pages: 5,
            verbose_logging: false,
            output_log_file: "feed_session.log".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量读取配置，未设置的项使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从 TOML 文件读取配置，缺失的键使用默认值
    pub async fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::FileReadFailed {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// 设置了 `FEED_CONFIG_FILE` 时读取该文件，否则读取环境变量
    pub async fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var("FEED_CONFIG_FILE") {
            Ok(path) => Self::from_toml_file(path).await?,
            Err(_) => Self::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// 检查配置取值是否合法
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = reqwest::Url::parse(&self.api_base_url) {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url".to_string(),
                reason: e.to_string(),
            });
        }
        if self.initial_load_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "initial_load_count".to_string(),
                reason: "首屏至少加载 1 道题".to_string(),
            });
        }
        if self.max_lookahead == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_lookahead".to_string(),
                reason: "预加载上限至少为 1，否则题目流不会增长".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                reason: "超时时间必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    fn from_toml_str(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            api_base_url: lookup("FEED_API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(default.api_base_url),
            request_timeout_secs: parse_var(&lookup, "FEED_REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(default.request_timeout_secs),
            initial_load_count: parse_var(&lookup, "FEED_INITIAL_LOAD_COUNT", "usize")?
                .unwrap_or(default.initial_load_count),
            prefetch_threshold: parse_var(&lookup, "FEED_PREFETCH_THRESHOLD", "usize")?
                .unwrap_or(default.prefetch_threshold),
            max_lookahead: parse_var(&lookup, "FEED_MAX_LOOKAHEAD", "usize")?
                .unwrap_or(default.max_lookahead),
            max_retries: parse_var(&lookup, "FEED_MAX_RETRIES", "usize")?
                .unwrap_or(default.max_retries),
            retry_backoff_ms: parse_var(&lookup, "FEED_RETRY_BACKOFF_MS", "u64")?
                .unwrap_or(default.retry_backoff_ms),
            demo_pages: parse_var(&lookup, "FEED_DEMO_PAGES", "usize")?
                .unwrap_or(default.demo_pages),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
