use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 网络相关错误
    #[error("网络错误: {0}")]
    Network(#[from] NetworkError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 其他错误
    #[error("错误: {0}")]
    Other(String),
}

/// 题目源（QuestionSource）唯一会抛出的错误类型
///
/// 传输失败、非 2xx 响应、响应体格式错误都归入此类。
/// 调用方（FeedStore / RevealCache）负责吞掉并记录日志。
#[derive(Debug, Error)]
pub enum NetworkError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务端返回非 2xx 状态码
    #[error("服务端返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// 响应体无法解析
    #[error("响应格式错误 ({endpoint}): {source}")]
    MalformedPayload {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// reveal 响应中没有正确选项
    #[error("题目 {item_id} 的 reveal 结果为空")]
    EmptyReveal { item_id: u64 },
    /// HTTP 客户端构建失败
    #[error("HTTP 客户端构建失败: {0}")]
    ClientBuildFailed(#[source] reqwest::Error),
}

impl NetworkError {
    /// 创建请求失败错误
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        NetworkError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 创建响应格式错误
    pub fn malformed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        NetworkError::MalformedPayload {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 是否值得重试（格式错误重试也没用）
    pub fn is_transient(&self) -> bool {
        match self {
            NetworkError::RequestFailed { .. } => true,
            NetworkError::BadStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置项取值非法
    #[error("配置项 {field} 非法: {reason}")]
    InvalidValue { field: String, reason: String },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
        assert!(NetworkError::request_failed("/for_you", io).is_transient());
        assert!(NetworkError::BadStatus {
            endpoint: "/for_you".into(),
            status: 503
        }
        .is_transient());
        assert!(!NetworkError::BadStatus {
            endpoint: "/for_you".into(),
            status: 404
        }
        .is_transient());
        assert!(!NetworkError::EmptyReveal { item_id: 7 }.is_transient());
    }

    #[test]
    fn test_app_error_wraps_network_error() {
        let err: AppError = NetworkError::EmptyReveal { item_id: 7 }.into();
        assert!(matches!(err, AppError::Network(_)));
        assert!(err.to_string().contains("7"));
    }
}
