use thiserror::Error;

/// URL 校验失败时展示给用户的提示
pub const VALIDATION_MESSAGE: &str = "Please enter a valid URL (e.g., https://example.com).";

/// 第一次远端调用失败且没有具体信息时的提示
pub const ANALYSIS_UNAVAILABLE_MESSAGE: &str =
    "Could not connect to the backend to start analysis. Please ensure it is running and the API URL is correct.";

/// 第二次远端调用失败且没有具体信息时的提示
pub const CONTENT_RETRIEVAL_MESSAGE: &str =
    "Could not retrieve the generated document from the backend. Please check the server status.";

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 生成流程错误
    #[error("生成错误: {0}")]
    Generation(#[from] GenerationError),
    /// 远端分析服务错误
    #[error("分析服务错误: {0}")]
    Service(#[from] AnalysisServiceError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 一次生成运行的失败原因
///
/// 前三种会作为 `last_error` 展示给用户，消息文本即 `Display` 输出。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// URL 格式不合法，未发起任何远端调用
    #[error("{0}")]
    Validation(String),
    /// 第一次远端调用失败
    #[error("{0}")]
    ServiceUnavailable(String),
    /// 第二次远端调用失败或返回了无法使用的数据
    #[error("{0}")]
    ContentRetrievalFailed(String),
    /// 已有运行在进行中（拒绝策略）
    #[error("a generation run is already in progress")]
    Busy,
    /// 被更新的提交取代，结果被丢弃
    #[error("the run was superseded by a newer submission")]
    Superseded,
}

/// 远端分析服务（真实或替身）报告的错误
#[derive(Debug, Error)]
pub enum AnalysisServiceError {
    /// 网络不可达或超时
    #[error("无法访问 {endpoint}: {source}")]
    Unreachable {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务返回非 2xx 响应
    #[error("{endpoint} 返回错误响应 (status={status}): {message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 响应无法解析为预期结构
    #[error("{endpoint} 返回的数据无法解析: {source}")]
    Malformed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// URL 无法解析出主机名
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
}

impl AnalysisServiceError {
    /// 可以原样展示给用户的消息（如果有）
    pub fn user_message(&self) -> Option<String> {
        match self {
            AnalysisServiceError::BadResponse { message, .. } => message.clone(),
            AnalysisServiceError::InvalidUrl { .. } => Some(self.to_string()),
            AnalysisServiceError::Unreachable { .. } | AnalysisServiceError::Malformed { .. } => {
                None
            }
        }
    }
}

/// 历史记录持久化错误，总是在本地吞掉
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("读取 {key} 失败: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("写入 {key} 失败: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("序列化历史记录失败: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("历史记录格式错误: {0}")]
    Deserialize(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置值不合法
    #[error("配置项 {field} 的值 '{value}' 不合法: {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
    /// HTTP 客户端构建失败
    #[error("无法创建 HTTP 客户端: {0}")]
    HttpClient(#[source] reqwest::Error),
}

// ========== 便捷构造函数 ==========

impl AnalysisServiceError {
    /// 创建网络不可达错误
    pub fn unreachable(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AnalysisServiceError::Unreachable {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 创建数据解析错误
    pub fn malformed(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        AnalysisServiceError::Malformed {
            endpoint: endpoint.into(),
            source,
        }
    }
}

impl PersistenceError {
    pub fn read(key: impl Into<String>, source: std::io::Error) -> Self {
        PersistenceError::Read {
            key: key.into(),
            source,
        }
    }

    pub fn write(key: impl Into<String>, source: std::io::Error) -> Self {
        PersistenceError::Write {
            key: key.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
