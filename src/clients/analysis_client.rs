/// 分析服务 HTTP 客户端
///
/// 封装所有与远端分析服务相关的调用逻辑
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AnalysisServiceError, AppResult, ConfigError};
use crate::models::{AnalysisTicket, DocumentationRecord};
use crate::services::AnalysisService;

/// 分析服务客户端
pub struct HttpAnalysisClient {
    client: Client,
    base_url: String,
}

impl HttpAnalysisClient {
    /// 创建新的分析服务客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// 检查状态码并解析 JSON 响应体
    async fn read_json<T: DeserializeOwned>(
        endpoint: &str,
        response: Response,
    ) -> Result<T, AnalysisServiceError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisServiceError::unreachable(endpoint, e))?;

        if !status.is_success() {
            return Err(AnalysisServiceError::BadResponse {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| AnalysisServiceError::malformed(endpoint, e))
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(&self, url: &str) -> Result<AnalysisTicket, AnalysisServiceError> {
        let endpoint = self.endpoint("analyze");
        info!("[API] 提交分析请求: {}", url);

        let response = self
            .client
            .post(&endpoint)
            .json(&json!({ "url": url }))
            .send()
            .await
            .map_err(|e| {
                warn!("[API] 分析请求失败: {}", e);
                AnalysisServiceError::unreachable(&endpoint, e)
            })?;

        let ticket: AnalysisTicket = Self::read_json(&endpoint, response).await?;
        debug!("[API] 分析任务已创建: {}", ticket.analysis_id);
        Ok(ticket)
    }

    async fn generate(
        &self,
        analysis_id: &str,
        _url: &str,
    ) -> Result<DocumentationRecord, AnalysisServiceError> {
        let endpoint = self.endpoint(&format!("result/{}", analysis_id));
        info!("[API] 获取文档内容，分析任务: {}", analysis_id);

        let response = self.client.get(&endpoint).send().await.map_err(|e| {
            warn!("[API] 文档获取失败: {}", e);
            AnalysisServiceError::unreachable(&endpoint, e)
        })?;

        Self::read_json(&endpoint, response).await
    }
}

/// 从错误响应体中提取 `message` 或 `error` 字段
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"message":"repo not found"}"#).as_deref(),
            Some("repo not found")
        );
        assert_eq!(
            extract_error_message(r#"{"error":"rate limited","message":""}"#).as_deref(),
            Some("rate limited")
        );
        assert_eq!(extract_error_message("<html>502</html>"), None);
        assert_eq!(extract_error_message(r#"{"code":500}"#), None);
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let config = Config {
            api_base_url: "http://localhost:8000/api/".to_string(),
            ..Config::headless()
        };
        let client = HttpAnalysisClient::new(&config).unwrap();
        assert_eq!(client.endpoint("analyze"), "http://localhost:8000/api/analyze");
        assert_eq!(client.endpoint("result/abc"), "http://localhost:8000/api/result/abc");
    }
}
