//! 分析服务 - 业务能力层
//!
//! 远端分析/生成服务的契约。真实 HTTP 客户端和本地替身各实现一次，
//! 启动时由 [`build_analysis_service`] 选定，调用方不再关心是哪一个。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::clients::HttpAnalysisClient;
use crate::config::Config;
use crate::error::{AnalysisServiceError, AppResult};
use crate::models::{AnalysisTicket, DocumentationRecord};
use crate::services::MockAnalysisService;

/// 远端分析服务契约
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// 第一步：提交 URL，返回分析任务
    async fn analyze(&self, url: &str) -> Result<AnalysisTicket, AnalysisServiceError>;

    /// 第二步：根据分析任务取回生成的文档
    async fn generate(
        &self,
        analysis_id: &str,
        url: &str,
    ) -> Result<DocumentationRecord, AnalysisServiceError>;
}

/// 根据配置选择服务实现
pub fn build_analysis_service(config: &Config) -> AppResult<Arc<dyn AnalysisService>> {
    if config.is_mock_mode() {
        warn!("⚠️ [MOCK MODE] 未配置分析服务地址，使用本地替身。设置 DOCUGEN_API_BASE_URL 以连接真实后端");
        return Ok(Arc::new(MockAnalysisService::new(config)));
    }

    info!("🌐 使用远端分析服务: {}", config.api_base_url);
    let client = HttpAnalysisClient::new(config)?;
    Ok(Arc::new(client))
}
