//! 文档生成流程 - 流程层
//!
//! 核心职责：定义"一次运行"的完整处理流程
//!
//! 流程顺序：
//! 1. ANALYZING（10%）→ analyze
//! 2. GENERATING（40%）→ generate
//! 3. FINALIZING（90%）→ 固定停顿
//!
//! 每次远端调用和停顿都是一个挂起点；没有重试，也没有回滚。

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::error::{
    AnalysisServiceError, GenerationError, ANALYSIS_UNAVAILABLE_MESSAGE, CONTENT_RETRIEVAL_MESSAGE,
};
use crate::models::{DocumentationRecord, ProcessingStatus};
use crate::services::AnalysisService;
use crate::utils::logging::truncate_text;
use crate::workflow::progress::ProgressTracker;

pub const STEP_ANALYZING: &str = "Fetching project files & identifying tech stack...";
pub const STEP_GENERATING: &str = "AI is analyzing code and generating content...";
pub const STEP_FINALIZING: &str = "Preparing document preview...";

pub const PROGRESS_ANALYZING: u8 = 10;
pub const PROGRESS_ANALYZED: u8 = 40;
pub const PROGRESS_GENERATED: u8 = 90;

/// 文档生成流程
///
/// - 编排两次远端调用和收尾停顿
/// - 不持有运行状态，只通过 tracker 推进
/// - 不写历史记录（由编排层负责）
pub struct GenerationFlow {
    service: Arc<dyn AnalysisService>,
    finalize_delay: Duration,
}

impl GenerationFlow {
    pub fn new(service: Arc<dyn AnalysisService>, finalize_delay: Duration) -> Self {
        Self {
            service,
            finalize_delay,
        }
    }

    /// 执行一次运行，直到进入 FINALIZING 并完成停顿
    ///
    /// 失败时 tracker 已进入 ERROR。运行被取代时返回 `Superseded`。
    pub async fn run(
        &self,
        tracker: &mut ProgressTracker<'_>,
    ) -> Result<DocumentationRecord, GenerationError> {
        let url = tracker.url().to_string();

        // ========== 阶段 1: 分析 ==========
        ensure_current(tracker.advance(ProcessingStatus::Analyzing, PROGRESS_ANALYZING, STEP_ANALYZING))?;
        info!("🔍 [运行 #{}] 开始分析: {}", tracker.run_id(), url);

        let ticket = match self.service.analyze(&url).await {
            Ok(ticket) => ticket,
            Err(e) => {
                return Err(self.fail(tracker, unavailable(&e), &e));
            }
        };
        info!(
            "✓ [运行 #{}] 分析完成: {} (任务 {})",
            tracker.run_id(),
            ticket.project_name,
            ticket.analysis_id
        );

        // ========== 阶段 2: 生成 ==========
        ensure_current(tracker.advance(ProcessingStatus::Generating, PROGRESS_ANALYZED, STEP_GENERATING))?;

        let record = match self.service.generate(&ticket.analysis_id, &url).await {
            Ok(record) => record,
            Err(e) => {
                return Err(self.fail(tracker, retrieval_failed(&e), &e));
            }
        };
        info!(
            "✓ [运行 #{}] 文档已生成: {} ({})",
            tracker.run_id(),
            record.project_name,
            truncate_text(&record.executive_summary, 40)
        );

        // ========== 阶段 3: 收尾 ==========
        ensure_current(tracker.advance(ProcessingStatus::Finalizing, PROGRESS_GENERATED, STEP_FINALIZING))?;
        tokio::time::sleep(self.finalize_delay).await;

        Ok(record)
    }

    fn fail(
        &self,
        tracker: &mut ProgressTracker<'_>,
        error: GenerationError,
        cause: &AnalysisServiceError,
    ) -> GenerationError {
        error!("❌ [运行 #{}] {} (原因: {})", tracker.run_id(), error, cause);
        if tracker.fail(&error) {
            error
        } else {
            GenerationError::Superseded
        }
    }
}

fn ensure_current(published: bool) -> Result<(), GenerationError> {
    if published {
        Ok(())
    } else {
        Err(GenerationError::Superseded)
    }
}

fn unavailable(e: &AnalysisServiceError) -> GenerationError {
    GenerationError::ServiceUnavailable(
        e.user_message()
            .unwrap_or_else(|| ANALYSIS_UNAVAILABLE_MESSAGE.to_string()),
    )
}

fn retrieval_failed(e: &AnalysisServiceError) -> GenerationError {
    GenerationError::ContentRetrievalFailed(
        e.user_message()
            .unwrap_or_else(|| CONTENT_RETRIEVAL_MESSAGE.to_string()),
    )
}
