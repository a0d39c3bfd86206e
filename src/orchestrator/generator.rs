//! 文档生成器 - 编排层
//!
//! ## 职责
//!
//! 驱动一次提交从校验到完成（或失败），对外暴露当前快照，
//! 成功后写入历史记录，并在宽限期后自动回到 IDLE。
//!
//! ## 设计特点
//!
//! - **单一运行**：同一时间只跟踪一次运行，新提交按 `ConcurrencyPolicy` 处理
//! - **无取消**：进入 ANALYZING 后一直运行到 COMPLETE 或 ERROR，被取代的运行只是结果被丢弃
//! - **向下委托**：流程细节交给 `GenerationFlow`，持久化交给 `HistoryStore`

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::config::{ConcurrencyPolicy, Config};
use crate::error::{GenerationError, VALIDATION_MESSAGE};
use crate::models::{DocumentationRecord, GenerationSnapshot, HistoryEntry};
use crate::services::{AnalysisService, HistoryStore};
use crate::workflow::{GenerationFlow, SessionState};

pub const STEP_COMPLETE: &str = "Documentation is ready.";

/// 文档生成器
pub struct DocumentationGenerator {
    session: Arc<SessionState>,
    flow: GenerationFlow,
    history: Arc<HistoryStore>,
    policy: ConcurrencyPolicy,
    reset_grace: Duration,
}

impl DocumentationGenerator {
    pub fn new(
        config: &Config,
        service: Arc<dyn AnalysisService>,
        history: Arc<HistoryStore>,
    ) -> Self {
        Self {
            session: Arc::new(SessionState::new()),
            flow: GenerationFlow::new(service, config.finalize_delay()),
            history,
            policy: config.concurrency_policy,
            reset_grace: config.reset_grace(),
        }
    }

    /// 提交一个 URL 并运行到结束
    ///
    /// 成功时返回文档，此时快照处于 COMPLETE；宽限期后快照自动回到 IDLE。
    pub async fn submit(&self, url: &str) -> Result<DocumentationRecord, GenerationError> {
        let mut tracker = self.session.begin_run(url, self.policy).map_err(|e| {
            warn!("⚠️ 已有运行进行中，拒绝提交: {}", url);
            e
        })?;

        if !is_valid_url(url) {
            warn!("⚠️ URL 格式不合法: {}", url);
            let error = GenerationError::Validation(VALIDATION_MESSAGE.to_string());
            tracker.fail(&error);
            return Err(error);
        }

        let record = self.flow.run(&mut tracker).await?;

        let document = Arc::new(record);
        if !tracker.complete(document.clone(), STEP_COMPLETE) {
            debug!("运行 #{} 已被取代，丢弃结果", tracker.run_id());
            return Err(GenerationError::Superseded);
        }

        let entry = self.history.record(url, &document.project_name).await;
        info!("✅ [运行 #{}] 文档生成完成: {} ({})", tracker.run_id(), entry.project_name, entry.url);

        self.schedule_reset(tracker.run_id());

        Ok(DocumentationRecord::clone(&document))
    }

    /// 重新运行一条历史记录
    pub async fn rerun(&self, id: &str) -> Result<DocumentationRecord, GenerationError> {
        let entry = self.history.get(id).await.ok_or_else(|| {
            GenerationError::Validation(format!("No history entry with id {}.", id))
        })?;

        info!("🔁 重新生成: {} ({})", entry.project_name, entry.url);
        self.submit(&entry.url).await
    }

    /// 回到 IDLE，清空错误和进度；进行中的运行结果将被丢弃
    pub fn reset(&self) {
        debug!("重置生成状态");
        self.session.reset();
    }

    pub fn snapshot(&self) -> GenerationSnapshot {
        self.session.snapshot()
    }

    pub fn watch(&self) -> watch::Receiver<GenerationSnapshot> {
        self.session.watch()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GenerationSnapshot> {
        self.session.subscribe()
    }

    // ========== 历史记录 ==========

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.entries().await
    }

    pub async fn remove_history(&self, id: &str) {
        self.history.remove(id).await;
    }

    pub async fn clear_history(&self) {
        self.history.clear().await;
    }

    fn schedule_reset(&self, run_id: u64) {
        let session = Arc::clone(&self.session);
        let grace = self.reset_grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            if session.reset_after_complete(run_id) {
                debug!("运行 #{} 宽限期结束，回到 IDLE", run_id);
            }
        });
    }
}

static URL_SCHEME: OnceLock<Regex> = OnceLock::new();

/// 只接受 http:// 或 https:// 开头的地址
pub fn is_valid_url(url: &str) -> bool {
    URL_SCHEME
        .get_or_init(|| Regex::new(r"^https?://").expect("URL scheme pattern is a valid regex"))
        .is_match(url)
}
