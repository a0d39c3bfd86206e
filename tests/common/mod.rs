#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use docugen::error::{AnalysisServiceError, PersistenceError};
use docugen::infrastructure::{KeyValueStore, MemoryKeyValueStore};
use docugen::models::{AnalysisTicket, DocumentationRecord, GenerationSnapshot};
use docugen::services::mock_analysis::MockAnalysisService;
use docugen::services::AnalysisService;
use docugen::{Config, DocumentationGenerator, HistoryStore};
use tokio::sync::{broadcast, Notify};

/// 失败注入方式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailMode {
    None,
    /// 没有可展示消息的失败（网络类）
    Silent,
    /// 服务返回了可展示的消息
    WithMessage(&'static str),
}

impl FailMode {
    fn error(self, endpoint: &str) -> Option<AnalysisServiceError> {
        match self {
            FailMode::None => None,
            FailMode::Silent => Some(AnalysisServiceError::BadResponse {
                endpoint: endpoint.to_string(),
                status: 503,
                message: None,
            }),
            FailMode::WithMessage(msg) => Some(AnalysisServiceError::BadResponse {
                endpoint: endpoint.to_string(),
                status: 500,
                message: Some(msg.to_string()),
            }),
        }
    }
}

/// 计数 + 失败注入 + 可选闸门的测试服务，成功时委托给本地替身
pub struct FakeService {
    inner: MockAnalysisService,
    pub analyze_calls: AtomicUsize,
    pub generate_calls: AtomicUsize,
    analyze_fail: FailMode,
    generate_fail: FailMode,
    /// 命中该 URL 的 analyze 会等待 `gate`
    gated_url: Option<&'static str>,
    pub gate: Notify,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            inner: MockAnalysisService::new(&Config::headless()),
            analyze_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            analyze_fail: FailMode::None,
            generate_fail: FailMode::None,
            gated_url: None,
            gate: Notify::new(),
        }
    }

    pub fn failing_analyze(mut self, mode: FailMode) -> Self {
        self.analyze_fail = mode;
        self
    }

    pub fn failing_generate(mut self, mode: FailMode) -> Self {
        self.generate_fail = mode;
        self
    }

    pub fn gated(mut self, url: &'static str) -> Self {
        self.gated_url = Some(url);
        self
    }

    pub fn calls(&self) -> (usize, usize) {
        (
            self.analyze_calls.load(Ordering::SeqCst),
            self.generate_calls.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl AnalysisService for FakeService {
    async fn analyze(&self, url: &str) -> Result<AnalysisTicket, AnalysisServiceError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        if self.gated_url == Some(url) {
            self.gate.notified().await;
        }
        if let Some(e) = self.analyze_fail.error("/analyze") {
            return Err(e);
        }
        self.inner.analyze(url).await
    }

    async fn generate(
        &self,
        analysis_id: &str,
        url: &str,
    ) -> Result<DocumentationRecord, AnalysisServiceError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.generate_fail.error("/result") {
            return Err(e);
        }
        self.inner.generate(analysis_id, url).await
    }
}

/// 所有写入都失败的存储
#[derive(Default)]
pub struct ReadOnlyStore {
    inner: MemoryKeyValueStore,
    pub write_attempts: AtomicUsize,
}

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, _value: &str) -> Result<(), PersistenceError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        Err(PersistenceError::write(
            key,
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        ))
    }
}

/// 读取通道中已缓存的全部快照
pub fn drain(events: &mut broadcast::Receiver<GenerationSnapshot>) -> Vec<GenerationSnapshot> {
    let mut out = Vec::new();
    while let Ok(snapshot) = events.try_recv() {
        out.push(snapshot);
    }
    out
}

pub async fn memory_history() -> Arc<HistoryStore> {
    Arc::new(HistoryStore::load(Arc::new(MemoryKeyValueStore::new())).await)
}

/// 不会自动重置的无延迟配置
pub fn test_config() -> Config {
    Config {
        reset_grace_ms: 60_000,
        ..Config::headless()
    }
}

pub async fn generator_with(
    config: &Config,
    service: Arc<dyn AnalysisService>,
) -> (DocumentationGenerator, Arc<HistoryStore>) {
    let history = memory_history().await;
    let generator = DocumentationGenerator::new(config, service, history.clone());
    (generator, history)
}
