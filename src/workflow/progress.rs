//! 运行状态与进度跟踪
//!
//! `SessionState` 保存当前运行的快照并负责通知；`ProgressTracker` 属于某一次运行，
//! 只有当这次运行仍是当前运行时，它的更新才会被发布。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::config::ConcurrencyPolicy;
use crate::error::GenerationError;
use crate::models::{DocumentationRecord, GenerationSnapshot, ProcessingStatus};

/// 事件通道容量，订阅方落后太多时会丢失最早的事件
const EVENT_CAPACITY: usize = 64;

/// 会话状态：当前运行的快照 + 变更通知
///
/// `active_run != settled_run` 表示当前运行已认领但还没有进入终态，
/// 两者只在快照的写锁内修改。
pub struct SessionState {
    snapshot_tx: watch::Sender<GenerationSnapshot>,
    events_tx: broadcast::Sender<GenerationSnapshot>,
    active_run: AtomicU64,
    settled_run: AtomicU64,
}

impl SessionState {
    pub fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(GenerationSnapshot::default());
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            snapshot_tx,
            events_tx,
            active_run: AtomicU64::new(0),
            settled_run: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> GenerationSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// 当前快照的观察者（只保留最新值）
    pub fn watch(&self) -> watch::Receiver<GenerationSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// 按顺序接收之后发布的每一个快照
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationSnapshot> {
        self.events_tx.subscribe()
    }

    /// 开始一次新运行
    ///
    /// 拒绝策略下，已有运行尚未结束（包括还没发布第一个快照）时返回 `Busy`，状态不变。
    /// 检查与认领在同一把写锁内完成。
    pub fn begin_run(&self, url: &str, policy: ConcurrencyPolicy) -> Result<ProgressTracker<'_>, GenerationError> {
        let mut run_id = None;
        self.snapshot_tx.send_if_modified(|_| {
            if policy == ConcurrencyPolicy::RejectWhileInFlight && self.has_unsettled_run() {
                return false;
            }
            run_id = Some(self.active_run.fetch_add(1, Ordering::SeqCst) + 1);
            false
        });

        let run_id = run_id.ok_or(GenerationError::Busy)?;
        debug!("开始运行 #{}: {}", run_id, url);

        Ok(ProgressTracker {
            session: self,
            run_id,
            snapshot: GenerationSnapshot {
                url: url.to_string(),
                ..GenerationSnapshot::default()
            },
        })
    }

    /// 回到 IDLE，并使进行中的运行失效
    pub fn reset(&self) {
        self.snapshot_tx.send_modify(|current| {
            let run_id = self.active_run.fetch_add(1, Ordering::SeqCst) + 1;
            self.settled_run.store(run_id, Ordering::SeqCst);
            *current = GenerationSnapshot::default();
            let _ = self.events_tx.send(current.clone());
        });
    }

    /// 宽限期结束后的自动重置：只在该运行仍是当前运行且已完成时生效
    pub fn reset_after_complete(&self, run_id: u64) -> bool {
        self.snapshot_tx.send_if_modified(|current| {
            if self.active_run.load(Ordering::SeqCst) != run_id
                || current.status != ProcessingStatus::Complete
            {
                return false;
            }
            *current = GenerationSnapshot::default();
            let _ = self.events_tx.send(current.clone());
            true
        })
    }

    fn publish(&self, run_id: u64, snapshot: &GenerationSnapshot) -> bool {
        self.snapshot_tx.send_if_modified(|current| {
            if self.active_run.load(Ordering::SeqCst) != run_id {
                return false;
            }
            if snapshot.status.is_terminal() {
                self.settled_run.store(run_id, Ordering::SeqCst);
            }
            *current = snapshot.clone();
            let _ = self.events_tx.send(snapshot.clone());
            true
        })
    }

    /// 放弃一个未进入终态的运行，拒绝策略不再把它视为进行中
    fn settle(&self, run_id: u64) {
        self.snapshot_tx.send_if_modified(|_| {
            if self.active_run.load(Ordering::SeqCst) == run_id {
                self.settled_run.store(run_id, Ordering::SeqCst);
            }
            false
        });
    }

    fn has_unsettled_run(&self) -> bool {
        self.active_run.load(Ordering::SeqCst) != self.settled_run.load(Ordering::SeqCst)
    }

    fn is_current(&self, run_id: u64) -> bool {
        self.active_run.load(Ordering::SeqCst) == run_id
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// 单次运行的进度跟踪器
///
/// - 状态只能按 ANALYZING → GENERATING → FINALIZING → COMPLETE/ERROR 前进
/// - 进度在一次运行内不会减少
/// - 运行被取代后，所有更新都被丢弃
pub struct ProgressTracker<'a> {
    session: &'a SessionState,
    run_id: u64,
    snapshot: GenerationSnapshot,
}

impl<'a> ProgressTracker<'a> {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn url(&self) -> &str {
        &self.snapshot.url
    }

    pub fn status(&self) -> ProcessingStatus {
        self.snapshot.status
    }

    pub fn progress(&self) -> u8 {
        self.snapshot.progress
    }

    pub fn is_current(&self) -> bool {
        self.session.is_current(self.run_id)
    }

    /// 进入下一个阶段
    ///
    /// 返回 false 表示这次运行已被取代。
    pub fn advance(&mut self, status: ProcessingStatus, progress: u8, step: &str) -> bool {
        if status.rank() <= self.snapshot.status.rank() || status.is_terminal() {
            warn!(
                "忽略非法状态迁移 {} -> {} (运行 #{})",
                self.snapshot.status, status, self.run_id
            );
            return self.is_current();
        }

        self.snapshot.status = status;
        self.snapshot.progress = progress.clamp(self.snapshot.progress, 100);
        self.snapshot.current_step = step.to_string();
        self.session.publish(self.run_id, &self.snapshot)
    }

    /// 成功完成：进度 100，附带文档
    pub fn complete(&mut self, document: Arc<DocumentationRecord>, step: &str) -> bool {
        self.snapshot.status = ProcessingStatus::Complete;
        self.snapshot.progress = 100;
        self.snapshot.current_step = step.to_string();
        self.snapshot.document = Some(document);
        self.session.publish(self.run_id, &self.snapshot)
    }

    /// 失败：进入 ERROR，进度保持不变
    pub fn fail(&mut self, error: &GenerationError) -> bool {
        self.snapshot.status = ProcessingStatus::Error;
        self.snapshot.last_error = Some(error.to_string());
        self.snapshot.document = None;
        self.session.publish(self.run_id, &self.snapshot)
    }
}

impl Drop for ProgressTracker<'_> {
    fn drop(&mut self) {
        if !self.snapshot.status.is_terminal() {
            self.session.settle(self.run_id);
        }
    }
}
