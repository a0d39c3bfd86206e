//! 生成状态模型
//!
//! `ProcessingStatus` 是状态机的状态，`GenerationSnapshot` 是展示层读取的只读快照。

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::models::DocumentationRecord;

/// 处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    #[default]
    Idle,
    Analyzing,
    Generating,
    Finalizing,
    Complete,
    Error,
}

impl ProcessingStatus {
    /// 运行中的三个阶段
    pub fn is_processing(self) -> bool {
        matches!(
            self,
            ProcessingStatus::Analyzing | ProcessingStatus::Generating | ProcessingStatus::Finalizing
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessingStatus::Complete | ProcessingStatus::Error)
    }

    /// 在一次运行内的顺序，用于校验状态只能前进
    pub(crate) fn rank(self) -> u8 {
        match self {
            ProcessingStatus::Idle => 0,
            ProcessingStatus::Analyzing => 1,
            ProcessingStatus::Generating => 2,
            ProcessingStatus::Finalizing => 3,
            ProcessingStatus::Complete | ProcessingStatus::Error => 4,
        }
    }

    /// 展示用文本
    pub fn label(self) -> &'static str {
        match self {
            ProcessingStatus::Idle => "Ready",
            ProcessingStatus::Analyzing => "Analyzing Project",
            ProcessingStatus::Generating => "Generating Content",
            ProcessingStatus::Finalizing => "Finalizing Document",
            ProcessingStatus::Complete => "Documentation Ready!",
            ProcessingStatus::Error => "Generation Failed",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingStatus::Idle => "IDLE",
            ProcessingStatus::Analyzing => "ANALYZING",
            ProcessingStatus::Generating => "GENERATING",
            ProcessingStatus::Finalizing => "FINALIZING",
            ProcessingStatus::Complete => "COMPLETE",
            ProcessingStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 当前运行的快照
///
/// `document` 只在 `status == Complete` 时存在。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSnapshot {
    pub url: String,
    pub status: ProcessingStatus,
    pub progress: u8,
    pub current_step: String,
    pub last_error: Option<String>,
    #[serde(skip)]
    pub document: Option<Arc<DocumentationRecord>>,
}

impl GenerationSnapshot {
    pub fn is_processing(&self) -> bool {
        self.status.is_processing()
    }
}
