//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::DocumentationGenerator (一次提交 + 历史记录)
//!     ↓
//! workflow::GenerationFlow (analyze → generate → finalize)
//!     ↓
//! services (能力层：AnalysisService / HistoryStore)
//!     ↓
//! clients / infrastructure (HTTP 客户端、键值存储)
//! ```

pub mod generator;

pub use generator::{is_valid_url, DocumentationGenerator};
