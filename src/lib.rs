//! # Docugen
//!
//! 根据项目 URL 生成结构化项目文档，并保存最近的运行记录以便快速重跑
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有持久化资源，只暴露 get / set 能力
//! - `clients/` - 远端分析服务的 HTTP 客户端
//!
//! ### ② 业务能力层（Services）
//! - `AnalysisService` - analyze / generate 能力（真实客户端或本地替身）
//! - `HistoryStore` - 有上限、按 url 去重的历史记录
//!
//! ### ③ 流程层（Workflow）
//! - `ProgressTracker` - 单次运行的状态与进度（只能前进）
//! - `GenerationFlow` - 流程编排（analyze → generate → finalize）
//!
//! ### ④ 编排层（Orchestration）
//! - `DocumentationGenerator` - 提交、重置、重跑、历史记录写入
//!
//! ## 模块结构

pub mod app;
pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::{ConcurrencyPolicy, Config};
pub use error::{AppError, AppResult, GenerationError};
pub use models::{DocumentationRecord, GenerationSnapshot, HistoryEntry, ProcessingStatus};
pub use orchestrator::DocumentationGenerator;
pub use services::{AnalysisService, HistoryStore, MAX_HISTORY};
