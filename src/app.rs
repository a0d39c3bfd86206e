use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::cli::Command;
use crate::config::Config;
use crate::error::GenerationError;
use crate::infrastructure::FileKeyValueStore;
use crate::models::{DocumentationRecord, GenerationSnapshot, ProcessingStatus};
use crate::orchestrator::DocumentationGenerator;
use crate::services::{build_analysis_service, HistoryStore};
use crate::utils::logging::{log_history, log_startup};

/// 应用主结构
pub struct App {
    generator: DocumentationGenerator,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置校验失败")?;
        log_startup(&config);

        // 历史记录读取失败不会阻止启动
        let storage = Arc::new(FileKeyValueStore::new(&config.history_dir));
        let history = Arc::new(HistoryStore::load(storage).await);

        let service = build_analysis_service(&config)?;
        let generator = DocumentationGenerator::new(&config, service, history);

        Ok(Self { generator })
    }

    /// 执行一条命令
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Generate { url, json } => {
                let record = self.with_progress(self.generator.submit(&url)).await?;
                print_document(&record, json)?;
            }
            Command::Rerun { id, json } => {
                let record = self.with_progress(self.generator.rerun(&id)).await?;
                print_document(&record, json)?;
            }
            Command::History => {
                let entries = self.generator.history().await;
                log_history(&entries);
                for entry in entries {
                    println!("{}  {}  {}  {}", entry.id, entry.date, entry.project_name, entry.url);
                }
            }
            Command::Remove { id } => {
                self.generator.remove_history(&id).await;
                info!("🗑️ 已删除历史记录: {}", id);
            }
            Command::Clear => {
                self.generator.clear_history().await;
                info!("🗑️ 已清空历史记录");
            }
        }
        Ok(())
    }

    /// 运行期间把每个快照打印到 stderr
    async fn with_progress<F>(&self, run: F) -> Result<DocumentationRecord>
    where
        F: Future<Output = Result<DocumentationRecord, GenerationError>>,
    {
        let mut events = self.generator.subscribe();
        tokio::pin!(run);

        let result = loop {
            tokio::select! {
                result = &mut run => break result,
                Ok(snapshot) = events.recv() => print_progress(&snapshot),
            }
        };

        // 运行结束前已发布的快照都还在通道里
        while let Ok(snapshot) = events.try_recv() {
            print_progress(&snapshot);
        }

        result.map_err(|e| {
            error!("❌ 生成失败: {}", e);
            anyhow::Error::new(e)
        })
    }
}

fn print_progress(snapshot: &GenerationSnapshot) {
    if snapshot.status == ProcessingStatus::Idle {
        return;
    }
    eprintln!(
        "[{:>3}%] {} - {}",
        snapshot.progress,
        snapshot.status.label(),
        snapshot.current_step
    );
}

fn print_document(record: &DocumentationRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        println!("{}", record.to_markdown());
    }
    Ok(())
}
