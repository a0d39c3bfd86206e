//! 历史记录服务 - 业务能力层
//!
//! 负责最近成功运行的持久化列表：最多 `MAX_HISTORY` 条，按 url 去重，最新的在最前。
//!
//! 持久化失败只记录日志，不向上抛出：内存中的列表仍然反映这次写入。

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::PersistenceError;
use crate::infrastructure::KeyValueStore;
use crate::models::HistoryEntry;

/// 历史记录上限
pub const MAX_HISTORY: usize = 5;

/// 存储中使用的键
pub const HISTORY_KEY: &str = "docugen_history";

/// 当前持久化格式版本
const HISTORY_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct HistoryFileRef<'a> {
    version: u32,
    entries: &'a [HistoryEntry],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryFile {
    Versioned {
        version: u32,
        entries: Vec<HistoryEntry>,
    },
    /// 早期格式：直接是数组
    Legacy(Vec<HistoryEntry>),
}

/// 历史记录服务
///
/// 读-改-写在同一把锁内完成，多个写入不会互相覆盖。
pub struct HistoryStore {
    entries: Mutex<Vec<HistoryEntry>>,
    storage: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    /// 启动时加载一次；数据损坏或读取失败时从空列表开始
    pub async fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let entries = match storage.get(HISTORY_KEY).await {
            Ok(Some(raw)) => match decode(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("⚠️ 历史记录解析失败，使用空列表: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("⚠️ 历史记录读取失败，使用空列表: {}", e);
                Vec::new()
            }
        };

        info!("📚 已加载 {} 条历史记录", entries.len());

        Self {
            entries: Mutex::new(entries),
            storage,
        }
    }

    /// 当前列表（最新在前）
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<HistoryEntry> {
        self.entries
            .lock()
            .await
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
    }

    /// 记录一次成功运行，返回新条目
    pub async fn record(&self, url: &str, project_name: &str) -> HistoryEntry {
        let mut entries = self.entries.lock().await;

        let entry = HistoryEntry {
            id: next_id(&entries),
            url: url.to_string(),
            project_name: project_name.to_string(),
            date: Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        };

        entries.retain(|existing| existing.url != url);
        entries.insert(0, entry.clone());
        entries.truncate(MAX_HISTORY);

        debug!("历史记录新增: {} ({})", entry.project_name, entry.url);
        self.persist(&entries).await;

        entry
    }

    /// 删除指定条目，不存在时什么也不做
    pub async fn remove(&self, id: &str) {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);

        if entries.len() == before {
            debug!("历史记录中没有 id={}，忽略删除", id);
        }
        self.persist(&entries).await;
    }

    /// 清空历史记录
    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        entries.clear();
        self.persist(&entries).await;
    }

    async fn persist(&self, entries: &[HistoryEntry]) {
        if let Err(e) = self.try_persist(entries).await {
            warn!("⚠️ 历史记录保存失败（仅本次会话有效）: {}", e);
        }
    }

    async fn try_persist(&self, entries: &[HistoryEntry]) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(&HistoryFileRef {
            version: HISTORY_FORMAT_VERSION,
            entries,
        })
        .map_err(PersistenceError::Serialize)?;

        self.storage.set(HISTORY_KEY, &raw).await
    }
}

/// 解析持久化数据，并重新保证去重和上限
fn decode(raw: &str) -> Result<Vec<HistoryEntry>, PersistenceError> {
    let file: HistoryFile =
        serde_json::from_str(raw).map_err(|e| PersistenceError::Deserialize(e.to_string()))?;

    let entries = match file {
        HistoryFile::Versioned { version, entries } if version <= HISTORY_FORMAT_VERSION => entries,
        HistoryFile::Versioned { version, .. } => {
            return Err(PersistenceError::Deserialize(format!(
                "unsupported history version {}",
                version
            )));
        }
        HistoryFile::Legacy(entries) => entries,
    };

    Ok(normalize(entries))
}

fn normalize(entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.url.clone()))
        .take(MAX_HISTORY)
        .collect()
}

/// 基于微秒时间戳的 id，保证比现有数字 id 都大；非数字 id 不参与比较
fn next_id(entries: &[HistoryEntry]) -> String {
    let now = Utc::now().timestamp_micros();
    let newest = entries
        .iter()
        .filter_map(|entry| entry.id.parse::<i64>().ok())
        .max();

    let id = match newest {
        Some(newest) if newest >= now => newest + 1,
        _ => now,
    };
    format!("{:020}", id)
}
