//! 键值存储 - 基础设施层
//!
//! 持有持久化资源，只暴露 get / set 能力，不关心存的是什么。

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::PersistenceError;

/// 持久化键值存储
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 读取键对应的值，不存在时返回 None
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// 写入键值（覆盖）
    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// 基于目录的文件存储
///
/// 每个键对应 `<dir>/<key>.json`，写入时先写临时文件再 rename。
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("存储文件不存在: {}", path.display());
                Ok(None)
            }
            Err(e) => Err(PersistenceError::read(key, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PersistenceError::write(key, e))?;

        let path = self.path_for(key);
        let tmp_path = self.dir.join(format!(".{}.json.tmp", key));

        fs::write(&tmp_path, value)
            .await
            .map_err(|e| PersistenceError::write(key, e))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| PersistenceError::write(key, e))?;

        debug!("已写入 {} ({} 字节)", path.display(), value.len());
        Ok(())
    }
}

/// 内存存储，进程退出即丢失
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
