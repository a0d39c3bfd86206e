use serde::{Deserialize, Serialize};

/// 历史记录条目
///
/// 一次成功生成的持久化记录，`url` 是去重键。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// 不透明的唯一标识
    ///
    /// 新条目使用补零的微秒时间戳，比已有的数字 id 都大；
    /// 早期数据里的非数字 id（如 ISO 时间串）原样保留，不与新 id 比较先后。
    pub id: String,
    pub url: String,
    pub project_name: String,
    /// 可读的时间戳
    pub date: String,
}
