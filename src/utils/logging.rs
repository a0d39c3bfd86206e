/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::HistoryEntry;

/// 初始化日志
///
/// 默认 `docugen=info`，`RUST_LOG` 优先；详细模式下为 `docugen=debug`。
/// 日志输出到 stderr，stdout 只留给命令结果。
pub fn init(verbose: bool) {
    let default_directive = if verbose { "docugen=debug" } else { "docugen=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // 测试里可能重复初始化，忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 项目文档生成");
    if config.is_mock_mode() {
        info!("🧪 分析服务: 本地替身");
    } else {
        info!("🌐 分析服务: {}", config.api_base_url);
    }
    info!("📁 历史记录目录: {}", config.history_dir.display());
    info!("{}", "=".repeat(60));
}

/// 记录历史记录列表
pub fn log_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        info!("📚 暂无历史记录");
        return;
    }
    info!("📚 最近 {} 条记录", entries.len());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
