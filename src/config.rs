use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// 未配置后端时前端模板里的占位值
const PLACEHOLDER_API_BASE_URL: &str = "YOUR_API_BASE_URL";

/// 并发提交策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConcurrencyPolicy {
    /// 新的提交直接取代进行中的运行（旧运行的结果被丢弃）
    #[default]
    Supersede,
    /// 有运行进行中时拒绝新的提交
    RejectWhileInFlight,
}

impl FromStr for ConcurrencyPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supersede" => Ok(ConcurrencyPolicy::Supersede),
            "reject" | "reject-while-in-flight" => Ok(ConcurrencyPolicy::RejectWhileInFlight),
            _ => Err(ConfigError::InvalidValue {
                field: "concurrency_policy",
                value: s.to_string(),
                reason: "expected 'supersede' or 'reject'",
            }),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 远端分析服务地址，为空时使用本地替身
    pub api_base_url: String,
    /// 单次 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 历史记录存放目录
    pub history_dir: PathBuf,
    /// FINALIZING 阶段的固定停顿（毫秒）
    pub finalize_delay_ms: u64,
    /// COMPLETE 之后自动回到 IDLE 的宽限时间（毫秒）
    pub reset_grace_ms: u64,
    // --- 替身模式的模拟延迟 ---
    pub mock_analyze_delay_ms: u64,
    pub mock_generate_delay_ms: u64,
    /// 并发提交策略
    pub concurrency_policy: ConcurrencyPolicy,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            request_timeout_secs: 60,
            history_dir: PathBuf::from(".docugen"),
            finalize_delay_ms: 1000,
            reset_grace_ms: 500,
            mock_analyze_delay_ms: 1500,
            mock_generate_delay_ms: 2000,
            concurrency_policy: ConcurrencyPolicy::Supersede,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("DOCUGEN_API_BASE_URL").unwrap_or(default.api_base_url),
            request_timeout_secs: env_parse("DOCUGEN_REQUEST_TIMEOUT_SECS").unwrap_or(default.request_timeout_secs),
            history_dir: std::env::var("DOCUGEN_HISTORY_DIR").map(PathBuf::from).unwrap_or(default.history_dir),
            finalize_delay_ms: env_parse("DOCUGEN_FINALIZE_DELAY_MS").unwrap_or(default.finalize_delay_ms),
            reset_grace_ms: env_parse("DOCUGEN_RESET_GRACE_MS").unwrap_or(default.reset_grace_ms),
            mock_analyze_delay_ms: env_parse("DOCUGEN_MOCK_ANALYZE_DELAY_MS").unwrap_or(default.mock_analyze_delay_ms),
            mock_generate_delay_ms: env_parse("DOCUGEN_MOCK_GENERATE_DELAY_MS").unwrap_or(default.mock_generate_delay_ms),
            concurrency_policy: env_parse("DOCUGEN_CONCURRENCY_POLICY").unwrap_or(default.concurrency_policy),
            verbose_logging: env_parse("DOCUGEN_VERBOSE").unwrap_or(default.verbose_logging),
        }
    }

    /// 无延迟配置，用于测试和无界面运行
    pub fn headless() -> Self {
        Self {
            finalize_delay_ms: 0,
            reset_grace_ms: 0,
            mock_analyze_delay_ms: 0,
            mock_generate_delay_ms: 0,
            ..Self::default()
        }
    }

    /// 未配置真实后端时进入替身模式
    pub fn is_mock_mode(&self) -> bool {
        let base = self.api_base_url.trim();
        base.is_empty() || base == PLACEHOLDER_API_BASE_URL
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                value: "0".to_string(),
                reason: "timeout must be positive",
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn finalize_delay(&self) -> Duration {
        Duration::from_millis(self.finalize_delay_ms)
    }

    pub fn reset_grace(&self) -> Duration {
        Duration::from_millis(self.reset_grace_ms)
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
