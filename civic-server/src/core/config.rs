use std::path::PathBuf;
use std::time::Duration;

/// Default Gemini model used for classification
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Room for description, address and the data-URL header
const BODY_OVERHEAD_BYTES: usize = 256 * 1024;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (data/ + logs/) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_TO_FILE | false | 是否写日志文件 |
/// | GEMINI_API_KEY / API_KEY | - | 分类服务密钥 |
/// | GEMINI_MODEL | gemini-3-flash-preview | 分类模型 |
/// | GEMINI_BASE_URL | https://generativelanguage.googleapis.com/v1beta | 分类服务地址 |
/// | GEOCODING_API_KEY | - | 逆地理编码密钥 |
/// | GEOCODING_BASE_URL | https://maps.googleapis.com/maps/api | 逆地理编码地址 |
/// | MAX_IMAGE_BYTES | 5242880 | 图片解码后最大字节数 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | CLASSIFY_TIMEOUT_MS | 20000 | 分类调用超时(毫秒)，不超过请求超时的 2/3 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/civic HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据和日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | production
    pub environment: String,
    /// 默认日志级别 (RUST_LOG 优先)
    pub log_level: String,
    /// 是否写入滚动日志文件
    pub log_to_file: bool,

    // === 外部服务 ===
    /// Gemini API key; None means every classification falls back
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Geocoding API key; None disables reverse geocoding
    pub geocoding_api_key: Option<String>,
    pub geocoding_base_url: String,

    /// 图片大小上限 (解码后字节)
    pub max_image_bytes: usize,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 分类调用超时 (毫秒)
    pub classify_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_to_file: std::env::var("LOG_TO_FILE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),

            gemini_api_key: non_empty_var("GEMINI_API_KEY").or_else(|| non_empty_var("API_KEY")),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into()),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.into()),
            geocoding_api_key: non_empty_var("GEOCODING_API_KEY"),
            geocoding_base_url: std::env::var("GEOCODING_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEOCODING_BASE_URL.into()),

            max_image_bytes: std::env::var("MAX_IMAGE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5 * 1024 * 1024),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            classify_timeout_ms: std::env::var("CLASSIFY_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(20000),
        }
    }

    /// 使用自定义工作目录覆盖部分配置，并关闭外部服务
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.gemini_api_key = None;
        config.geocoding_api_key = None;
        config.log_to_file = false;
        config
    }

    /// 数据目录 (持久化 blob)
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("data")
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 分类调用的截止时间
    ///
    /// 不超过请求超时的 2/3，超时后仍有时间写入降级记录。
    pub fn classify_deadline(&self) -> Duration {
        let cap = self.request_timeout_ms.saturating_mul(2) / 3;
        Duration::from_millis(self.classify_timeout_ms.min(cap))
    }

    /// 请求体上限: base64 编码后的图片 + 其余字段余量
    pub fn body_limit_bytes(&self) -> usize {
        self.max_image_bytes.div_ceil(3).saturating_mul(4) + BODY_OVERHEAD_BYTES
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
