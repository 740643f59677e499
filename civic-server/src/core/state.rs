//! 服务器状态
//!
//! 所有 handler 共享的依赖：记录存储、会话、外部服务客户端。
//! 外部客户端只创建一次，以 `Arc` 形式传递。

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::Config;
use crate::services::{Classifier, DeadlineClassifier, GeminiClassifier, Geocoder, GoogleGeocoder};
use crate::store::{FileStorage, RecordStore, SessionStore, Storage};
use crate::utils::{AppError, AppResult};

/// 服务器状态 - 可廉价克隆
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    /// 问题记录 (单写者，变更串行化)
    pub records: Arc<RwLock<RecordStore>>,
    /// 当前登录身份
    pub session: Arc<RwLock<SessionStore>>,
    pub classifier: Arc<dyn Classifier>,
    /// None 表示未配置逆地理编码
    pub geocoder: Option<Arc<dyn Geocoder>>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("geocoder", &self.geocoder.is_some())
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 按配置初始化：文件存储 + Gemini + (可选) Google Geocoding
    pub fn initialize(config: &Config) -> AppResult<Self> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(config.data_dir())?);

        let classifier = GeminiClassifier::from_config(config)
            .map_err(|e| AppError::config(format!("Failed to build classifier client: {e}")))?;
        if !classifier.is_configured() {
            tracing::warn!("GEMINI_API_KEY not set, every report will use the fallback classification");
        }

        let geocoder = GoogleGeocoder::from_config(config)
            .map_err(|e| AppError::config(format!("Failed to build geocoding client: {e}")))?
            .map(|g| Arc::new(g) as Arc<dyn Geocoder>);
        if geocoder.is_none() {
            tracing::info!("GEOCODING_API_KEY not set, reverse geocoding disabled");
        }

        Self::with_services(config.clone(), storage, Arc::new(classifier), geocoder)
    }

    /// 使用给定的存储和服务构建 (测试常用)
    ///
    /// 分类器统一套上 [`Config::classify_deadline`] 截止时间。
    pub fn with_services(
        config: Config,
        storage: Arc<dyn Storage>,
        classifier: Arc<dyn Classifier>,
        geocoder: Option<Arc<dyn Geocoder>>,
    ) -> AppResult<Self> {
        let records = RecordStore::load(storage.clone())?;
        let session = SessionStore::load(storage)?;

        let deadline = config.classify_deadline();
        let classifier: Arc<dyn Classifier> = Arc::new(DeadlineClassifier::new(classifier, deadline));

        tracing::info!(
            records = records.len(),
            classify_deadline_ms = deadline.as_millis() as u64,
            "Server state initialized"
        );

        Ok(Self {
            config,
            records: Arc::new(RwLock::new(records)),
            session: Arc::new(RwLock::new(session)),
            classifier,
            geocoder,
        })
    }

    pub fn geocoder(&self) -> Option<&dyn Geocoder> {
        self.geocoder.as_deref()
    }
}
