//! 外部服务 & HTTP 服务
//!
//! - [`classifier`] AI 分类服务 (Gemini)
//! - [`geocoder`] 逆地理编码 (Google Geocoding)
//! - [`inline_image`] 图片载荷校验
//! - [`app`] axum 应用构建

pub mod app;
pub mod classifier;
pub mod geocoder;
pub mod inline_image;

pub use classifier::{
    Classifier, ClassifyError, DeadlineClassifier, GeminiClassifier, classify_or_fallback,
};
pub use geocoder::{GeocodeError, Geocoder, GoogleGeocoder};
pub use app::{build_app, build_router, log_request};
pub use inline_image::InlineImage;

/// 构建外部服务共用的 reqwest 客户端 (30s 超时)
pub(crate) fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
}
