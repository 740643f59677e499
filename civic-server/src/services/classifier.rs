//! Classification Service
//!
//! Sends the description (and optional inline image) to Gemini and reads back
//! `{priority, summary, reason, score}`. Any failure is an error here; callers
//! go through [`classify_or_fallback`] which never fails.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use shared::models::{Classification, Priority, normalize_score};
use thiserror::Error;

use super::inline_image::InlineImage;
use crate::core::Config;
use crate::utils::ErrorCode;

/// Default summary when the model leaves it blank
pub const DEFAULT_SUMMARY: &str = "Civic Report";
/// Default reason when the model leaves it blank
pub const DEFAULT_REASON: &str = "Processed by AI.";

const SYSTEM_PROMPT: &str = r#"You are an expert civic dispatcher. Analyze the reported issue.
Classify priority:
- High: Emergencies, life/safety threats (fire, gas, accidents, flood).
- Medium: Infrastructure failures (potholes, lights, garbage).
- Low: General complaints (noise, graffiti).

Required JSON output:
{
  "priority": "High" | "Medium" | "Low",
  "summary": "Brief 1-sentence title",
  "reason": "Explain classification reasoning",
  "score": number (0-100)
}"#;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Classification service is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Classification service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid classification response: {0}")]
    InvalidResponse(String),

    #[error("Classification timed out after {0:?}")]
    Timeout(Duration),
}

impl ClassifyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotConfigured => ErrorCode::ClassifierNotConfigured,
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::Status { .. } => ErrorCode::ClassifierFailed,
            Self::InvalidResponse(_) => ErrorCode::ClassifierInvalidResponse,
            Self::Timeout(_) => ErrorCode::TimeoutError,
        }
    }
}

/// AI classification seam
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        description: &str,
        image: Option<&InlineImage>,
    ) -> Result<Classification, ClassifyError>;
}

/// Classify, substituting the fixed Low-priority fallback on any failure
pub async fn classify_or_fallback(
    classifier: &dyn Classifier,
    description: &str,
    image: Option<&InlineImage>,
) -> Classification {
    match classifier.classify(description, image).await {
        Ok(classification) => classification,
        Err(e) => {
            tracing::warn!(error = %e, code = %e.code(), "Classification failed, using fallback");
            Classification::fallback()
        }
    }
}

/// Wraps a classifier with a hard deadline
///
/// Keeps the slowest classification inside the HTTP request timeout so a
/// submission always gets the fallback instead of a 408.
pub struct DeadlineClassifier {
    inner: Arc<dyn Classifier>,
    deadline: Duration,
}

impl DeadlineClassifier {
    pub fn new(inner: Arc<dyn Classifier>, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

#[async_trait]
impl Classifier for DeadlineClassifier {
    async fn classify(
        &self,
        description: &str,
        image: Option<&InlineImage>,
    ) -> Result<Classification, ClassifyError> {
        tokio::time::timeout(self.deadline, self.inner.classify(description, image))
            .await
            .map_err(|_| ClassifyError::Timeout(self.deadline))?
    }
}

/// Google Generative Language client
#[derive(Debug, Clone)]
pub struct GeminiClassifier {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClassifier {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, ClassifyError> {
        Ok(Self {
            client: super::http_client()?,
            api_key,
            model: model.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClassifyError> {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            &config.gemini_base_url,
        )
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_body(description: &str, image: Option<&InlineImage>) -> Value {
        let mut parts = vec![json!({ "text": description })];
        if let Some(image) = image {
            parts.push(json!({
                "inlineData": { "mimeType": image.mime_type, "data": image.data }
            }));
        }

        json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_PROMPT }] },
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "priority": { "type": "STRING" },
                        "summary": { "type": "STRING" },
                        "reason": { "type": "STRING" },
                        "score": { "type": "NUMBER" }
                    },
                    "required": ["priority", "summary", "reason", "score"]
                }
            }
        })
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    async fn classify(
        &self,
        description: &str,
        image: Option<&InlineImage>,
    ) -> Result<Classification, ClassifyError> {
        let api_key = self.api_key.as_deref().ok_or(ClassifyError::NotConfigured)?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&Self::request_body(description, image))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        let text = response_text(&body)
            .ok_or_else(|| ClassifyError::InvalidResponse("no candidate text".into()))?;

        let classification = parse_classification(&text)?;
        tracing::debug!(
            priority = %classification.priority,
            score = classification.score,
            "Issue classified"
        );
        Ok(classification)
    }
}

/// Concatenated text parts of the first candidate
fn response_text(body: &Value) -> Option<String> {
    let parts = body
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

/// Validate model output field by field
///
/// The text must be a JSON object. Within it, unknown priority → Low, blank
/// summary/reason → defaults, missing or non-numeric score → 0, numeric score
/// clamped to 0..=100.
pub fn parse_classification(text: &str) -> Result<Classification, ClassifyError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| ClassifyError::InvalidResponse(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| ClassifyError::InvalidResponse("expected a JSON object".into()))?;

    let text_field = |key: &str, default: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
            .to_string()
    };

    let priority = obj
        .get("priority")
        .and_then(Value::as_str)
        .and_then(Priority::parse)
        .unwrap_or(Priority::Low);

    let score = obj
        .get("score")
        .and_then(Value::as_f64)
        .map(normalize_score)
        .unwrap_or(0);

    Ok(Classification {
        priority,
        summary: text_field("summary", DEFAULT_SUMMARY),
        reason: text_field("reason", DEFAULT_REASON),
        score,
    })
}
