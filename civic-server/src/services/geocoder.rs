//! Reverse geocoding
//!
//! Coordinates → coarse [`Address`] via the Google Geocoding API.

use async_trait::async_trait;
use serde::Deserialize;
use shared::models::{Address, Location};
use thiserror::Error;

use crate::core::Config;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Geocoding service returned {0}")]
    Status(String),

    #[error("No address found for location")]
    NoResults,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, location: Location) -> Result<Address, GeocodeError>;
}

/// One `address_components` entry
#[derive(Debug, Clone, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    fn has_type(&self, ty: &str) -> bool {
        self.types.iter().any(|t| t == ty)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

/// Map address components onto an [`Address`]
///
/// `locality` / `postal_town` fill the city; `sublocality_level_1` only when
/// no locality-class component exists. Within a class the first match wins.
pub fn extract_address(components: &[AddressComponent]) -> Address {
    let first = |types: &[&str]| {
        components
            .iter()
            .find(|c| types.iter().any(|t| c.has_type(t)))
            .map(|c| c.long_name.clone())
    };

    let city = first(&["locality", "postal_town"])
        .or_else(|| first(&["sublocality_level_1"]))
        .unwrap_or_default();

    Address {
        city,
        state: first(&["administrative_area_level_1"]).unwrap_or_default(),
        district: first(&["administrative_area_level_2"]).unwrap_or_default(),
        postal_code: first(&["postal_code"]).unwrap_or_default(),
    }
}

#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self, GeocodeError> {
        Ok(Self {
            client: super::http_client()?,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `None` when no geocoding key is configured
    pub fn from_config(config: &Config) -> Result<Option<Self>, GeocodeError> {
        config
            .geocoding_api_key
            .as_ref()
            .map(|key| Self::new(key.clone(), &config.geocoding_base_url))
            .transpose()
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn reverse(&self, location: Location) -> Result<Address, GeocodeError> {
        let url = format!("{}/geocode/json", self.base_url);
        let latlng = format!("{},{}", location.lat, location.lng);

        let response: GeocodeResponse = self
            .client
            .get(&url)
            .query(&[("latlng", latlng.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "OK" {
            let message = match response.error_message {
                Some(msg) => format!("{}: {}", response.status, msg),
                None => response.status,
            };
            return Err(GeocodeError::Status(message));
        }

        let result = response.results.first().ok_or(GeocodeError::NoResults)?;
        Ok(extract_address(&result.address_components))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, types: &[&str]) -> AddressComponent {
        AddressComponent {
            long_name: name.to_string(),
            short_name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn locality_beats_sublocality() {
        let components = vec![
            component("Downtown", &["sublocality_level_1", "sublocality", "political"]),
            component("Springfield", &["locality", "political"]),
            component("Sangamon County", &["administrative_area_level_2", "political"]),
            component("Illinois", &["administrative_area_level_1", "political"]),
            component("62701", &["postal_code"]),
        ];
        let address = extract_address(&components);
        assert_eq!(address.city, "Springfield");
        assert_eq!(address.state, "Illinois");
        assert_eq!(address.district, "Sangamon County");
        assert_eq!(address.postal_code, "62701");
    }

    #[test]
    fn sublocality_used_when_no_locality() {
        let components = vec![
            component("Bandra West", &["sublocality_level_1"]),
            component("Maharashtra", &["administrative_area_level_1"]),
        ];
        let address = extract_address(&components);
        assert_eq!(address.city, "Bandra West");
        assert!(address.postal_code.is_empty());
    }

    #[test]
    fn first_locality_class_match_wins() {
        let components = vec![
            component("Cambridge", &["postal_town"]),
            component("Cambridge City", &["locality"]),
        ];
        assert_eq!(extract_address(&components).city, "Cambridge");
    }

    #[test]
    fn parses_api_payload() {
        let body = r#"{
            "status": "OK",
            "results": [{ "address_components": [
                { "long_name": "Springfield", "short_name": "Springfield", "types": ["locality"] }
            ]}]
        }"#;
        let parsed: GeocodeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, "OK");
        assert_eq!(extract_address(&parsed.results[0].address_components).city, "Springfield");
    }

    #[tokio::test]
    async fn unreachable_service_is_error() {
        let geocoder = GoogleGeocoder::new("key", "http://127.0.0.1:9").unwrap();
        assert!(geocoder.reverse(Location::new(1.0, 2.0)).await.is_err());
    }
}
