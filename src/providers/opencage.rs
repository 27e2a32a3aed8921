//! OpenCage geosearch adapter
//!
//! Requires an API key, passed as the `key` query parameter. OpenCage
//! returns no per-result identifier, so `place_id` is always synthesized.

use super::traits::*;
use crate::error::SuggestError;
use crate::query::QueryPairs;
use crate::suggestions::{
    HashIds, IdGenerator, LocationSuggestion, ProviderConfig, NEUTRAL_IMPORTANCE, UNKNOWN_LOCATION,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const BASE_URL: &str = "https://api.opencagedata.com/geosearch";

/// Query options for the OpenCage geosearch API.
#[derive(Debug, Clone, Default)]
pub struct OpenCageOptions {
    /// Bounding box `minLon,minLat,maxLon,maxLat`.
    pub bounds: Option<String>,
    /// Two-letter ISO 3166-1 alpha2 code, lowercase.
    pub countrycode: Option<String>,
    /// Result language. Default: "en".
    pub language: Option<String>,
    /// Maximum number of results. Default: 10.
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenCageRecord {
    formatted: Option<String>,
    name: Option<String>,
    geometry: Option<OpenCageGeometry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenCageGeometry {
    lat: Option<Value>,
    lng: Option<Value>,
}

pub struct OpenCage {
    options: OpenCageOptions,
    ids: Arc<dyn IdGenerator>,
}

impl OpenCage {
    pub fn new() -> Self {
        Self::with_options(OpenCageOptions::default())
    }

    pub fn with_options(options: OpenCageOptions) -> Self {
        Self {
            options,
            ids: Arc::new(HashIds),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }
}

impl Default for OpenCage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Provider for OpenCage {
    fn name(&self) -> &'static str {
        "opencage"
    }

    fn default_base_url(&self) -> &'static str {
        BASE_URL
    }

    fn requires_api_key(&self) -> bool {
        true
    }

    fn build_request(
        &self,
        text: &str,
        config: &ProviderConfig,
    ) -> Result<ProviderRequest, SuggestError> {
        let opts = &self.options;
        let mut pairs = QueryPairs::new();
        pairs
            .push("bounds", opts.bounds.clone())
            .push("countrycode", opts.countrycode.clone())
            .push("q", text)
            .push("key", config.api_key())
            .push("limit", opts.limit.unwrap_or(10))
            .push("language", opts.language.clone().unwrap_or_else(|| "en".to_string()));

        let url = format!("{}?{}", config.endpoint(BASE_URL), pairs.encode());
        Ok(ProviderRequest::get(url))
    }

    fn extract_items(&self, body: &Value) -> Vec<Value> {
        body.get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn normalize(&self, item: &Value) -> LocationSuggestion {
        let record: OpenCageRecord = serde_json::from_value(item.clone()).unwrap_or_default();
        let geometry = record.geometry.unwrap_or_default();

        LocationSuggestion {
            place_id: self.ids.place_id(item),
            label: record.name.unwrap_or_default(),
            address_info: None,
            formatted_address: nonempty(record.formatted)
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            lat: scalar_string(geometry.lat.as_ref()).unwrap_or_else(|| "0".to_string()),
            lon: scalar_string(geometry.lng.as_ref()).unwrap_or_else(|| "0".to_string()),
            kind: "location".to_string(),
            importance: NEUTRAL_IMPORTANCE,
            raw: Some(item.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::HttpClient;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn normalizes_result_with_geometry() {
        let record = json!({
            "formatted": "Berlin, Germany",
            "geometry": {"lat": 52.517, "lng": 13.3888}
        });

        let suggestion = OpenCage::new().normalize(&record);
        assert_eq!(suggestion.formatted_address, "Berlin, Germany");
        assert_eq!(suggestion.lat, "52.517");
        assert_eq!(suggestion.lon, "13.3888");
        assert_eq!(suggestion.kind, "location");
        assert_eq!(suggestion.importance, 0.5);
    }

    #[test]
    fn synthesized_ids_are_stable_per_record() {
        let provider = OpenCage::new();
        let record = json!({"formatted": "Berlin, Germany"});
        assert_eq!(
            provider.normalize(&record).place_id,
            provider.normalize(&record).place_id
        );
    }

    #[test]
    fn normalize_is_total_on_empty_record() {
        let suggestion = OpenCage::new().normalize(&json!({}));
        assert_eq!(suggestion.formatted_address, "Unknown location");
        assert_eq!(suggestion.lat, "0");
        assert_eq!(suggestion.lon, "0");
        assert!(!suggestion.place_id.is_empty());
    }

    #[tokio::test]
    async fn rejects_without_api_key_before_any_fetch() {
        let server = MockServer::start().await;
        // Zero expected requests: the precondition fires first.
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .expect(0)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let config = ProviderConfig::new().with_base_url(server.uri());
        let err = OpenCage::new()
            .query(&client, "Berlin", &config)
            .await
            .unwrap_err();

        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn query_unwraps_results_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("key", "secret"))
            .and(query_param("language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"formatted": "Berlin, Germany"}],
                "total_results": 1
            })))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let config = ProviderConfig::new()
            .with_api_key("secret")
            .with_base_url(server.uri());
        let suggestions = OpenCage::new()
            .suggest(&client, "Berlin", &config)
            .await
            .unwrap();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].formatted_address, "Berlin, Germany");
    }
}
