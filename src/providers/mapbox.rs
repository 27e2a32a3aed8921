//! Mapbox Search Box suggest adapter
//!
//! Requires an API key (`access_token` query parameter). Suggest responses
//! carry no coordinates; retrieving them needs a follow-up call, so
//! `lat`/`lon` are always `"0"` here. A session token groups calls for
//! billing; one is generated per adapter instance unless supplied.

use super::traits::*;
use crate::error::SuggestError;
use crate::query::QueryPairs;
use crate::suggestions::{
    HashIds, IdGenerator, LocationSuggestion, ProviderConfig, NEUTRAL_IMPORTANCE, UNKNOWN_LOCATION,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

const BASE_URL: &str = "https://api.mapbox.com/search/searchbox/v1/suggest";

/// Query options for the Mapbox Search Box suggest API.
#[derive(Debug, Clone, Default)]
pub struct MapboxOptions {
    /// ISO language code, e.g. "en".
    pub language: Option<String>,
    /// Maximum number of results, up to 10. Default: 10.
    pub limit: Option<u32>,
    /// `"ip"` or `lon,lat` to bias towards a point.
    pub proximity: Option<String>,
    /// `minLon,minLat,maxLon,maxLat` bounding box.
    pub bbox: Option<String>,
    /// Comma-separated ISO 3166-1 alpha2 codes.
    pub country: Option<String>,
    /// Comma-separated feature types, e.g. "city,postcode".
    pub types: Option<String>,
    /// Comma-separated POI categories to include.
    pub poi_category: Option<String>,
    /// Billing session token; generated per instance when unset.
    pub session_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MapboxRecord {
    name: Option<String>,
    mapbox_id: Option<String>,
    feature_type: Option<String>,
    address: Option<String>,
    full_address: Option<String>,
    place_formatted: Option<String>,
}

pub struct Mapbox {
    options: MapboxOptions,
    session_token: String,
    ids: Arc<dyn IdGenerator>,
}

impl Mapbox {
    pub fn new() -> Self {
        Self::with_options(MapboxOptions::default())
    }

    pub fn with_options(options: MapboxOptions) -> Self {
        let session_token = options
            .session_token
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Self {
            options,
            session_token,
            ids: Arc::new(HashIds),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }
}

impl Default for Mapbox {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Provider for Mapbox {
    fn name(&self) -> &'static str {
        "mapbox"
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
            .push("language", opts.language.clone())
            .push("proximity", opts.proximity.clone())
            .push("bbox", opts.bbox.clone())
            .push("country", opts.country.clone())
            .push("types", opts.types.clone())
            .push("poi_category", opts.poi_category.clone())
            .push("access_token", config.api_key())
            .push("limit", opts.limit.unwrap_or(10))
            .push("q", text)
            .push("session_token", self.session_token.clone());

        let url = format!("{}?{}", config.endpoint(BASE_URL), pairs.encode());
        Ok(ProviderRequest::get(url))
    }

    fn extract_items(&self, body: &Value) -> Vec<Value> {
        body.get("suggestions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn normalize(&self, item: &Value) -> LocationSuggestion {
        let record: MapboxRecord = serde_json::from_value(item.clone()).unwrap_or_default();

        LocationSuggestion {
            place_id: nonempty(record.mapbox_id).unwrap_or_else(|| self.ids.place_id(item)),
            label: nonempty(record.address.clone())
                .or_else(|| nonempty(record.name))
                .unwrap_or_default(),
            address_info: nonempty(record.place_formatted),
            formatted_address: nonempty(record.full_address)
                .or_else(|| nonempty(record.address))
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            lat: "0".to_string(),
            lon: "0".to_string(),
            kind: nonempty(record.feature_type).unwrap_or_else(|| "unknown".to_string()),
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
    fn normalizes_suggestion() {
        let record = json!({
            "name": "Alexanderplatz",
            "mapbox_id": "dXJuOm1ieHBvaQ",
            "feature_type": "poi",
            "full_address": "Alexanderplatz, 10178 Berlin, Germany",
            "place_formatted": "10178 Berlin, Germany"
        });

        let suggestion = Mapbox::new().normalize(&record);
        assert_eq!(suggestion.place_id, "dXJuOm1ieHBvaQ");
        assert_eq!(suggestion.label, "Alexanderplatz");
        assert_eq!(
            suggestion.address_info.as_deref(),
            Some("10178 Berlin, Germany")
        );
        assert_eq!(
            suggestion.formatted_address,
            "Alexanderplatz, 10178 Berlin, Germany"
        );
        assert_eq!(suggestion.kind, "poi");
        assert_eq!(suggestion.lat, "0");
    }

    #[test]
    fn normalize_is_total_on_empty_record() {
        let suggestion = Mapbox::new().normalize(&json!({}));
        assert!(!suggestion.place_id.is_empty());
        assert_eq!(suggestion.formatted_address, "Unknown location");
        assert_eq!(suggestion.address_info, None);
        assert_eq!(suggestion.importance, 0.5);
    }

    #[tokio::test]
    async fn query_injects_session_token_and_limit() {
        let server = MockServer::start().await;
        let provider = Mapbox::with_options(MapboxOptions {
            session_token: Some("sess-1".to_string()),
            ..Default::default()
        });

        Mock::given(method("GET"))
            .and(query_param("q", "Alexanderplatz"))
            .and(query_param("access_token", "secret"))
            .and(query_param("limit", "10"))
            .and(query_param("session_token", "sess-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "suggestions": [{"name": "Alexanderplatz", "mapbox_id": "x"}]
            })))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let config = ProviderConfig::new()
            .with_api_key("secret")
            .with_base_url(server.uri());
        let items = provider
            .query(&client, "Alexanderplatz", &config)
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn rejects_without_api_key() {
        let client = HttpClient::new().unwrap();
        let err = Mapbox::new()
            .query(&client, "Berlin", &ProviderConfig::new())
            .await
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
