//! TomTom fuzzy search adapter
//!
//! Requires an API key (`key` query parameter). The query travels in the
//! URL path (`search/{version}/search/{query}.{ext}`), and `typeahead` is
//! always enabled. TomTom scores results on a 0-3 scale; the canonical
//! importance divides by 3 to approximate the 0-1 range.

use super::traits::*;
use crate::error::SuggestError;
use crate::query::QueryPairs;
use crate::suggestions::{
    HashIds, IdGenerator, LocationSuggestion, ProviderConfig, NEUTRAL_IMPORTANCE, UNKNOWN_LOCATION,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const BASE_URL: &str = "https://api.tomtom.com/search/2/search";

/// Query options for the TomTom search API.
#[derive(Debug, Clone, Default)]
pub struct TomTomOptions {
    /// Service version in the URL path. Default: "2".
    pub version: Option<String>,
    /// Response format extension. Default: "json".
    pub ext: Option<String>,
    /// Maximum number of results. Default: 10, max 100.
    pub limit: Option<u32>,
    /// Result offset within the full result set.
    pub ofs: Option<u32>,
    /// Comma-separated ISO 3166-1 country codes, e.g. "FR,ES".
    pub country_set: Option<String>,
    /// IETF language tag for results.
    pub language: Option<String>,
    /// Point-radius bias latitude.
    pub lat: Option<f64>,
    /// Point-radius bias longitude.
    pub lon: Option<f64>,
    /// Radius in meters around the bias point.
    pub radius: Option<u32>,
    /// Minimum fuzziness level, 1-4.
    pub min_fuzzy_level: Option<u32>,
    /// Maximum fuzziness level, 1-4.
    pub max_fuzzy_level: Option<u32>,
    /// Comma-separated search indexes, e.g. "POI,PAD,Str".
    pub idx_set: Option<String>,
    /// Comma-separated entity types for filtering.
    pub entity_type_set: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TomTomRecord {
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    score: Option<f64>,
    #[serde(rename = "entityType")]
    entity_type: Option<String>,
    poi: Option<TomTomPoi>,
    address: Option<TomTomAddress>,
    position: Option<TomTomPosition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TomTomPoi {
    name: Option<String>,
    categories: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TomTomAddress {
    #[serde(rename = "streetName")]
    street_name: Option<String>,
    municipality: Option<String>,
    #[serde(rename = "postalCode")]
    postal_code: Option<String>,
    #[serde(rename = "countrySubdivisionName")]
    country_subdivision_name: Option<String>,
    country: Option<String>,
    #[serde(rename = "freeformAddress")]
    freeform_address: Option<String>,
    #[serde(rename = "localName")]
    local_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TomTomPosition {
    lat: Option<Value>,
    lon: Option<Value>,
}

pub struct TomTom {
    options: TomTomOptions,
    ids: Arc<dyn IdGenerator>,
}

impl TomTom {
    pub fn new() -> Self {
        Self::with_options(TomTomOptions::default())
    }

    pub fn with_options(options: TomTomOptions) -> Self {
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

impl Default for TomTom {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Provider for TomTom {
    fn name(&self) -> &'static str {
        "tomtom"
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
            .push("ofs", opts.ofs)
            .push("countrySet", opts.country_set.clone())
            .push("language", opts.language.clone())
            .push("lat", opts.lat)
            .push("lon", opts.lon)
            .push("radius", opts.radius)
            .push("minFuzzyLevel", opts.min_fuzzy_level)
            .push("maxFuzzyLevel", opts.max_fuzzy_level)
            .push("idxSet", opts.idx_set.clone())
            .push("entityTypeSet", opts.entity_type_set.clone())
            .push("key", config.api_key())
            .push("typeahead", true)
            .push("limit", opts.limit);

        let version = opts.version.as_deref().unwrap_or("2");
        let ext = opts.ext.as_deref().unwrap_or("json");
        let default_base = format!("https://api.tomtom.com/search/{}/search", version);
        let base = config.endpoint(&default_base);
        let url = format!(
            "{}/{}.{}?{}",
            base,
            urlencoding::encode(text),
            ext,
            pairs.encode()
        );
        Ok(ProviderRequest::get(url))
    }

    fn extract_items(&self, body: &Value) -> Vec<Value> {
        body.get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn normalize(&self, item: &Value) -> LocationSuggestion {
        let record: TomTomRecord = serde_json::from_value(item.clone()).unwrap_or_default();
        let poi = record.poi.unwrap_or_default();
        let address = record.address.unwrap_or_default();
        let position = record.position.unwrap_or_default();

        let info = join_parts(&[
            address.municipality.as_deref(),
            address.postal_code.as_deref(),
            address.country_subdivision_name.as_deref(),
            address.country.as_deref(),
        ]);

        LocationSuggestion {
            place_id: nonempty(record.id).unwrap_or_else(|| self.ids.place_id(item)),
            label: nonempty(poi.name.clone())
                .or_else(|| nonempty(address.local_name))
                .unwrap_or_default(),
            address_info: address_info(info),
            formatted_address: nonempty(poi.name)
                .or_else(|| nonempty(address.freeform_address))
                .or_else(|| nonempty(address.street_name))
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            lat: scalar_string(position.lat.as_ref()).unwrap_or_else(|| "0".to_string()),
            lon: scalar_string(position.lon.as_ref()).unwrap_or_else(|| "0".to_string()),
            kind: nonempty(record.kind)
                .or_else(|| poi.categories.as_ref().and_then(|c| c.first().cloned()))
                .or_else(|| nonempty(record.entity_type))
                .unwrap_or_else(|| "unknown".to_string()),
            // TomTom relevance scores run 0-3.
            importance: record
                .score
                .map(|s| s / 3.0)
                .unwrap_or(NEUTRAL_IMPORTANCE),
            raw: Some(item.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::HttpClient;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn normalizes_result_and_scales_score() {
        let record = json!({
            "type": "POI",
            "id": "g6JpZM8",
            "score": 2.4,
            "poi": {"name": "Pariser Platz", "categories": ["important tourist attraction"]},
            "address": {
                "municipality": "Berlin",
                "postalCode": "10117",
                "country": "Germany",
                "freeformAddress": "Pariser Platz, 10117 Berlin"
            },
            "position": {"lat": 52.5163, "lon": 13.3777}
        });

        let suggestion = TomTom::new().normalize(&record);
        assert_eq!(suggestion.place_id, "g6JpZM8");
        assert_eq!(suggestion.label, "Pariser Platz");
        assert_eq!(
            suggestion.address_info.as_deref(),
            Some("Berlin, 10117, Germany")
        );
        assert_eq!(suggestion.formatted_address, "Pariser Platz");
        assert_eq!(suggestion.kind, "POI");
        assert_eq!(suggestion.lat, "52.5163");
        assert_eq!(suggestion.lon, "13.3777");
        assert!((suggestion.importance - 0.8).abs() < 1e-9);
    }

    #[test]
    fn normalize_is_total_on_empty_record() {
        let suggestion = TomTom::new().normalize(&json!({}));
        assert!(!suggestion.place_id.is_empty());
        assert_eq!(suggestion.formatted_address, "Unknown location");
        assert_eq!(suggestion.kind, "unknown");
        assert_eq!(suggestion.importance, 0.5);
    }

    #[tokio::test]
    async fn query_puts_text_in_the_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Pariser%20Platz.json"))
            .and(query_param("key", "secret"))
            .and(query_param("typeahead", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "summary": {"numResults": 1},
                "results": [{"id": "x", "type": "POI"}]
            })))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let config = ProviderConfig::new()
            .with_api_key("secret")
            .with_base_url(server.uri());
        let items = TomTom::new()
            .query(&client, "Pariser Platz", &config)
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn rejects_without_api_key() {
        let client = HttpClient::new().unwrap();
        let err = TomTom::new()
            .query(&client, "Berlin", &ProviderConfig::new())
            .await
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
