//! Google Places autocomplete adapter
//!
//! POSTs a JSON body; the key travels in the `X-Goog-Api-Key` header. The
//! autocomplete response carries no coordinates, so `lat`/`lon` are always
//! `"0"` for this provider.

use super::traits::*;
use crate::error::SuggestError;
use crate::suggestions::{
    HashIds, IdGenerator, LocationSuggestion, ProviderConfig, NEUTRAL_IMPORTANCE, UNKNOWN_LOCATION,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const BASE_URL: &str = "https://places.googleapis.com/v1/places:autocomplete";

/// Options for the Google Places autocomplete API.
#[derive(Debug, Clone, Default)]
pub struct GoogleOptions {
    /// Response field mask, sent as `X-Goog-FieldMask`.
    pub field_mask: Option<String>,
    /// Up to five primary place types to include.
    pub included_primary_types: Option<Vec<String>>,
    /// Up to 15 two-character region codes.
    pub included_region_codes: Option<Vec<String>>,
    /// Include query predictions alongside place predictions.
    pub include_query_predictions: Option<bool>,
    /// Preferred BCP-47 response language.
    pub language_code: Option<String>,
    /// Billing session token.
    pub session_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GoogleRecord {
    place_prediction: GooglePrediction,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GooglePrediction {
    place_id: Option<String>,
    text: Option<GoogleText>,
    structured_format: Option<GoogleStructuredFormat>,
    types: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GoogleText {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GoogleStructuredFormat {
    main_text: Option<GoogleText>,
    secondary_text: Option<GoogleText>,
}

pub struct GooglePlaces {
    options: GoogleOptions,
    ids: Arc<dyn IdGenerator>,
}

impl GooglePlaces {
    pub fn new() -> Self {
        Self::with_options(GoogleOptions::default())
    }

    pub fn with_options(options: GoogleOptions) -> Self {
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

impl Default for GooglePlaces {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Provider for GooglePlaces {
    fn name(&self) -> &'static str {
        "google"
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
        let api_key = config.api_key().ok_or(SuggestError::MissingApiKey {
            provider: self.name(),
        })?;

        let opts = &self.options;
        let mut body = Map::new();
        body.insert("input".to_string(), json!(text));
        if let Some(types) = &opts.included_primary_types {
            body.insert("includedPrimaryTypes".to_string(), json!(types));
        }
        if let Some(codes) = &opts.included_region_codes {
            body.insert("includedRegionCodes".to_string(), json!(codes));
        }
        if let Some(include) = opts.include_query_predictions {
            body.insert("includeQueryPredictions".to_string(), json!(include));
        }
        if let Some(lang) = &opts.language_code {
            body.insert("languageCode".to_string(), json!(lang));
        }
        if let Some(token) = &opts.session_token {
            body.insert("sessionToken".to_string(), json!(token));
        }

        let mut request = ProviderRequest::post(config.endpoint(BASE_URL))
            .header("X-Goog-Api-Key", api_key)
            .json(Value::Object(body));
        if let Some(mask) = &opts.field_mask {
            request = request.header("X-Goog-FieldMask", mask);
        }
        Ok(request)
    }

    fn extract_items(&self, body: &Value) -> Vec<Value> {
        body.get("suggestions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn normalize(&self, item: &Value) -> LocationSuggestion {
        let record: GoogleRecord = serde_json::from_value(item.clone()).unwrap_or_default();
        let prediction = record.place_prediction;
        let full_text = prediction.text.and_then(|t| t.text);
        let (main, secondary) = match prediction.structured_format {
            Some(format) => (
                format.main_text.and_then(|t| t.text),
                format.secondary_text.and_then(|t| t.text),
            ),
            None => (None, None),
        };

        LocationSuggestion {
            place_id: nonempty(prediction.place_id).unwrap_or_else(|| self.ids.place_id(item)),
            label: nonempty(main.clone()).unwrap_or_default(),
            address_info: nonempty(secondary),
            formatted_address: nonempty(full_text)
                .or_else(|| nonempty(main))
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            lat: "0".to_string(),
            lon: "0".to_string(),
            kind: nonempty(prediction.types.map(|t| t.join(",")))
                .unwrap_or_else(|| "unknown".to_string()),
            importance: NEUTRAL_IMPORTANCE,
            raw: Some(item.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::HttpClient;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn normalizes_place_prediction() {
        let record = json!({
            "placePrediction": {
                "placeId": "ChIJ123",
                "text": {"text": "Brandenburg Gate, Berlin, Germany"},
                "structuredFormat": {
                    "mainText": {"text": "Brandenburg Gate"},
                    "secondaryText": {"text": "Berlin, Germany"}
                },
                "types": ["landmark", "point_of_interest"]
            }
        });

        let suggestion = GooglePlaces::new().normalize(&record);
        assert_eq!(suggestion.place_id, "ChIJ123");
        assert_eq!(suggestion.label, "Brandenburg Gate");
        assert_eq!(suggestion.address_info.as_deref(), Some("Berlin, Germany"));
        assert_eq!(
            suggestion.formatted_address,
            "Brandenburg Gate, Berlin, Germany"
        );
        assert_eq!(suggestion.kind, "landmark,point_of_interest");
        assert_eq!(suggestion.lat, "0");
        assert_eq!(suggestion.lon, "0");
    }

    #[test]
    fn normalize_is_total_on_empty_record() {
        let suggestion = GooglePlaces::new().normalize(&json!({}));
        assert!(!suggestion.place_id.is_empty());
        assert_eq!(suggestion.formatted_address, "Unknown location");
        assert_eq!(suggestion.kind, "unknown");
        assert_eq!(suggestion.importance, 0.5);
    }

    #[tokio::test]
    async fn rejects_without_api_key_before_any_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"suggestions": []})))
            .expect(0)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let config = ProviderConfig::new().with_base_url(server.uri());
        let err = GooglePlaces::new()
            .query(&client, "Berlin", &config)
            .await
            .unwrap_err();

        assert!(matches!(err, SuggestError::MissingApiKey { provider: "google" }));
    }

    #[tokio::test]
    async fn posts_input_with_key_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("X-Goog-Api-Key", "secret"))
            .and(body_partial_json(json!({"input": "Berlin"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "suggestions": [
                    {"placePrediction": {"placeId": "X", "text": {"text": "Berlin"}}}
                ]
            })))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let config = ProviderConfig::new()
            .with_api_key("secret")
            .with_base_url(server.uri());
        let suggestions = GooglePlaces::new()
            .suggest(&client, "Berlin", &config)
            .await
            .unwrap();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].formatted_address, "Berlin");
    }
}
