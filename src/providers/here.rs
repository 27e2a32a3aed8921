//! HERE autocomplete adapter
//!
//! Requires an API key (`apiKey` query parameter). Autocomplete responses
//! carry no coordinates, so `lat`/`lon` are always `"0"`. The label is the
//! first segment of the address label; the secondary context joins the
//! structured parts in district, city, postcode, state, country order.

use super::traits::*;
use crate::error::SuggestError;
use crate::query::QueryPairs;
use crate::suggestions::{
    HashIds, IdGenerator, LocationSuggestion, ProviderConfig, NEUTRAL_IMPORTANCE, UNKNOWN_LOCATION,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const BASE_URL: &str = "https://autocomplete.search.hereapi.com/v1/autocomplete";

/// Query options for the HERE autocomplete API.
#[derive(Debug, Clone, Default)]
pub struct HereOptions {
    /// Search context center, `{lat},{lng}`.
    pub at: Option<String>,
    /// Hard geographic filter: country codes, `circle:...` or `bbox:...`.
    pub r#in: Option<String>,
    /// Restrict result types: "area", "city", "postalCode".
    pub types: Option<Vec<String>>,
    /// Preferred BCP-47 response languages.
    pub lang: Option<Vec<String>>,
    /// Additional response fields, e.g. "streetInfo".
    pub show: Option<Vec<String>>,
    /// Political view, ISO 3166-1 alpha3 uppercase.
    pub political_view: Option<String>,
    /// Maximum number of results. Default: 10.
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HereRecord {
    title: Option<String>,
    id: Option<String>,
    #[serde(rename = "resultType")]
    result_type: Option<String>,
    address: Option<HereAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HereAddress {
    label: Option<String>,
    state: Option<String>,
    city: Option<String>,
    district: Option<String>,
    #[serde(rename = "postalCode")]
    postal_code: Option<String>,
    #[serde(rename = "countryName")]
    country_name: Option<String>,
}

pub struct Here {
    options: HereOptions,
    ids: Arc<dyn IdGenerator>,
}

impl Here {
    pub fn new() -> Self {
        Self::with_options(HereOptions::default())
    }

    pub fn with_options(options: HereOptions) -> Self {
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

impl Default for Here {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Provider for Here {
    fn name(&self) -> &'static str {
        "here"
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
            .push("at", opts.at.clone())
            .push("in", opts.r#in.clone())
            .push("politicalView", opts.political_view.clone())
            .push("q", text)
            .push("apiKey", config.api_key())
            .push("limit", opts.limit.unwrap_or(10))
            .push("types", opts.types.as_ref().map(|t| t.join(",")))
            .push("show", opts.show.as_ref().map(|s| s.join(",")))
            .push("lang", opts.lang.as_ref().map(|l| l.join(",")));

        let url = format!("{}?{}", config.endpoint(BASE_URL), pairs.encode());
        Ok(ProviderRequest::get(url))
    }

    fn extract_items(&self, body: &Value) -> Vec<Value> {
        body.get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn normalize(&self, item: &Value) -> LocationSuggestion {
        let record: HereRecord = serde_json::from_value(item.clone()).unwrap_or_default();
        let address = record.address.unwrap_or_default();
        let full_label = address.label.clone().unwrap_or_default();
        let label = full_label
            .split(',')
            .next()
            .unwrap_or_default()
            .to_string();

        let info = join_parts(&[
            address.district.as_deref(),
            address.city.as_deref(),
            address.postal_code.as_deref(),
            address.state.as_deref(),
            address.country_name.as_deref(),
        ]);
        // No structured parts at all: fall back to the short label.
        let info = if info.is_empty() { label.clone() } else { info };

        LocationSuggestion {
            place_id: nonempty(record.id).unwrap_or_else(|| self.ids.place_id(item)),
            label: label.clone(),
            address_info: address_info(info),
            formatted_address: nonempty(record.title)
                .or_else(|| nonempty(address.label))
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            lat: "0".to_string(),
            lon: "0".to_string(),
            kind: nonempty(record.result_type).unwrap_or_else(|| "unknown".to_string()),
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
    fn splits_label_and_joins_address_parts() {
        let record = json!({
            "title": "Garden Road, Eastbourne, England",
            "id": "here:af:streetsection:abc",
            "resultType": "street",
            "address": {
                "label": "Garden Road, Eastbourne, BN20 8HF, England",
                "district": "Eastbourne",
                "city": "Eastbourne",
                "postalCode": "BN20 8HF",
                "state": "England",
                "countryName": "United Kingdom"
            }
        });

        let suggestion = Here::new().normalize(&record);
        assert_eq!(suggestion.place_id, "here:af:streetsection:abc");
        assert_eq!(suggestion.label, "Garden Road");
        assert_eq!(
            suggestion.address_info.as_deref(),
            Some("Eastbourne, Eastbourne, BN20 8HF, England, United Kingdom")
        );
        assert_eq!(
            suggestion.formatted_address,
            "Garden Road, Eastbourne, England"
        );
        assert_eq!(suggestion.kind, "street");
        assert_eq!(suggestion.lat, "0");
    }

    #[test]
    fn normalize_is_total_on_empty_record() {
        let suggestion = Here::new().normalize(&json!({}));
        assert!(!suggestion.place_id.is_empty());
        assert_eq!(suggestion.formatted_address, "Unknown location");
        assert_eq!(suggestion.label, "");
        assert_eq!(suggestion.address_info, None);
        assert_eq!(suggestion.importance, 0.5);
    }

    #[tokio::test]
    async fn query_joins_list_options() {
        let server = MockServer::start().await;
        let provider = Here::with_options(HereOptions {
            types: Some(vec!["city".to_string(), "area".to_string()]),
            lang: Some(vec!["en".to_string()]),
            ..Default::default()
        });

        Mock::given(method("GET"))
            .and(query_param("q", "Eastbourne"))
            .and(query_param("apiKey", "secret"))
            .and(query_param("limit", "10"))
            .and(query_param("types", "city,area"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"title": "Eastbourne", "id": "x"}]
            })))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let config = ProviderConfig::new()
            .with_api_key("secret")
            .with_base_url(server.uri());
        let items = provider.query(&client, "Eastbourne", &config).await.unwrap();

        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn rejects_without_api_key() {
        let client = HttpClient::new().unwrap();
        let err = Here::new()
            .query(&client, "Eastbourne", &ProviderConfig::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SuggestError::MissingApiKey { provider: "here" }));
    }
}
