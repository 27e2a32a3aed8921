//! LocationIQ search adapter
//!
//! Nominatim-compatible API behind an API key (`key` query parameter);
//! forces `format=json`.

use super::traits::*;
use crate::error::SuggestError;
use crate::query::QueryPairs;
use crate::suggestions::{
    HashIds, IdGenerator, LocationSuggestion, ProviderConfig, NEUTRAL_IMPORTANCE, UNKNOWN_LOCATION,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const BASE_URL: &str = "https://us1.locationiq.com/v1/search.php";

/// Query options for the LocationIQ search API.
#[derive(Debug, Clone, Default)]
pub struct LocationIqOptions {
    /// Maximum number of results, 1-20. Default: 10.
    pub limit: Option<u32>,
    /// Comma-separated ISO 3166-1 alpha2 codes.
    pub countrycodes: Option<String>,
    /// Fill a missing city field from the next-best locality component.
    pub normalizecity: Option<bool>,
    /// Two-character ISO 639-1 result language.
    pub accept_language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocationIqRecord {
    place_id: Option<Value>,
    osm_id: Option<Value>,
    lat: Option<Value>,
    lon: Option<Value>,
    class: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    display_name: Option<String>,
    display_place: Option<String>,
    display_address: Option<String>,
}

pub struct LocationIq {
    options: LocationIqOptions,
    ids: Arc<dyn IdGenerator>,
}

impl LocationIq {
    pub fn new() -> Self {
        Self::with_options(LocationIqOptions::default())
    }

    pub fn with_options(options: LocationIqOptions) -> Self {
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

impl Default for LocationIq {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Provider for LocationIq {
    fn name(&self) -> &'static str {
        "locationiq"
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
            .push("limit", opts.limit)
            .push("countrycodes", opts.countrycodes.clone())
            .push(
                "normalizecity",
                opts.normalizecity.map(|b| i64::from(b)),
            )
            .push("accept-language", opts.accept_language.clone())
            .push("key", config.api_key())
            .push("q", text)
            .push("format", "json");

        let url = format!("{}?{}", config.endpoint(BASE_URL), pairs.encode());
        Ok(ProviderRequest::get(url))
    }

    fn extract_items(&self, body: &Value) -> Vec<Value> {
        body.as_array().cloned().unwrap_or_default()
    }

    fn normalize(&self, item: &Value) -> LocationSuggestion {
        let record: LocationIqRecord = serde_json::from_value(item.clone()).unwrap_or_default();

        LocationSuggestion {
            place_id: scalar_string(record.place_id.as_ref())
                .or_else(|| scalar_string(record.osm_id.as_ref()))
                .unwrap_or_else(|| self.ids.place_id(item)),
            label: nonempty(record.display_place).unwrap_or_default(),
            address_info: nonempty(record.display_address),
            formatted_address: nonempty(record.display_name)
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            lat: scalar_string(record.lat.as_ref()).unwrap_or_else(|| "0".to_string()),
            lon: scalar_string(record.lon.as_ref()).unwrap_or_else(|| "0".to_string()),
            kind: nonempty(record.kind)
                .or_else(|| nonempty(record.class))
                .unwrap_or_else(|| "unknown".to_string()),
            importance: NEUTRAL_IMPORTANCE,
            raw: Some(item.clone()),
        }
    }
}
