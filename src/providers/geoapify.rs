//! Geoapify geocode autocomplete adapter
//!
//! Requires an API key (`apiKey` query parameter). Responses are GeoJSON
//! feature collections; everything useful lives under `properties`.

use super::traits::*;
use crate::error::SuggestError;
use crate::query::QueryPairs;
use crate::suggestions::{
    HashIds, IdGenerator, LocationSuggestion, ProviderConfig, NEUTRAL_IMPORTANCE, UNKNOWN_LOCATION,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const BASE_URL: &str = "https://api.geoapify.com/v1/geocode/autocomplete";

/// Query options for the Geoapify autocomplete API.
#[derive(Debug, Clone, Default)]
pub struct GeoapifyOptions {
    /// Restrict results to one location type, e.g. "city".
    pub kind: Option<String>,
    /// Two-character ISO 639-1 result language.
    pub lang: Option<String>,
    /// Result filter, e.g. "rect:lon1,lat1,lon2,lat2".
    pub filter: Option<String>,
    /// Location bias, e.g. "proximity:lon,lat".
    pub bias: Option<String>,
    /// Maximum number of results.
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeoapifyFeature {
    properties: GeoapifyProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeoapifyProperties {
    place_id: Option<String>,
    formatted: Option<String>,
    address_line1: Option<String>,
    address_line2: Option<String>,
    suburb: Option<String>,
    city: Option<String>,
    postcode: Option<String>,
    state: Option<String>,
    country: Option<String>,
    result_type: Option<String>,
    lat: Option<Value>,
    lon: Option<Value>,
    rank: Option<GeoapifyRank>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeoapifyRank {
    importance: Option<f64>,
}

pub struct Geoapify {
    options: GeoapifyOptions,
    ids: Arc<dyn IdGenerator>,
}

impl Geoapify {
    pub fn new() -> Self {
        Self::with_options(GeoapifyOptions::default())
    }

    pub fn with_options(options: GeoapifyOptions) -> Self {
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

impl Default for Geoapify {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Provider for Geoapify {
    fn name(&self) -> &'static str {
        "geoapify"
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
            .push("type", opts.kind.clone())
            .push("lang", opts.lang.clone())
            .push("filter", opts.filter.clone())
            .push("bias", opts.bias.clone())
            .push("limit", opts.limit)
            .push("text", text)
            .push("apiKey", config.api_key());

        let url = format!("{}?{}", config.endpoint(BASE_URL), pairs.encode());
        Ok(ProviderRequest::get(url))
    }

    fn extract_items(&self, body: &Value) -> Vec<Value> {
        body.get("features")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn normalize(&self, item: &Value) -> LocationSuggestion {
        let feature: GeoapifyFeature = serde_json::from_value(item.clone()).unwrap_or_default();
        let props = feature.properties;

        let info = nonempty(props.address_line2).unwrap_or_else(|| {
            join_parts(&[
                props.suburb.as_deref(),
                props.city.as_deref(),
                props.postcode.as_deref(),
                props.state.as_deref(),
                props.country.as_deref(),
            ])
        });

        LocationSuggestion {
            place_id: nonempty(props.place_id).unwrap_or_else(|| self.ids.place_id(item)),
            label: nonempty(props.address_line1).unwrap_or_default(),
            address_info: address_info(info),
            formatted_address: nonempty(props.formatted)
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            lat: scalar_string(props.lat.as_ref()).unwrap_or_else(|| "0".to_string()),
            lon: scalar_string(props.lon.as_ref()).unwrap_or_else(|| "0".to_string()),
            kind: nonempty(props.result_type).unwrap_or_else(|| "unknown".to_string()),
            importance: props
                .rank
                .and_then(|r| r.importance)
                .unwrap_or(NEUTRAL_IMPORTANCE),
            raw: Some(item.clone()),
        }
    }
}
