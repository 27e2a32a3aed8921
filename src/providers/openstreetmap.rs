//! OpenStreetMap (Nominatim) search adapter
//!
//! No API key required. Always requests `addressdetails=1` so the
//! structured address breakdown is available for normalization.

use super::traits::*;
use crate::error::SuggestError;
use crate::query::QueryPairs;
use crate::suggestions::{
    HashIds, IdGenerator, LocationSuggestion, ProviderConfig, NEUTRAL_IMPORTANCE, UNKNOWN_LOCATION,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const BASE_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Query options for the Nominatim search API.
#[derive(Debug, Clone, Default)]
pub struct OpenStreetMapOptions {
    /// Maximum number of results. Default: 10.
    pub limit: Option<u32>,
    /// Response format. Default: "jsonv2".
    pub format: Option<String>,
    /// Bounding box restriction as `[left, top, right, bottom]`.
    pub viewbox: Option<[f64; 4]>,
    /// Restrict results to the viewbox area.
    pub bounded: Option<bool>,
    /// Preferred result language, e.g. "en".
    pub accept_language: Option<String>,
    /// ISO 3166-1 alpha2 codes, e.g. "de,gb".
    pub countrycodes: Option<String>,
    /// Restrict to a layer, e.g. "address,poi,railway".
    pub layer: Option<String>,
    /// Return GeoJSON polygon geometry.
    pub polygon_geojson: Option<bool>,
    /// Polygon simplification threshold.
    pub polygon_threshold: Option<f64>,
    /// Result offset within the full result set.
    pub offset: Option<u32>,
}

/// Typed view of a Nominatim record; every field optional so a partial
/// record still normalizes.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OsmRecord {
    place_id: Option<Value>,
    osm_id: Option<Value>,
    lat: Option<Value>,
    lon: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
    addresstype: Option<String>,
    importance: Option<f64>,
    name: Option<String>,
    display_name: Option<String>,
    address: Option<OsmAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OsmAddress {
    suburb: Option<String>,
    city: Option<String>,
    postcode: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

pub struct OpenStreetMap {
    options: OpenStreetMapOptions,
    ids: Arc<dyn IdGenerator>,
}

impl OpenStreetMap {
    pub fn new() -> Self {
        Self::with_options(OpenStreetMapOptions::default())
    }

    pub fn with_options(options: OpenStreetMapOptions) -> Self {
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

impl Default for OpenStreetMap {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Provider for OpenStreetMap {
    fn name(&self) -> &'static str {
        "openstreetmap"
    }

    fn default_base_url(&self) -> &'static str {
        BASE_URL
    }

    fn build_request(
        &self,
        text: &str,
        config: &ProviderConfig,
    ) -> Result<ProviderRequest, SuggestError> {
        let opts = &self.options;
        let mut pairs = QueryPairs::new();
        pairs
            .push("viewbox", opts.viewbox.map(|v| v.to_vec()))
            .push("bounded", opts.bounded)
            .push("accept-language", opts.accept_language.clone())
            .push("countrycodes", opts.countrycodes.clone())
            .push("layer", opts.layer.clone())
            .push("polygon_geojson", opts.polygon_geojson)
            .push("polygon_threshold", opts.polygon_threshold)
            .push("offset", opts.offset)
            .push("q", text)
            .push("format", opts.format.clone().unwrap_or_else(|| "jsonv2".to_string()))
            .push("limit", opts.limit.unwrap_or(10))
            .push("addressdetails", 1i64);

        let url = format!("{}?{}", config.endpoint(BASE_URL), pairs.encode());
        Ok(ProviderRequest::get(url))
    }

    fn extract_items(&self, body: &Value) -> Vec<Value> {
        body.as_array().cloned().unwrap_or_default()
    }

    fn normalize(&self, item: &Value) -> LocationSuggestion {
        let record: OsmRecord = serde_json::from_value(item.clone()).unwrap_or_default();
        let display_name = record.display_name.unwrap_or_default();
        let name = record.name.unwrap_or_default();

        // With no structured address, the secondary context is everything
        // after the first comma of the display name.
        let info = match &record.address {
            Some(addr) => join_parts(&[
                addr.suburb.as_deref(),
                addr.city.as_deref(),
                addr.postcode.as_deref(),
                addr.state.as_deref(),
                addr.country.as_deref(),
            ]),
            None => display_name
                .split(", ")
                .skip(1)
                .collect::<Vec<_>>()
                .join(", "),
        };

        let label = if name.is_empty() {
            display_name.clone()
        } else {
            name.clone()
        };

        LocationSuggestion {
            place_id: scalar_string(record.place_id.as_ref())
                .or_else(|| scalar_string(record.osm_id.as_ref()))
                .unwrap_or_else(|| self.ids.place_id(item)),
            label,
            address_info: address_info(info),
            formatted_address: nonempty(Some(display_name))
                .or_else(|| nonempty(Some(name)))
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            lat: scalar_string(record.lat.as_ref()).unwrap_or_else(|| "0".to_string()),
            lon: scalar_string(record.lon.as_ref()).unwrap_or_else(|| "0".to_string()),
            kind: nonempty(record.kind)
                .or_else(|| nonempty(record.addresstype))
                .unwrap_or_else(|| "unknown".to_string()),
            importance: record.importance.unwrap_or(NEUTRAL_IMPORTANCE),
            raw: Some(item.clone()),
        }
    }
}
