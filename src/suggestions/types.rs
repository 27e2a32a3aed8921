//! Canonical suggestion and provider configuration types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The provider-independent suggestion record.
///
/// Every adapter normalizes into this shape; nothing upstream of the
/// adapters ever sees a provider-native record except through [`raw`].
/// A suggestion is never mutated after creation; a fresh list replaces the
/// previous one wholesale.
///
/// [`raw`]: LocationSuggestion::raw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    /// Identifier unique within one result list. Synthesized from the raw
    /// record when the provider does not supply one, so it is never empty.
    pub place_id: String,
    /// Primary display text (street/POI name). Empty when the provider
    /// gives no structured breakdown.
    #[serde(default)]
    pub label: String,
    /// Secondary context (city/region/country). Omitted, not null, when
    /// unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_info: Option<String>,
    /// Full address string; the value committed on selection. Falls back
    /// to `"Unknown location"` when the provider gives nothing usable.
    pub formatted_address: String,
    /// Latitude as a decimal string, `"0"` when the provider has none.
    /// Stringified to avoid floating-point round-trip loss.
    pub lat: String,
    /// Longitude as a decimal string, `"0"` when the provider has none.
    pub lon: String,
    /// Provider's coarse classification (city, street, poi, ...),
    /// `"unknown"` when absent.
    #[serde(rename = "type")]
    pub kind: String,
    /// Relative rank/confidence, 0-1 intent. Providers without a native
    /// score report the neutral 0.5.
    pub importance: f64,
    /// The unmodified provider-native record, kept so consumers can
    /// recover fields the canonical model drops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

/// Fallback display string when a provider yields no usable address.
pub(crate) const UNKNOWN_LOCATION: &str = "Unknown location";

/// Neutral importance for providers without a native ranking signal.
pub(crate) const NEUTRAL_IMPORTANCE: f64 = 0.5;

/// Per-provider credentials and endpoint override, supplied by the caller
/// at call time and never persisted by the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// API key, treating the empty string as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Endpoint for this call: the caller's override or the provider
    /// default.
    pub fn endpoint<'a>(&'a self, default: &'a str) -> &'a str {
        self.base_url.as_deref().filter(|u| !u.is_empty()).unwrap_or(default)
    }
}
