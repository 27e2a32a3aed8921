//! Provider trait and request types

use crate::error::SuggestError;
use crate::network::{Fetched, HttpClient};
use crate::suggestions::{LocationSuggestion, ProviderConfig};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// HTTP method for a provider request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A fully-built HTTP request for one provider call. The URL already
/// carries the encoded query string; the body, when present, is JSON.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

impl ProviderRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A geocoding provider adapter.
///
/// Implementations are stateless apart from their construction-time
/// options: `build_request` turns a query into one HTTP request,
/// `extract_items` unwraps the provider's response envelope, and
/// `normalize` maps a single provider-native record into the canonical
/// shape. `normalize` is total: it must never fail, substituting the
/// documented fallbacks instead, so one malformed upstream record cannot
/// abort an otherwise-good list.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable provider name, e.g. `"openstreetmap"`.
    fn name(&self) -> &'static str;

    /// Default endpoint, overridable per call via `config.base_url`.
    fn default_base_url(&self) -> &'static str;

    /// Whether `config.api_key` must be present for this provider.
    fn requires_api_key(&self) -> bool {
        false
    }

    /// Build the HTTP request for one query.
    fn build_request(
        &self,
        text: &str,
        config: &ProviderConfig,
    ) -> Result<ProviderRequest, SuggestError>;

    /// Unwrap the provider's response envelope into a flat list of
    /// provider-native records.
    fn extract_items(&self, body: &Value) -> Vec<Value>;

    /// Normalize one provider-native record. Pure, total, no I/O.
    fn normalize(&self, item: &Value) -> LocationSuggestion;

    /// Run one query and return the provider-native records.
    ///
    /// The API-key precondition is checked before any network activity, so
    /// a missing key never incurs latency or a partial response.
    async fn query(
        &self,
        client: &HttpClient,
        text: &str,
        config: &ProviderConfig,
    ) -> Result<Vec<Value>, SuggestError> {
        if self.requires_api_key() && config.api_key().is_none() {
            return Err(SuggestError::MissingApiKey {
                provider: self.name(),
            });
        }

        let request = self.build_request(text, config)?;
        let fetched: Fetched<Value> =
            client
                .fetch(request)
                .await
                .map_err(|source| SuggestError::Fetch {
                    provider: self.name(),
                    source,
                })?;

        let items = self.extract_items(&fetched.response);
        debug!(
            provider = self.name(),
            status = fetched.status,
            count = items.len(),
            "provider query completed"
        );
        Ok(items)
    }

    /// Run one query and normalize every record.
    async fn suggest(
        &self,
        client: &HttpClient,
        text: &str,
        config: &ProviderConfig,
    ) -> Result<Vec<LocationSuggestion>, SuggestError> {
        let items = self.query(client, text, config).await?;
        Ok(items.iter().map(|item| self.normalize(item)).collect())
    }
}

/// String view of a JSON scalar: strings pass through, numbers are
/// stringified, everything else is `None`. Providers disagree on whether
/// ids and coordinates come as strings or numbers.
pub(crate) fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Join non-empty address parts with `", "`.
pub(crate) fn join_parts(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .copied()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Some(s)` only when the string is non-empty.
pub(crate) fn nonempty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

/// Secondary context for the canonical model: empty strings become `None`.
pub(crate) fn address_info(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_string_handles_strings_and_numbers() {
        assert_eq!(scalar_string(Some(&json!("abc"))), Some("abc".to_string()));
        assert_eq!(scalar_string(Some(&json!(322169))), Some("322169".to_string()));
        assert_eq!(scalar_string(Some(&json!(""))), None);
        assert_eq!(scalar_string(Some(&json!(null))), None);
        assert_eq!(scalar_string(None), None);
    }

    #[test]
    fn join_parts_skips_missing_segments() {
        let joined = join_parts(&[Some("Gardens"), None, Some("Cape Town"), Some(""), Some("ZA")]);
        assert_eq!(joined, "Gardens, Cape Town, ZA");
    }
}
