//! Error types for the autocomplete core

use thiserror::Error;

/// Failure of a single fetch through the HTTP wrapper.
///
/// Non-2xx statuses are not errors at this layer; callers inspect the
/// status on the decoded response instead.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never completed (DNS, connect, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body arrived but was not valid JSON for the expected shape.
    #[error("invalid JSON body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors surfaced by provider adapters and the session.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// The provider requires an API key and `config.api_key` was unset.
    /// Raised before any network activity, never retried.
    #[error("provider '{provider}' requires an API key in config.api_key")]
    MissingApiKey { provider: &'static str },

    /// A network or decode failure while querying a provider.
    #[error("query to provider '{provider}' failed: {source}")]
    Fetch {
        provider: &'static str,
        #[source]
        source: FetchError,
    },
}

impl SuggestError {
    /// Name of the provider the error originated from.
    pub fn provider(&self) -> &'static str {
        match self {
            Self::MissingApiKey { provider } => provider,
            Self::Fetch { provider, .. } => provider,
        }
    }

    /// Whether this is the synchronous missing-key precondition failure.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingApiKey { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_configuration() {
        let err = SuggestError::MissingApiKey { provider: "google" };
        assert!(err.is_configuration());
        assert_eq!(err.provider(), "google");
        assert!(err.to_string().contains("google"));
    }
}
