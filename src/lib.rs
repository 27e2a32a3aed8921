//! geosuggest-rs: provider-agnostic location autocomplete
//!
//! Turns free-text location queries into ranked place suggestions,
//! regardless of which upstream geocoding service answers. Eight provider
//! adapters normalize wildly different response schemas into one canonical
//! [`LocationSuggestion`], and [`AutocompleteSession`] drives debounced,
//! race-safe queries so only the most recent keystroke's result is ever
//! shown.
//!
//! Rendering, retries, caching and rate limiting are left to the
//! integrating application.

pub mod config;
pub mod error;
pub mod network;
pub mod providers;
pub mod query;
pub mod session;
pub mod suggestions;

pub use config::{OutgoingSettings, Settings, DEFAULT_DEBOUNCE_MS};
pub use error::{FetchError, SuggestError};
pub use network::{Fetched, HttpClient};
pub use providers::{get_provider, list_providers, Provider, ProviderRequest};
pub use query::{QueryPairs, QueryValue};
pub use session::{
    AutocompleteSession, Phase, ProviderSource, SessionState, SourceFn, SuggestionSource,
};
pub use suggestions::{HashIds, IdGenerator, LocationSuggestion, ProviderConfig, RandomIds};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
