//! Canonical suggestion model
//!
//! The single output shape every provider adapter must produce, plus the
//! place-id generators used when a provider omits a stable identifier.

mod ids;
mod types;

pub use ids::{HashIds, IdGenerator, RandomIds};
pub use types::{LocationSuggestion, ProviderConfig};

pub(crate) use types::{NEUTRAL_IMPORTANCE, UNKNOWN_LOCATION};
