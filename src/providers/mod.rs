//! Geocoding provider adapters
//!
//! One module per upstream service. Each adapter pairs query-building with
//! response normalization behind the [`Provider`] trait; provider
//! heterogeneity is fully absorbed at this boundary, so everything upstream
//! only ever sees [`LocationSuggestion`](crate::LocationSuggestion) values.
//! Adding a new provider means implementing the trait in one new module.

mod registry;
mod traits;

pub mod geoapify;
pub mod google;
pub mod here;
pub mod locationiq;
pub mod mapbox;
pub mod opencage;
pub mod openstreetmap;
pub mod tomtom;

pub use registry::{get_provider, list_providers};
pub use traits::*;

pub use geoapify::Geoapify;
pub use google::GooglePlaces;
pub use here::Here;
pub use locationiq::LocationIq;
pub use mapbox::Mapbox;
pub use opencage::OpenCage;
pub use openstreetmap::OpenStreetMap;
pub use tomtom::TomTom;
