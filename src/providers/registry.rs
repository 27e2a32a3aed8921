//! Provider registry
//!
//! Name-based lookup for integrators that pick a provider from
//! configuration. Selection stays explicit; nothing here inspects types at
//! runtime.

use super::traits::Provider;
use super::{
    Geoapify, GooglePlaces, Here, LocationIq, Mapbox, OpenCage, OpenStreetMap, TomTom,
};
use std::sync::Arc;

/// Get a provider by name. Accepts a few common aliases.
pub fn get_provider(name: &str) -> Option<Arc<dyn Provider>> {
    match name.to_lowercase().as_str() {
        "openstreetmap" | "osm" | "nominatim" => Some(Arc::new(OpenStreetMap::new())),
        "opencage" => Some(Arc::new(OpenCage::new())),
        "google" | "googleplaces" => Some(Arc::new(GooglePlaces::new())),
        "mapbox" => Some(Arc::new(Mapbox::new())),
        "locationiq" => Some(Arc::new(LocationIq::new())),
        "geoapify" => Some(Arc::new(Geoapify::new())),
        "here" => Some(Arc::new(Here::new())),
        "tomtom" => Some(Arc::new(TomTom::new())),
        _ => None,
    }
}

/// List the canonical provider names.
pub fn list_providers() -> Vec<&'static str> {
    vec![
        "openstreetmap",
        "opencage",
        "google",
        "mapbox",
        "locationiq",
        "geoapify",
        "here",
        "tomtom",
    ]
}
