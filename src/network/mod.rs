//! HTTP layer for talking to geocoding providers

mod client;

pub use client::{Fetched, HttpClient};
