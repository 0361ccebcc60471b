//! External geocoding service client.
//!
//! Resolves a free-form postal address to coordinates. The service is an
//! opaque collaborator: it either returns a coordinate pair or the whole
//! operation fails, and a failure always happens before any database
//! write.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::GeocodingConfig;
use crate::error::{AppError, AppResult};

/// A resolved coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Trait for address-to-coordinates resolution.
///
/// Uses `async_trait` to support async methods with dynamic dispatch, so
/// services can hold a test double in place of the HTTP client.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves an address to coordinates.
    ///
    /// # Errors
    /// `AppError::Geocoding` when the service is unreachable, answers with
    /// an error, or finds no match for the address.
    async fn resolve(&self, address: &str) -> AppResult<Location>;
}

/// One entry of a Nominatim search response.
#[derive(Debug, Deserialize)]
struct NominatimEntry {
    lat: String,
    lon: String,
}

/// Geocoder implementation backed by the OpenStreetMap Nominatim API.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Creates a new geocoder from configuration.
    ///
    /// # Errors
    /// `AppError::Configuration` if the HTTP client cannot be constructed.
    pub fn new(config: &GeocodingConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .connect_timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("atlas-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Configuration {
                key: "geocoding".to_string(),
                source: anyhow::anyhow!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn geocoding_error(address: &str, source: anyhow::Error) -> AppError {
        AppError::Geocoding {
            address: address.to_string(),
            source,
        }
    }
}

/// Picks the best match out of a Nominatim response body.
fn parse_search_response(entries: Vec<NominatimEntry>) -> Option<Location> {
    let entry = entries.into_iter().next()?;
    let lat = entry.lat.parse().ok()?;
    let lng = entry.lon.parse().ok()?;
    Some(Location { lat, lng })
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, address: &str) -> AppResult<Location> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| Self::geocoding_error(address, anyhow::anyhow!("request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| {
                Self::geocoding_error(address, anyhow::anyhow!("service answered with error: {}", e))
            })?;

        let entries: Vec<NominatimEntry> = response.json().await.map_err(|e| {
            Self::geocoding_error(address, anyhow::anyhow!("unparseable response: {}", e))
        })?;

        parse_search_response(entries).ok_or_else(|| {
            Self::geocoding_error(address, anyhow::anyhow!("no match for address"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_entry_of_a_response() {
        let entries: Vec<NominatimEntry> = serde_json::from_str(
            r#"[
                {"lat": "40.7484", "lon": "-73.9857", "display_name": "Empire State Building"},
                {"lat": "0.0", "lon": "0.0", "display_name": "decoy"}
            ]"#,
        )
        .unwrap();

        let location = parse_search_response(entries).expect("should parse");
        assert_eq!(location.lat, 40.7484);
        assert_eq!(location.lng, -73.9857);
    }

    #[test]
    fn empty_response_yields_no_location() {
        assert_eq!(parse_search_response(vec![]), None);
    }

    #[test]
    fn non_numeric_coordinates_yield_no_location() {
        let entries = vec![NominatimEntry {
            lat: "north-ish".to_string(),
            lon: "-73.9857".to_string(),
        }];
        assert_eq!(parse_search_response(entries), None);
    }

    #[test]
    fn client_builds_from_default_config() {
        let geocoder = NominatimGeocoder::new(&GeocodingConfig::default());
        assert!(geocoder.is_ok());
        assert_eq!(
            geocoder.unwrap().base_url,
            "https://nominatim.openstreetmap.org"
        );
    }
}
