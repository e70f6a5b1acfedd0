// SPDX-License-Identifier: MIT

//! Geoapify geocoding API client.
//!
//! Handles:
//! - Forward geocoding of a full street address
//! - A single broader fallback query when the full address yields nothing
//!
//! One best-effort attempt per call site: no backoff, no rate-limit
//! handling. Transport and HTTP failures surface as upstream-API errors.

use crate::error::AppError;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.geoapify.com/v1/geocode/search";

// Fixed address context for the serviced neighborhood.
const NEIGHBORHOOD: &str = "Passo das Pedras";
const CITY: &str = "Porto Alegre";
const STATE: &str = "RS";
const COUNTRY: &str = "Brasil";

/// Geoapify geocoding client.
#[derive(Clone)]
pub struct GeocodingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// A geocoded coordinate candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: Option<String>,
}

impl GeocodingClient {
    /// Create a new client with an API key.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a client against a non-default endpoint (tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Geocode a (street, number) pair within the fixed neighborhood
    /// context. Returns the first candidate's coordinates, retrying once
    /// with a broader query (no house number) when the full address yields
    /// no features.
    pub async fn geocode(
        &self,
        street: &str,
        number: &str,
    ) -> Result<Option<GeocodeResult>, AppError> {
        let full_address = format!(
            "{}, {}, {}, {} - {}, {}",
            street, number, NEIGHBORHOOD, CITY, STATE, COUNTRY
        );

        tracing::debug!(address = %full_address, "Geocoding address");

        if let Some(result) = self.search(&full_address).await? {
            tracing::debug!(
                lat = result.latitude,
                lng = result.longitude,
                "Geocoding hit on full address"
            );
            return Ok(Some(result));
        }

        // Fallback: broader query without the house number
        let broad_address = format!(
            "{}, {}, {}, {}, {}",
            street, NEIGHBORHOOD, CITY, STATE, COUNTRY
        );

        tracing::warn!(
            address = %full_address,
            fallback = %broad_address,
            "No geocoding result, retrying with broader query"
        );

        self.search(&broad_address).await
    }

    /// Single forward-geocoding request.
    async fn search(&self, text: &str) -> Result<Option<GeocodeResult>, AppError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("text", text),
                ("apiKey", self.api_key.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|e| AppError::GeocodingApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GeocodingApi(format!("HTTP {}: {}", status, body)));
        }

        let data: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| AppError::GeocodingApi(format!("JSON parse error: {}", e)))?;

        Ok(first_candidate(data))
    }
}

/// Extract the first feature's coordinates. Geoapify returns GeoJSON-style
/// `[longitude, latitude]` pairs.
fn first_candidate(response: GeocodeResponse) -> Option<GeocodeResult> {
    let feature = response.features.into_iter().next()?;
    let coords = feature.geometry.coordinates;
    if coords.len() < 2 {
        return None;
    }

    Some(GeocodeResult {
        latitude: coords[1],
        longitude: coords[0],
        display_name: feature.properties.and_then(|p| p.formatted),
    })
}

/// Geoapify search response (feature list).
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    geometry: FeatureGeometry,
    properties: Option<FeatureProperties>,
}

#[derive(Debug, Deserialize)]
struct FeatureGeometry {
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    formatted: Option<String>,
}
