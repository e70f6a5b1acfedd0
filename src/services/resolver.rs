// SPDX-License-Identifier: MIT

//! Address resolution: normalize a street name, find or build the address
//! record for a (street, number) pair, geocoding it when it has never been
//! seen before.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::db::{address_doc_id, FirestoreDb};
use crate::error::AppError;
use crate::geo_utils::{decimal_to_dms, is_within_service_area};
use crate::models::Address;
use crate::services::geocoding::GeocodingClient;

/// Normalize a free-text street name into its lookup key: lowercase,
/// NFD-decomposed with combining marks stripped, whitespace collapsed.
///
/// Names differing only by case, accents or spacing map to the same key.
pub fn normalize_street_name(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Outcome of address resolution. When `newly_created` is set the address
/// has NOT been persisted yet; the caller commits it together with the
/// patient write.
#[derive(Debug, Clone)]
pub struct ResolvedAddress {
    pub address: Address,
    pub newly_created: bool,
}

/// Resolves free-text street/number input against the street catalog and
/// the stored addresses, falling back to geocoding for unseen pairs.
#[derive(Clone)]
pub struct AddressResolver {
    db: FirestoreDb,
    geocoder: GeocodingClient,
}

impl AddressResolver {
    pub fn new(db: FirestoreDb, geocoder: GeocodingClient) -> Self {
        Self { db, geocoder }
    }

    /// Resolve a (street, number) pair to an address record.
    ///
    /// 1. Find the street by normalized OR exact name (the catalog is
    ///    curated externally; unknown streets are a NotFound error).
    /// 2. Reuse the stored address for the pair if one exists. The geocoder
    ///    is not called in that case.
    /// 3. Otherwise geocode the pair and validate the coordinates against
    ///    the service-area bounding box.
    pub async fn resolve(
        &self,
        street_text: &str,
        number: &str,
        complement: Option<&str>,
    ) -> Result<ResolvedAddress, AppError> {
        let normalized = normalize_street_name(street_text);
        tracing::debug!(street = %street_text, normalized = %normalized, "Resolving street");

        let street = self
            .db
            .find_street(&normalized, street_text)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Street not in the catalog: {}", street_text))
            })?;

        if let Some(existing) = self.db.find_address(&street.id, number).await? {
            tracing::debug!(
                address_id = %existing.id,
                street = %street.name,
                number = %number,
                "Reusing stored address"
            );
            return Ok(ResolvedAddress {
                address: existing,
                newly_created: false,
            });
        }

        tracing::info!(
            street = %street.name,
            number = %number,
            "Address not seen before, geocoding"
        );

        let candidate = self
            .geocoder
            .geocode(&street.name, number)
            .await?
            .ok_or_else(|| {
                AppError::Geocoding(format!(
                    "No coordinates found for \"{}, {}\"",
                    street.name, number
                ))
            })?;

        if !is_within_service_area(candidate.latitude, candidate.longitude) {
            tracing::warn!(
                lat = candidate.latitude,
                lng = candidate.longitude,
                street = %street.name,
                number = %number,
                "Geocoded coordinates outside the service area"
            );
            return Err(AppError::Geocoding(format!(
                "Coordinates for \"{}, {}\" fall outside the serviced area",
                street.name, number
            )));
        }

        let id = address_doc_id(&street.id, number);
        let address = Address {
            id,
            street_id: street.id,
            number: number.to_string(),
            complement: complement.map(|c| c.to_string()),
            latitude: candidate.latitude,
            longitude: candidate.longitude,
            dms: decimal_to_dms(candidate.latitude, candidate.longitude),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        Ok(ResolvedAddress {
            address,
            newly_created: true,
        })
    }
}
