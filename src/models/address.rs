// SPDX-License-Identifier: MIT

//! Address model.

use serde::{Deserialize, Serialize};

/// Resolved (street, number) pair with geocoded coordinates.
///
/// The document ID is derived from `(street_id, number)` so a pair maps to
/// exactly one document. Created lazily the first time a patient references
/// it; never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Same as the document ID
    pub id: String,
    pub street_id: String,
    /// House number, kept as free text ("100", "1520B")
    pub number: String,
    pub complement: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Derived degrees-minutes-seconds rendering of the coordinates
    pub dms: String,
    pub created_at: String,
}
