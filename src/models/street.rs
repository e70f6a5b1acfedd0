// SPDX-License-Identifier: MIT

//! Street catalog model.

use serde::{Deserialize, Serialize};

/// Street from the externally curated catalog. Never created by this
/// service; seeded out of band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Street {
    pub id: String,
    /// Display name, e.g. "Rua São João"
    pub name: String,
    /// Lookup key: lowercase, diacritic-free, whitespace-collapsed
    pub normalized_name: String,
    /// Thoroughfare type (rua, avenida, travessa, ...)
    pub street_type: String,
}
