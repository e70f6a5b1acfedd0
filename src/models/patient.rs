// SPDX-License-Identifier: MIT

//! Patient model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Patient record referencing a resolved address.
///
/// Removal is a soft delete: `active` is cleared and the row is retained.
/// Only active patients appear in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub address_id: String,
    /// Stored as `yyyy-mm-dd`; rendered `dd/mm/yyyy` at the API boundary
    pub last_visit: NaiveDate,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}
