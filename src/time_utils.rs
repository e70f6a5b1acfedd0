// SPDX-License-Identifier: MIT

//! Shared helpers for date formatting.
//!
//! The API presents visit dates as `dd/mm/yyyy`; storage uses ISO
//! `yyyy-mm-dd` (chrono's `NaiveDate` serialization).

use chrono::NaiveDate;

/// Parse a `dd/mm/yyyy` date from a form field.
pub fn parse_display_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y").ok()
}

/// Render a stored date back into the `dd/mm/yyyy` presentation format.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
