// SPDX-License-Identifier: MIT

//! Service-area validation and coordinate formatting.

use geo::{coord, Rect};

/// Bounding box of the serviced municipality (Porto Alegre/RS).
/// Geocoded results outside this box are rejected.
pub fn service_area() -> Rect<f64> {
    // x = longitude, y = latitude
    Rect::new(coord! { x: -51.3, y: -30.2 }, coord! { x: -51.0, y: -29.9 })
}

/// Check whether a coordinate falls inside the service area (inclusive on
/// the boundary).
pub fn is_within_service_area(lat: f64, lng: f64) -> bool {
    let area = service_area();
    let (min, max) = (area.min(), area.max());
    lat >= min.y && lat <= max.y && lng >= min.x && lng <= max.x
}

/// Format a decimal coordinate pair as degrees-minutes-seconds, e.g.
/// `30°03'25.2"S 51°09'32.4"W`. Seconds are kept to one decimal.
pub fn decimal_to_dms(lat: f64, lng: f64) -> String {
    format!(
        "{} {}",
        dms_component(lat, 'N', 'S'),
        dms_component(lng, 'E', 'W')
    )
}

fn dms_component(value: f64, positive: char, negative: char) -> String {
    let abs = value.abs();
    let degrees = abs.floor();
    let minutes = ((abs - degrees) * 60.0).floor();
    let seconds = (abs - degrees - minutes / 60.0) * 3600.0;
    let direction = if value >= 0.0 { positive } else { negative };

    format!(
        "{}°{:02}'{:.1}\"{}",
        degrees as u32, minutes as u32, seconds, direction
    )
}
