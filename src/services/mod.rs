// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod geocoding;
pub mod resolver;

pub use geocoding::{GeocodeResult, GeocodingClient};
pub use resolver::{normalize_street_name, AddressResolver, ResolvedAddress};
