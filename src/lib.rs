// SPDX-License-Identifier: MIT

//! Patient-Registry: backend API for a neighborhood health post.
//!
//! This crate provides the backend API for registering patients against a
//! curated street catalog, geocoding newly seen addresses and serving the
//! data the map UI consumes.

pub mod config;
pub mod db;
pub mod error;
pub mod geo_utils;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::AddressResolver;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub resolver: AddressResolver,
}
