// SPDX-License-Identifier: MIT

//! Patient-Registry API Server
//!
//! Backend for the community health post patient registry: login, patient
//! CRUD against a curated street catalog, and geocoding of new addresses
//! via Geoapify.

use patient_registry::{
    config::Config,
    db::FirestoreDb,
    services::{AddressResolver, GeocodingClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Patient-Registry API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize geocoding client and address resolver
    let geocoder = GeocodingClient::new(config.geoapify_api_key.clone());
    let resolver = AddressResolver::new(db.clone(), geocoder);
    tracing::info!("Address resolver initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        resolver,
    });

    // Build router
    let app = patient_registry::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patient_registry=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
