// SPDX-License-Identifier: MIT

//! Street catalog listing (feeds the address form dropdown).

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/streets", get(list_streets))
}

#[derive(Serialize)]
pub struct StreetSummary {
    pub id: String,
    pub name: String,
    pub street_type: String,
}

#[derive(Serialize)]
pub struct StreetsResponse {
    pub success: bool,
    pub data: Vec<StreetSummary>,
}

/// List the curated street catalog ordered by name.
async fn list_streets(State(state): State<Arc<AppState>>) -> Result<Json<StreetsResponse>> {
    let streets = state.db.list_streets().await?;

    let data = streets
        .into_iter()
        .map(|s| StreetSummary {
            id: s.id,
            name: s.name,
            street_type: s.street_type,
        })
        .collect();

    Ok(Json(StreetsResponse {
        success: true,
        data,
    }))
}
