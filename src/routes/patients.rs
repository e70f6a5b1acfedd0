// SPDX-License-Identifier: MIT

//! Patient CRUD routes (require authentication).

use axum::{
    extract::{Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::Patient;
use crate::time_utils::{format_display_date, parse_display_date};
use crate::AppState;

const MAX_CONCURRENT_DB_OPS: usize = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/patients", get(list_patients))
        .route("/api/patients", post(create_patient))
        .route("/api/patients", put(update_patient))
        .route("/api/patients", delete(remove_patient))
}

// ─── Listing ─────────────────────────────────────────────────

/// One row of the patient listing, joined with its address and street and
/// carrying the coordinates the map markers use.
#[derive(Serialize, Clone, Debug)]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub street: String,
    pub number: String,
    /// Rendered dd/mm/yyyy
    pub last_visit: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Serialize)]
pub struct PatientsResponse {
    pub success: bool,
    pub data: Vec<PatientSummary>,
}

/// List active patients ordered by name. Soft-deleted patients are
/// excluded.
async fn list_patients(State(state): State<Arc<AppState>>) -> Result<Json<PatientsResponse>> {
    let patients = state.db.list_active_patients().await?;

    tracing::debug!(count = patients.len(), "Listing active patients");

    // Resolve each patient's address and street with bounded concurrency.
    // `buffered` keeps the name ordering from the query.
    let db = state.db.clone();
    let results: Vec<Result<PatientSummary>> = stream::iter(patients)
        .map(|patient| {
            let db = db.clone();
            async move { summarize_patient(&db, patient).await }
        })
        .buffered(MAX_CONCURRENT_DB_OPS)
        .collect()
        .await;

    let data = results.into_iter().collect::<Result<Vec<_>>>()?;

    Ok(Json(PatientsResponse {
        success: true,
        data,
    }))
}

async fn summarize_patient(db: &FirestoreDb, patient: Patient) -> Result<PatientSummary> {
    let address = db.get_address(&patient.address_id).await?.ok_or_else(|| {
        AppError::Database(format!(
            "Missing address {} for patient {}",
            patient.address_id, patient.id
        ))
    })?;

    let street = db.get_street(&address.street_id).await?.ok_or_else(|| {
        AppError::Database(format!(
            "Missing street {} for address {}",
            address.street_id, address.id
        ))
    })?;

    Ok(PatientSummary {
        id: patient.id,
        name: patient.name,
        street: street.name,
        number: address.number,
        last_visit: format_display_date(patient.last_visit),
        lat: address.latitude,
        lng: address.longitude,
    })
}

// ─── Create / Update ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct PatientForm {
    /// Present on update only
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    /// Free-text street name, matched against the catalog
    #[serde(default)]
    street: String,
    #[serde(default)]
    number: String,
    #[serde(default)]
    complement: Option<String>,
    /// dd/mm/yyyy
    #[serde(default)]
    last_visit: String,
}

#[derive(Serialize)]
pub struct PatientWriteResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

fn validate_form(form: &PatientForm) -> Result<chrono::NaiveDate> {
    if form.name.trim().is_empty()
        || form.street.trim().is_empty()
        || form.number.trim().is_empty()
        || form.last_visit.trim().is_empty()
    {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    parse_display_date(&form.last_visit).ok_or_else(|| {
        AppError::BadRequest("Invalid last visit date: expected dd/mm/yyyy".to_string())
    })
}

/// Register a new patient, resolving (and if needed geocoding) its address.
/// The address and patient writes commit in one transaction.
async fn create_patient(
    State(state): State<Arc<AppState>>,
    Json(form): Json<PatientForm>,
) -> Result<Json<PatientWriteResponse>> {
    let last_visit = validate_form(&form)?;

    let resolved = state
        .resolver
        .resolve(form.street.trim(), form.number.trim(), form.complement.as_deref())
        .await?;

    let now = chrono::Utc::now().to_rfc3339();
    let patient = Patient {
        id: uuid::Uuid::new_v4().to_string(),
        name: form.name.trim().to_string(),
        address_id: resolved.address.id.clone(),
        last_visit,
        active: true,
        created_at: now.clone(),
        updated_at: now,
    };

    let new_address = resolved.newly_created.then_some(&resolved.address);
    state
        .db
        .write_patient_with_address(&patient, new_address)
        .await?;

    tracing::info!(patient_id = %patient.id, "Patient registered");

    Ok(Json(PatientWriteResponse {
        success: true,
        message: "Patient registered successfully".to_string(),
        id: Some(patient.id),
    }))
}

/// Update an existing patient, re-resolving its address from the form.
async fn update_patient(
    State(state): State<Arc<AppState>>,
    Json(form): Json<PatientForm>,
) -> Result<Json<PatientWriteResponse>> {
    let patient_id = form
        .id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Patient id is required".to_string()))?
        .to_string();

    let last_visit = validate_form(&form)?;

    let mut patient = state
        .db
        .get_patient(&patient_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Patient {} not found", patient_id)))?;

    let resolved = state
        .resolver
        .resolve(form.street.trim(), form.number.trim(), form.complement.as_deref())
        .await?;

    patient.name = form.name.trim().to_string();
    patient.address_id = resolved.address.id.clone();
    patient.last_visit = last_visit;
    patient.updated_at = chrono::Utc::now().to_rfc3339();

    let new_address = resolved.newly_created.then_some(&resolved.address);
    state
        .db
        .write_patient_with_address(&patient, new_address)
        .await?;

    tracing::info!(patient_id = %patient.id, "Patient updated");

    Ok(Json(PatientWriteResponse {
        success: true,
        message: "Patient updated successfully".to_string(),
        id: None,
    }))
}

// ─── Soft Delete ─────────────────────────────────────────────

#[derive(Deserialize)]
struct RemoveParams {
    #[serde(default)]
    id: Option<String>,
}

/// Soft-delete a patient: the row is kept, only the active flag is
/// cleared, so it drops out of the listing but retains history.
async fn remove_patient(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RemoveParams>,
) -> Result<Json<PatientWriteResponse>> {
    let patient_id = params
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Patient id is required".to_string()))?;

    let mut patient = state
        .db
        .get_patient(&patient_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Patient {} not found", patient_id)))?;

    patient.active = false;
    patient.updated_at = chrono::Utc::now().to_rfc3339();
    state.db.upsert_patient(&patient).await?;

    tracing::info!(patient_id = %patient.id, "Patient soft-deleted");

    Ok(Json(PatientWriteResponse {
        success: true,
        message: "Patient removed successfully".to_string(),
        id: None,
    }))
}
