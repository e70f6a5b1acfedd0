// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (login accounts, keyed by username)
//! - Streets (curated catalog, read-only here)
//! - Addresses (resolved street/number pairs with coordinates)
//! - Patients (registry records, soft-deleted via `active`)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Address, Patient, Street, User};

/// Build the deterministic address document ID for a (street, number) pair.
///
/// House numbers are free text, so the number component is URL-encoded to
/// keep the ID path-safe. Using a derived ID means concurrent creators of
/// the same pair converge on one document instead of duplicating rows.
pub fn address_doc_id(street_id: &str, number: &str) -> String {
    format!("{}_{}", street_id, urlencoding::encode(number))
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by username (the document ID).
    pub async fn get_user(&self, username: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(username)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user, keyed by username.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.username)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Street Operations ───────────────────────────────────────

    /// List the whole street catalog, ordered by display name.
    pub async fn list_streets(&self) -> Result<Vec<Street>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::STREETS)
            .order_by([(
                "name",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a street catalog entry. The API never writes
    /// streets; this exists for the seeding tooling and tests.
    pub async fn upsert_street(&self, street: &Street) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::STREETS)
            .document_id(&street.id)
            .object(street)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a street by ID.
    pub async fn get_street(&self, street_id: &str) -> Result<Option<Street>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::STREETS)
            .obj()
            .one(street_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a street by normalized name OR exact display name.
    ///
    /// If two catalog entries normalize identically the first match wins;
    /// the catalog is curated to avoid that, but no order is guaranteed.
    pub async fn find_street(
        &self,
        normalized_name: &str,
        raw_name: &str,
    ) -> Result<Option<Street>, AppError> {
        let normalized_name = normalized_name.to_string();
        let raw_name = raw_name.to_string();

        let matches: Vec<Street> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::STREETS)
            .filter(move |q| {
                q.for_any([
                    q.field("normalized_name").eq(normalized_name.clone()),
                    q.field("name").eq(raw_name.clone()),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.into_iter().next())
    }

    // ─── Address Operations ──────────────────────────────────────

    /// Get an address by its document ID.
    pub async fn get_address(&self, address_id: &str) -> Result<Option<Address>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ADDRESSES)
            .obj()
            .one(address_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up the address for a (street, number) pair via the derived
    /// document ID.
    pub async fn find_address(
        &self,
        street_id: &str,
        number: &str,
    ) -> Result<Option<Address>, AppError> {
        self.get_address(&address_doc_id(street_id, number)).await
    }

    // ─── Patient Operations ──────────────────────────────────────

    /// Get a patient by ID.
    pub async fn get_patient(&self, patient_id: &str) -> Result<Option<Patient>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PATIENTS)
            .obj()
            .one(patient_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active patients, ordered by name. Soft-deleted rows are kept in
    /// the collection but excluded here.
    pub async fn list_active_patients(&self) -> Result<Vec<Patient>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PATIENTS)
            .filter(|q| q.field("active").eq(true))
            .order_by([(
                "name",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a patient document.
    pub async fn upsert_patient(&self, patient: &Patient) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PATIENTS)
            .document_id(&patient.id)
            .object(patient)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Atomic Patient + Address Write ──────────────────────────

    /// Write a patient and, when the address was newly resolved, its address
    /// document in a single Firestore transaction.
    ///
    /// The original two-step insert could crash between the address and
    /// patient writes and leave an orphaned address; committing both in one
    /// transaction closes that window.
    pub async fn write_patient_with_address(
        &self,
        patient: &Patient,
        new_address: Option<&Address>,
    ) -> Result<(), AppError> {
        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        if let Some(address) = new_address {
            self.get_client()?
                .fluent()
                .update()
                .in_col(collections::ADDRESSES)
                .document_id(&address.id)
                .object(address)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add address to transaction: {}", e))
                })?;
        }

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::PATIENTS)
            .document_id(&patient.id)
            .object(patient)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add patient to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            patient_id = %patient.id,
            address_created = new_address.is_some(),
            "Patient write committed"
        );

        Ok(())
    }
}
