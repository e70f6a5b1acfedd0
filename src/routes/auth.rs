// SPDX-License-Identifier: MIT

//! Login and account-creation routes.
//!
//! Sessions are server-issued JWTs rather than browser-local state; the
//! token returned here is validated by the auth middleware on every
//! protected route.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::User;
use crate::AppState;

/// Bcrypt cost matching the stored hashes.
const BCRYPT_COST: u32 = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub data: SessionUser,
    pub token: String,
}

/// Verify credentials, update last access, issue a session token.
///
/// Unknown username and wrong password return the same generic 401.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let mut user = state
        .db
        .get_user(body.username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = bcrypt::verify(&body.password, &user.password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password verification failed: {}", e)))?;

    if !valid {
        tracing::info!(username = %user.username, "Rejected login attempt");
        return Err(AppError::Unauthorized);
    }

    // Record the successful login
    user.last_access = Some(chrono::Utc::now().to_rfc3339());
    state.db.upsert_user(&user).await?;

    let token = create_jwt(&user.username, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(username = %user.username, "Login successful");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        data: SessionUser {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
        },
        token,
    }))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub data: RegisteredUser,
}

#[derive(Serialize)]
pub struct RegisteredUser {
    pub username: String,
}

/// Create a new registry user with a bcrypt-hashed password.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    let username = body.username.trim().to_string();

    if username.is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    if state.db.get_user(&username).await?.is_some() {
        return Err(AppError::Conflict("This username already exists".to_string()));
    }

    let password_hash = bcrypt::hash(&body.password, BCRYPT_COST)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: username.clone(),
        password_hash,
        full_name: body.full_name,
        created_at: chrono::Utc::now().to_rfc3339(),
        last_access: None,
    };

    state.db.upsert_user(&user).await?;

    tracing::info!(username = %username, "User created");

    Ok(Json(RegisterResponse {
        success: true,
        message: "User created successfully".to_string(),
        data: RegisteredUser { username },
    }))
}
