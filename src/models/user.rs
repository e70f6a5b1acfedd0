// SPDX-License-Identifier: MIT

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Registry user stored in Firestore (document ID is the username, which
/// enforces uniqueness by key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable record id
    pub id: String,
    /// Login name (also the document ID)
    pub username: String,
    /// Bcrypt hash of the password
    pub password_hash: String,
    /// Display name
    pub full_name: Option<String>,
    /// When the account was created
    pub created_at: String,
    /// Last successful login (RFC3339), None until the first login
    pub last_access: Option<String>,
}
