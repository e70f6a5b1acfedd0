// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::{address_doc_id, FirestoreDb};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const STREETS: &str = "streets";
    pub const ADDRESSES: &str = "addresses";
    pub const PATIENTS: &str = "patients";
}
