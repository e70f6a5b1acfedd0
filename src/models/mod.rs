// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod address;
pub mod patient;
pub mod street;
pub mod user;

pub use address::Address;
pub use patient::Patient;
pub use street::Street;
pub use user::User;
