//! Domain types, errors and item validation rules shared by the storage
//! backends and the HTTP layer. Nothing in this crate touches a database.

pub mod error;
pub mod types;
pub mod validation;
