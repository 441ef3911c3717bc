//! Request handlers.
//!
//! Handlers take an already-resolved store and map results to the response
//! envelope via [`crate::error::AppError`].

pub mod items;
