//! Grocerific API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, demo
//! sessions) so integration tests and the binary entrypoint share them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod sessions;
pub mod state;
