//! HTTP API server for the Syracuse number cache.
//!
//! This crate provides:
//! - Read-through calculation (`/v1/calculate`)
//! - Direct record reads, writes and presence probes (`/v1/numbers`)
//! - Health and Prometheus endpoints

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
