//! Core domain types and shared logic for the Syracuse number cache.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Number keys, property flags and trajectories
//! - The textual trajectory format stored in the blob backend
//! - Number-theoretic property computation
//! - Configuration shared by the storage, metadata and server crates

pub mod config;
pub mod error;
pub mod number;
pub mod properties;
pub mod trajectory;

pub use error::{Error, Result};
pub use number::{NumberFlags, NumberKey, NumberRecord};
pub use trajectory::Trajectory;
