//! Repository traits for metadata operations.

pub mod numbers;

pub use numbers::NumberRepo;
