//! HTTP request handlers.

pub mod calculate;
pub mod health;
pub mod numbers;

pub use calculate::calculate;
pub use health::health_check;
pub use numbers::{NumberDto, get_number, get_presence, store_number};
