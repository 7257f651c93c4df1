//! Database models mapping to the metadata schema.

use crate::error::{MetadataError, MetadataResult};
use sqlx::FromRow;
use syracuse_core::{NumberFlags, NumberKey};
use time::OffsetDateTime;

/// One row of the `numbers` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct NumberRow {
    pub number: i64,
    pub is_even: bool,
    pub is_prime: bool,
    pub is_perfect: bool,
    pub created_at: OffsetDateTime,
}

impl NumberRow {
    /// Build a row stamped with the current time.
    pub fn new(key: NumberKey, flags: NumberFlags) -> Self {
        Self {
            number: key.as_i64(),
            is_even: flags.is_even,
            is_prime: flags.is_prime,
            is_perfect: flags.is_perfect,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn key(&self) -> MetadataResult<NumberKey> {
        NumberKey::from_i64(self.number)
            .map_err(|e| MetadataError::Internal(format!("stored number is invalid: {e}")))
    }

    pub fn flags(&self) -> NumberFlags {
        NumberFlags {
            is_even: self.is_even,
            is_prime: self.is_prime,
            is_perfect: self.is_perfect,
        }
    }
}
