//! Number property repository.

use crate::error::MetadataResult;
use crate::models::NumberRow;
use async_trait::async_trait;
use syracuse_core::NumberKey;

/// Repository for per-number property rows.
#[async_trait]
pub trait NumberRepo: Send + Sync {
    /// Whether a row exists for `key`.
    async fn number_exists(&self, key: NumberKey) -> MetadataResult<bool>;

    /// Get the row for `key`.
    async fn get_number(&self, key: NumberKey) -> MetadataResult<Option<NumberRow>>;

    /// Insert a row unless one already exists for the same number.
    ///
    /// Returns `true` if this call inserted the row and `false` if it was
    /// already present. The existing row is never modified.
    async fn insert_number_if_absent(&self, row: &NumberRow) -> MetadataResult<bool>;

    /// Count stored rows.
    async fn count_numbers(&self) -> MetadataResult<u64>;
}
