//! The read-through / write-through cache engine.
//!
//! A record is split across two stores: flags in the metadata store and the
//! trajectory in the blob store. There is no cross-store transaction. Writes
//! go blob first, metadata second, so the only partial state a failure can
//! leave behind is `BlobOnly`, which reads as a miss and is completed by the
//! next write. Cross-request races are settled by the metadata primary key.

use crate::assembler::{ReadOutcome, assemble};
use crate::error::{Backend, CacheError, CacheResult};
use crate::presence::PresenceState;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use syracuse_core::{NumberKey, NumberRecord, Trajectory};
use syracuse_metadata::{MetadataError, MetadataStore, NumberRow};
use syracuse_storage::{StorageError, TrajectoryStore};
use tracing::{debug, info, instrument, warn};

/// Result of a cache write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOutcome {
    /// This call completed the record.
    Stored,
    /// The record was already complete, or a concurrent writer won.
    AlreadyCached,
}

impl WriteOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            WriteOutcome::Stored => "stored",
            WriteOutcome::AlreadyCached => "already_cached",
        }
    }
}

/// A record returned by [`CacheCoordinator::get_or_compute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub record: NumberRecord,
    /// Whether the record was served from the stores rather than computed.
    pub cached: bool,
}

/// Coordinates reads and writes across the metadata and blob stores.
#[derive(Clone)]
pub struct CacheCoordinator {
    metadata: Arc<dyn MetadataStore>,
    blobs: TrajectoryStore,
    timeout: Duration,
}

impl CacheCoordinator {
    /// `timeout` bounds every individual backend call.
    pub fn new(metadata: Arc<dyn MetadataStore>, blobs: TrajectoryStore, timeout: Duration) -> Self {
        Self {
            metadata,
            blobs,
            timeout,
        }
    }

    pub fn metadata(&self) -> &Arc<dyn MetadataStore> {
        &self.metadata
    }

    pub fn blobs(&self) -> &TrajectoryStore {
        &self.blobs
    }

    /// Run a lookup under the timeout; failures and timeouts are `StoreUnavailable`.
    async fn lookup<T, E>(
        &self,
        backend: Backend,
        call: impl Future<Output = Result<T, E>>,
    ) -> CacheResult<T>
    where
        E: std::fmt::Display,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(backend = %backend, error = %e, "backend lookup failed");
                Err(CacheError::unavailable(backend, e))
            }
            Err(_) => {
                warn!(backend = %backend, timeout_ms = self.timeout.as_millis() as u64, "backend lookup timed out");
                Err(CacheError::unavailable(
                    backend,
                    format!("timed out after {}ms", self.timeout.as_millis()),
                ))
            }
        }
    }

    /// Read and decode the blob for `key`. Missing or malformed is `None`.
    async fn read_blob(&self, key: NumberKey) -> CacheResult<Option<Trajectory>> {
        self.lookup(Backend::Blob, async {
            match self.blobs.get(key).await {
                Ok(trajectory) => Ok(Some(trajectory)),
                Err(StorageError::NotFound(_)) => Ok(None),
                Err(StorageError::Malformed { key: object, reason }) => {
                    warn!(object = %object, reason = %reason, "malformed trajectory blob, treating as miss");
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Probe both stores concurrently without reading any content.
    #[instrument(skip(self), fields(number = %key))]
    pub async fn presence(&self, key: NumberKey) -> CacheResult<PresenceState> {
        let (metadata, blob) = tokio::join!(
            self.lookup(Backend::Metadata, self.metadata.number_exists(key)),
            self.lookup(Backend::Blob, self.blobs.exists(key)),
        );
        Ok(PresenceState::from_presence(metadata?, blob?))
    }

    /// Read a complete record. Any partial or malformed state is a miss.
    #[instrument(skip(self), fields(number = %key))]
    pub async fn read_record(&self, key: NumberKey) -> CacheResult<ReadOutcome> {
        let row = self
            .lookup(Backend::Metadata, self.metadata.get_number(key))
            .await?;
        let Some(row) = row else {
            debug!("metadata miss");
            return Ok(ReadOutcome::NotFound);
        };

        let trajectory = self.read_blob(key).await?;
        if trajectory.is_none() {
            debug!("metadata present without a usable blob");
        }

        Ok(assemble(key, Some(row.flags()), trajectory))
    }

    /// Store a record unless it is already complete.
    ///
    /// Writes the blob first and the metadata row second. A failed metadata
    /// write leaves the blob in place; it is not rolled back.
    #[instrument(skip(self, record), fields(number = %record.key))]
    pub async fn write_record(&self, record: &NumberRecord) -> CacheResult<WriteOutcome> {
        let key = record.key;
        record
            .trajectory
            .validate_for(key)
            .map_err(|e| CacheError::InvalidRecord(e.to_string()))?;

        let state = self.presence(key).await?;
        // Both objects existing is not enough: the blob must also decode.
        let repairing = state.is_complete() && self.read_blob(key).await?.is_none();
        if state.is_complete() && !repairing {
            debug!("record already complete, skipping write");
            return Ok(WriteOutcome::AlreadyCached);
        }
        if repairing {
            warn!("metadata present but blob unreadable, rewriting blob");
        }

        match tokio::time::timeout(self.timeout, self.blobs.put(key, &record.trajectory)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(stage = "blob", error = %e, "write failed");
                return Err(CacheError::write_failed(Backend::Blob, e));
            }
            Err(_) => {
                warn!(stage = "blob", "write timed out");
                return Err(CacheError::write_failed(Backend::Blob, "timed out"));
            }
        }

        let row = NumberRow::new(key, record.flags);
        let inserted =
            match tokio::time::timeout(self.timeout, self.metadata.insert_number_if_absent(&row))
                .await
            {
                Ok(Ok(inserted)) => inserted,
                // A concurrent writer got past the existence check first.
                Ok(Err(MetadataError::Constraint(_))) => false,
                Ok(Err(e)) => {
                    warn!(stage = "metadata", error = %e, "write failed, blob left behind");
                    return Err(CacheError::write_failed(Backend::Metadata, e));
                }
                Err(_) => {
                    warn!(stage = "metadata", "write timed out, blob left behind");
                    return Err(CacheError::write_failed(Backend::Metadata, "timed out"));
                }
            };

        let outcome = if inserted || repairing || state == PresenceState::MetadataOnly {
            WriteOutcome::Stored
        } else {
            WriteOutcome::AlreadyCached
        };
        info!(previous = %state, outcome = outcome.as_str(), "record written");
        Ok(outcome)
    }

    /// Serve `key` from the stores, or compute it, store it and return it.
    ///
    /// The computation runs only on a miss. A store failure after computing
    /// is returned as an error rather than hidden.
    #[instrument(skip(self, compute), fields(number = %key))]
    pub async fn get_or_compute<F>(&self, key: NumberKey, compute: F) -> CacheResult<Lookup>
    where
        F: FnOnce(NumberKey) -> syracuse_core::Result<NumberRecord>,
    {
        if let ReadOutcome::Found(record) = self.read_record(key).await? {
            return Ok(Lookup {
                record,
                cached: true,
            });
        }

        let record = compute(key)?;
        if record.key != key {
            return Err(CacheError::InvalidRecord(format!(
                "computed record is for {}, expected {key}",
                record.key
            )));
        }
        self.write_record(&record).await?;
        Ok(Lookup {
            record,
            cached: false,
        })
    }
}
