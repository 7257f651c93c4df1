//! Merging the two store responses into one read result.

use syracuse_core::{NumberFlags, NumberKey, NumberRecord, Trajectory};

/// Result of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Found(NumberRecord),
    NotFound,
}

impl ReadOutcome {
    pub fn into_record(self) -> Option<NumberRecord> {
        match self {
            ReadOutcome::Found(record) => Some(record),
            ReadOutcome::NotFound => None,
        }
    }
}

/// Combine the metadata flags and the blob trajectory for `key`.
///
/// A record is only found when both halves are present and the trajectory
/// actually belongs to `key`. Any partial state reads as a miss.
pub fn assemble(
    key: NumberKey,
    flags: Option<NumberFlags>,
    trajectory: Option<Trajectory>,
) -> ReadOutcome {
    match (flags, trajectory) {
        (Some(flags), Some(trajectory)) => NumberRecord::new(key, flags, trajectory)
            .map(ReadOutcome::Found)
            .unwrap_or(ReadOutcome::NotFound),
        _ => ReadOutcome::NotFound,
    }
}
