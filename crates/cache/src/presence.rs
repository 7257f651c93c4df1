//! Presence of a key across the two stores.

use std::fmt;

/// Where a key currently has data.
///
/// `BlobOnly` is the benign leftover of a failed metadata write and is
/// completed by the next write. `MetadataOnly` should never be produced by
/// this cache; it is treated like `Absent` by the write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresenceState {
    Absent,
    MetadataOnly,
    BlobOnly,
    Complete,
}

impl PresenceState {
    pub fn from_presence(metadata: bool, blob: bool) -> Self {
        match (metadata, blob) {
            (false, false) => PresenceState::Absent,
            (true, false) => PresenceState::MetadataOnly,
            (false, true) => PresenceState::BlobOnly,
            (true, true) => PresenceState::Complete,
        }
    }

    pub fn is_complete(self) -> bool {
        self == PresenceState::Complete
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PresenceState::Absent => "absent",
            PresenceState::MetadataOnly => "metadata_only",
            PresenceState::BlobOnly => "blob_only",
            PresenceState::Complete => "complete",
        }
    }
}

impl fmt::Display for PresenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
