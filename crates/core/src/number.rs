//! Number keys, property flags and the combined record.

use crate::trajectory::Trajectory;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The subject integer of a cached record.
///
/// Always strictly positive and representable as a signed 64-bit integer,
/// since the metadata backends store it in a `BIGINT` column.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct NumberKey(u64);

impl NumberKey {
    /// Largest accepted key.
    pub const MAX: u64 = i64::MAX as u64;

    /// Create a key, rejecting zero and values beyond `i64::MAX`.
    pub fn new(value: u64) -> crate::Result<Self> {
        if value == 0 {
            return Err(crate::Error::InvalidNumber(
                "number must be strictly positive".to_string(),
            ));
        }
        if value > Self::MAX {
            return Err(crate::Error::InvalidNumber(format!(
                "number {value} exceeds maximum {}",
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    /// Create a key from a signed database value.
    pub fn from_i64(value: i64) -> crate::Result<Self> {
        let value = u64::try_from(value)
            .map_err(|_| crate::Error::InvalidNumber(format!("negative number: {value}")))?;
        Self::new(value)
    }

    /// Get the raw value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Get the value as stored in the metadata backends.
    pub fn as_i64(self) -> i64 {
        // Bounded by MAX at construction.
        self.0 as i64
    }

    /// Get the object store key holding this number's trajectory.
    pub fn to_object_key(self) -> String {
        format!("{}.txt", self.0)
    }
}

impl TryFrom<u64> for NumberKey {
    type Error = crate::Error;

    fn try_from(value: u64) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl From<NumberKey> for u64 {
    fn from(key: NumberKey) -> Self {
        key.0
    }
}

impl FromStr for NumberKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let value = s
            .trim()
            .parse::<u64>()
            .map_err(|e| crate::Error::InvalidNumber(format!("{s:?}: {e}")))?;
        Self::new(value)
    }
}

impl fmt::Debug for NumberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NumberKey({})", self.0)
    }
}

impl fmt::Display for NumberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Boolean properties stored in the metadata backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberFlags {
    pub is_even: bool,
    pub is_prime: bool,
    pub is_perfect: bool,
}

/// Everything known about one integer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberRecord {
    pub key: NumberKey,
    pub flags: NumberFlags,
    pub trajectory: Trajectory,
}

impl NumberRecord {
    /// Create a record, checking that the trajectory belongs to `key`.
    pub fn new(key: NumberKey, flags: NumberFlags, trajectory: Trajectory) -> crate::Result<Self> {
        trajectory.validate_for(key)?;
        Ok(Self {
            key,
            flags,
            trajectory,
        })
    }
}
