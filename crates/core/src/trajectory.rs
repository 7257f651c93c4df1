//! Syracuse trajectories and their textual blob format.
//!
//! A trajectory is stored as UTF-8 text with the terms joined by `", "`,
//! for example `6, 3, 10, 5, 16, 8, 4, 2, 1`. Parsing is lenient about
//! separators: any mix of commas, line feeds and carriage returns is
//! accepted, surrounding whitespace is trimmed and empty tokens are skipped.

use crate::number::NumberKey;
use serde::{Deserialize, Serialize};

/// Separator used when encoding a trajectory.
const ENCODE_SEPARATOR: &str = ", ";

/// Ordered Collatz/Syracuse sequence starting at the subject number.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory(Vec<u64>);

impl Trajectory {
    /// Wrap a sequence of terms. No validation is performed.
    pub fn new(terms: Vec<u64>) -> Self {
        Self(terms)
    }

    /// Parse the stored text representation.
    pub fn parse(text: &str) -> crate::Result<Self> {
        let terms = text
            .split([',', '\n', '\r'])
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<u64>().map_err(|e| {
                    crate::Error::TrajectoryParse(format!("invalid term {token:?}: {e}"))
                })
            })
            .collect::<crate::Result<Vec<_>>>()?;

        if terms.is_empty() {
            return Err(crate::Error::TrajectoryParse(
                "no terms found".to_string(),
            ));
        }

        Ok(Self(terms))
    }

    /// Encode into the stored text representation.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(ENCODE_SEPARATOR)
    }

    /// Check that this trajectory starts at `key` and terminates at 1.
    pub fn validate_for(&self, key: NumberKey) -> crate::Result<()> {
        match (self.0.first(), self.0.last()) {
            (None, _) | (_, None) => Err(crate::Error::InvalidTrajectory(
                "trajectory is empty".to_string(),
            )),
            (Some(&first), _) if first != key.get() => Err(crate::Error::InvalidTrajectory(
                format!("trajectory starts at {first}, expected {key}"),
            )),
            (_, Some(&last)) if last != 1 => Err(crate::Error::InvalidTrajectory(format!(
                "trajectory ends at {last}, expected 1"
            ))),
            _ => Ok(()),
        }
    }

    /// Get the terms.
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the trajectory has no terms.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the raw terms.
    pub fn into_vec(self) -> Vec<u64> {
        self.0
    }
}

impl From<Vec<u64>> for Trajectory {
    fn from(terms: Vec<u64>) -> Self {
        Self(terms)
    }
}
