use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, ClusterResult};

/// One caller-owned scatter sample in data space.
///
/// The index of a point inside the input slice is its stable identity for
/// one clustering pass; the engine carries index references only and never
/// mutates caller data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn ensure_finite(self, index: usize) -> ClusterResult<Self> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ClusterError::InvalidData(format!(
                "point {index} coordinates must be finite"
            )));
        }
        Ok(self)
    }
}
