use serde::{Deserialize, Serialize};

use crate::cluster::grid::CellKey;
use crate::cluster::options::ClusterMarkerStyle;
use crate::error::{ClusterError, ClusterResult};

/// Tag distinguishing how a rendering collaborator should format an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatPrefix {
    Cluster,
    Point,
}

/// Rendering metadata for one emitted output entry, parallel to the grouped
/// coordinate arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMapEntry {
    pub format_prefix: FormatPrefix,
    /// Member count behind the entry; 1 for noise points.
    pub member_count: usize,
    /// Resolved marker style for cluster entries. Noise entries keep the
    /// series' own point styling, owned by the caller.
    #[serde(default)]
    pub marker: Option<ClusterMarkerStyle>,
    #[serde(default)]
    pub data_label: Option<String>,
    #[serde(default)]
    pub tooltip: Option<String>,
    /// The caller's per-point option payload, carried through unchanged for
    /// noise entries.
    #[serde(default)]
    pub point_options: Option<serde_json::Value>,
}

/// Aggregated representative of one above-threshold cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterGroup {
    /// Stringified cell key, stable for one pass.
    pub id: String,
    pub cell: CellKey,
    /// Index of this cluster in the grouped output arrays.
    pub entry: usize,
    /// Anchor position actually rendered, in data space.
    pub x: f64,
    pub y: f64,
    /// Unadjusted arithmetic mean of the members, in data space.
    pub centroid_x: f64,
    pub centroid_y: f64,
    /// Original input indices of every member, in input order.
    pub members: Vec<usize>,
    /// Index into the configured zone list, when one matched.
    pub zone: Option<usize>,
}

impl ClusterGroup {
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// A point whose cell stayed below the cluster threshold; rendered
/// individually at its original position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoisePoint {
    pub id: String,
    pub cell: CellKey,
    /// Index of this point in the grouped output arrays.
    pub entry: usize,
    /// Original input index.
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

/// Full output of one clustering pass.
///
/// `grouped_x`/`grouped_y`/`group_map` are parallel, one slot per emitted
/// cluster or noise point, ordered by first appearance of the owning cell in
/// the input scan. A fresh value is produced on every pass; hand the
/// previous one back through `ClusterEngine::dispose` before consuming the
/// next.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteredData {
    pub grouped_x: Vec<f64>,
    pub grouped_y: Vec<f64>,
    pub group_map: Vec<GroupMapEntry>,
    pub clusters: Vec<ClusterGroup>,
    pub noise: Vec<NoisePoint>,
}

impl ClusteredData {
    /// Number of emitted output entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.group_map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.group_map.is_empty()
    }

    /// Whether an output entry is an aggregated cluster.
    #[must_use]
    pub fn is_cluster(&self, entry: usize) -> bool {
        self.group_map
            .get(entry)
            .is_some_and(|meta| meta.format_prefix == FormatPrefix::Cluster)
    }

    /// The cluster behind an output entry, when it is one.
    #[must_use]
    pub fn cluster_at(&self, entry: usize) -> Option<&ClusterGroup> {
        self.clusters.iter().find(|cluster| cluster.entry == entry)
    }

    /// Original input indices reachable from an output entry, for drill-down.
    #[must_use]
    pub fn member_indices(&self, entry: usize) -> Option<Vec<usize>> {
        if let Some(cluster) = self.cluster_at(entry) {
            return Some(cluster.members.clone());
        }
        self.noise
            .iter()
            .find(|point| point.entry == entry)
            .map(|point| vec![point.index])
    }

    /// Guards caller-side point updates: synthesized cluster entries must
    /// never be edited in place, only original input points may change.
    pub fn ensure_point_update_allowed(&self, entry: usize) -> ClusterResult<()> {
        let Some(meta) = self.group_map.get(entry) else {
            return Err(ClusterError::InvalidData(format!(
                "output entry {entry} is out of range"
            )));
        };
        if meta.format_prefix == FormatPrefix::Cluster {
            return Err(ClusterError::AggregatedPointUpdate { entry });
        }
        Ok(())
    }
}
