//! Grid-based marker clustering: bucketing, aggregation, overlap avoidance.
//!
//! The whole pipeline is a pure function of (points, axis projections,
//! configuration); see [`cluster_points`] for the single-pass entry point
//! and [`crate::api::ClusterEngine`] for the stateful disposal contract.

pub mod aggregate;
mod collision;
pub mod diagnostics;
pub mod grid;
pub mod options;
pub mod result;

pub use aggregate::cluster_points;
pub use diagnostics::{AnchorSample, ClusterDiagnostics, NullDiagnostics, PassGeometry};
pub use grid::{CellGroups, CellKey, CellMember, bucket_points, centroid_of};
pub use options::{
    ClusterMarkerStyle, ClusterOptions, GridMode, LayoutAlgorithm, PointMarkerDefaults, StyleZone,
    ZoneStyle, format_member_count, match_zone,
};
pub use result::{ClusterGroup, ClusteredData, FormatPrefix, GroupMapEntry, NoisePoint};
