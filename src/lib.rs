//! cluster-rs: viewport marker-clustering engine.
//!
//! This crate groups scatter points that land close together in a chart's
//! pixel space into rendered clusters, keeps sparse points as individual
//! noise markers, and nudges cluster anchors so neighboring grid cells do
//! not visually collide.

pub mod api;
pub mod cluster;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::ClusterEngine;
pub use cluster::{ClusterOptions, ClusteredData};
pub use error::{ClusterError, ClusterResult};
