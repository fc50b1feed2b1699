use tracing::{debug, warn};

use crate::cluster::{
    ClusterDiagnostics, ClusterOptions, ClusteredData, NullDiagnostics, cluster_points,
};
use crate::core::{DataPoint, ProjectedAxis};
use crate::error::ClusterResult;

/// Pass driver owning the validated configuration and the disposal
/// handshake with the rendering collaborator.
///
/// The engine keeps no clustering state between passes; every call to
/// [`ClusterEngine::cluster`] recomputes from scratch. What it does track is
/// the lifecycle of the previous pass's output: the caller must hand that
/// value back through [`ClusterEngine::dispose`] before consuming a new one,
/// and once more on permanent teardown of the series.
#[derive(Debug)]
pub struct ClusterEngine {
    options: ClusterOptions,
    pass_counter: u64,
    outstanding_pass: Option<u64>,
}

impl ClusterEngine {
    /// Creates an engine, failing fast on invalid configuration.
    pub fn new(options: ClusterOptions) -> ClusterResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            pass_counter: 0,
            outstanding_pass: None,
        })
    }

    #[must_use]
    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    /// Whether the series asked for clustering at all. Callers render the
    /// unclustered base path when this is false.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    /// Runs one clustering pass.
    pub fn cluster(
        &mut self,
        points: &[DataPoint],
        point_options: Option<&[serde_json::Value]>,
        x_axis: ProjectedAxis,
        y_axis: ProjectedAxis,
    ) -> ClusterResult<ClusteredData> {
        let mut diagnostics = NullDiagnostics;
        self.cluster_with_diagnostics(points, point_options, x_axis, y_axis, &mut diagnostics)
    }

    /// Runs one clustering pass, feeding grid geometry and resolved anchors
    /// to the given diagnostics sink.
    pub fn cluster_with_diagnostics(
        &mut self,
        points: &[DataPoint],
        point_options: Option<&[serde_json::Value]>,
        x_axis: ProjectedAxis,
        y_axis: ProjectedAxis,
        diagnostics: &mut dyn ClusterDiagnostics,
    ) -> ClusterResult<ClusteredData> {
        if self.outstanding_pass.is_some() {
            warn!("previous clustered data was not disposed before a new pass");
        }

        let data = cluster_points(
            points,
            point_options,
            x_axis,
            y_axis,
            &self.options,
            diagnostics,
        )?;

        self.pass_counter += 1;
        self.outstanding_pass = Some(self.pass_counter);
        Ok(data)
    }

    /// Releases the previous pass's synthesized output.
    ///
    /// Call exactly once per pass before consuming the next result, and once
    /// more on teardown. The engine owns no rendering resources itself; this
    /// is the hand-back point where the caller drops marker objects tied to
    /// the entries.
    pub fn dispose(&mut self, previous: ClusteredData) {
        debug!(entries = previous.len(), "dispose clustered data");
        self.outstanding_pass = None;
        drop(previous);
    }
}
