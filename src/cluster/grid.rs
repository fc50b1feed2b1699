use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cluster::options::{GridMode, LayoutAlgorithm};
use crate::core::{DataPoint, ProjectedAxis};
use crate::error::ClusterResult;

/// Discrete grid cell identity derived from a point's corrected pixel
/// position floor-divided by the grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub row: i64,
    pub col: i64,
}

impl CellKey {
    #[must_use]
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Derives the key from plot-local, offset-corrected pixel coordinates.
    #[must_use]
    pub fn from_plot_pixels(x_px: f64, y_px: f64, grid_size_px: f64) -> Self {
        Self {
            row: (y_px / grid_size_px).floor() as i64,
            col: (x_px / grid_size_px).floor() as i64,
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

/// One input point as seen by the bucketing pass: original slice index plus
/// its data-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellMember {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

/// Points partitioned into grid cells, in first-seen scan order.
///
/// Iteration order over cells equals the order in which each cell first
/// received a member; member order inside a cell equals input order. That
/// ordering is what fixes the output entry order of a whole pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellGroups {
    cells: IndexMap<CellKey, Vec<CellMember>>,
}

impl CellGroups {
    pub fn push(&mut self, key: CellKey, member: CellMember) {
        self.cells.entry(key).or_default().push(member);
    }

    #[must_use]
    pub fn get(&self, key: &CellKey) -> Option<&[CellMember]> {
        self.cells.get(key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains_key(&self, key: &CellKey) -> bool {
        self.cells.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &[CellMember])> {
        self.cells.iter().map(|(key, members)| (key, members.as_slice()))
    }
}

/// Exact arithmetic mean of a cell's members, in data space.
#[must_use]
pub fn centroid_of(members: &[CellMember]) -> (f64, f64) {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for member in members {
        sum_x += member.x;
        sum_y += member.y;
    }
    let count = members.len() as f64;
    (sum_x / count, sum_y / count)
}

/// Per-axis pan offsets applied before floor division.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanOffsets {
    pub x_px: f64,
    pub y_px: f64,
}

impl PanOffsets {
    /// Resolves the offset correction for the configured anchoring mode.
    ///
    /// View-relative grids skip the correction entirely; data-relative grids
    /// shift every pixel by the hidden data span so cell boundaries hold
    /// still in data space while the viewport pans.
    #[must_use]
    pub fn resolve(kind: GridMode, x_axis: ProjectedAxis, y_axis: ProjectedAxis) -> Self {
        match kind {
            GridMode::ViewRelative => Self { x_px: 0.0, y_px: 0.0 },
            GridMode::DataRelative => Self {
                x_px: x_axis.pan_offset_px(),
                y_px: y_axis.pan_offset_px(),
            },
        }
    }
}

/// Assigns every input point to a grid cell.
///
/// No point is dropped: coordinates projecting outside the plot area still
/// receive a key, the grid extends conceptually to infinity.
pub fn bucket_points(
    points: &[DataPoint],
    x_axis: ProjectedAxis,
    y_axis: ProjectedAxis,
    layout: LayoutAlgorithm,
) -> ClusterResult<CellGroups> {
    let offsets = PanOffsets::resolve(layout.kind, x_axis, y_axis);
    let mut groups = CellGroups::default();

    for (index, point) in points.iter().enumerate() {
        let point = point.ensure_finite(index)?;
        let x_px = x_axis.to_pixel(point.x) + offsets.x_px - x_axis.origin_px();
        let y_px = y_axis.to_pixel(point.y) + offsets.y_px - y_axis.origin_px();
        let key = CellKey::from_plot_pixels(x_px, y_px, layout.grid_size_px);
        groups.push(
            key,
            CellMember {
                index,
                x: point.x,
                y: point.y,
            },
        );
    }

    Ok(groups)
}
