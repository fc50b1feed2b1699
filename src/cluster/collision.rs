use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::cluster::grid::{CellGroups, CellKey, CellMember, PanOffsets, centroid_of};
use crate::cluster::options::{ClusterOptions, match_zone};
use crate::core::ProjectedAxis;

/// Per-pass memo of resolved anchors, keyed by cell.
///
/// A fresh arena is built at the start of every pass; each cell's anchor is
/// computed at most once and reused by every neighbor lookup afterwards.
#[derive(Debug, Default)]
pub(crate) struct AnchorArena {
    resolved: IndexMap<CellKey, (f64, f64)>,
    resolving: Vec<CellKey>,
}

/// Read-only state shared by every anchor resolution in one pass.
pub(crate) struct CollisionContext<'a> {
    pub groups: &'a CellGroups,
    pub x_axis: ProjectedAxis,
    pub y_axis: ProjectedAxis,
    pub options: &'a ClusterOptions,
    pub offsets: PanOffsets,
    pub min_size: usize,
}

/// Collision radius assumed for a cell's rendered marker: the zone-merged
/// cluster radius for above-threshold cells, the default point marker
/// footprint for noise cells.
pub(crate) fn cell_anchor_radius_px(ctx: &CollisionContext<'_>, members: &[CellMember]) -> f64 {
    if members.len() >= ctx.min_size {
        match match_zone(&ctx.options.zones, members.len()) {
            Some(zone) => ctx.options.zones[zone]
                .style
                .radius
                .unwrap_or(ctx.options.style.radius),
            None => ctx.options.style.radius,
        }
    } else {
        ctx.options.point_marker.collision_radius_px()
    }
}

/// Resolves the rendered anchor for one populated cell, in data space.
///
/// Off-plot centroids are returned unchanged. On-plot candidates probe the
/// four diagonal corners within their own radius; when a probed corner lands
/// in a different, populated cell, the candidate is clamped per axis to its
/// own cell edge inset by its radius whenever the axis distance to that
/// neighbor's anchor falls below the sum of both radii.
///
/// Resolution is order-dependent: the first cell resolved in a pass wins,
/// and a mutual push cycle is cut by reading the other cell's raw centroid.
pub(crate) fn resolve_cell_anchor(
    ctx: &CollisionContext<'_>,
    arena: &mut AnchorArena,
    cell: CellKey,
) -> Option<(f64, f64)> {
    if let Some(anchor) = arena.resolved.get(&cell) {
        return Some(*anchor);
    }

    let members = ctx.groups.get(&cell)?;
    let (centroid_x, centroid_y) = centroid_of(members);
    let radius = cell_anchor_radius_px(ctx, members);
    let grid_size = ctx.options.layout.grid_size_px;

    let mut x_px = ctx.x_axis.to_pixel(centroid_x) - ctx.x_axis.origin_px();
    let mut y_px = ctx.y_axis.to_pixel(centroid_y) - ctx.y_axis.origin_px();

    // Off-screen anchors cannot visually collide; skip adjustment.
    if !ctx.x_axis.contains_plot_pixel(x_px) || !ctx.y_axis.contains_plot_pixel(y_px) {
        arena.resolved.insert(cell, (centroid_x, centroid_y));
        return Some((centroid_x, centroid_y));
    }

    x_px += ctx.offsets.x_px;
    y_px += ctx.offsets.y_px;

    arena.resolving.push(cell);

    let mut neighbors: SmallVec<[CellKey; 4]> = SmallVec::new();
    for (sign_x, sign_y) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
        let corner = CellKey::from_plot_pixels(
            x_px + sign_x * radius,
            y_px + sign_y * radius,
            grid_size,
        );
        if corner != cell && !neighbors.contains(&corner) {
            neighbors.push(corner);
        }
    }

    let cell_left_px = cell.col as f64 * grid_size;
    let cell_top_px = cell.row as f64 * grid_size;

    for neighbor in neighbors {
        if !ctx.groups.contains_key(&neighbor) {
            continue;
        }

        let (neighbor_x_px, neighbor_y_px) = neighbor_anchor_px(ctx, arena, neighbor);
        let neighbor_radius = ctx
            .groups
            .get(&neighbor)
            .map_or(0.0, |neighbor_members| {
                cell_anchor_radius_px(ctx, neighbor_members)
            });

        if neighbor.col != cell.col && (x_px - neighbor_x_px).abs() < radius + neighbor_radius {
            x_px = if neighbor.col < cell.col {
                cell_left_px + radius
            } else {
                cell_left_px + grid_size - radius
            };
        }
        if neighbor.row != cell.row && (y_px - neighbor_y_px).abs() < radius + neighbor_radius {
            y_px = if neighbor.row < cell.row {
                cell_top_px + radius
            } else {
                cell_top_px + grid_size - radius
            };
        }
    }

    arena.resolving.pop();

    let anchor = (
        ctx.x_axis
            .to_value(x_px - ctx.offsets.x_px + ctx.x_axis.origin_px()),
        ctx.y_axis
            .to_value(y_px - ctx.offsets.y_px + ctx.y_axis.origin_px()),
    );
    arena.resolved.insert(cell, anchor);
    Some(anchor)
}

/// A neighbor's anchor in the offset-corrected plot pixel frame: the
/// memoized anchor when already resolved, a recursive resolution otherwise,
/// and the raw centroid when the neighbor is itself mid-resolution.
fn neighbor_anchor_px(
    ctx: &CollisionContext<'_>,
    arena: &mut AnchorArena,
    neighbor: CellKey,
) -> (f64, f64) {
    if let Some((anchor_x, anchor_y)) = arena.resolved.get(&neighbor).copied() {
        return data_to_corrected_px(ctx, anchor_x, anchor_y);
    }

    if arena.resolving.contains(&neighbor) {
        if let Some(members) = ctx.groups.get(&neighbor) {
            let (centroid_x, centroid_y) = centroid_of(members);
            return data_to_corrected_px(ctx, centroid_x, centroid_y);
        }
    }

    match resolve_cell_anchor(ctx, arena, neighbor) {
        Some((anchor_x, anchor_y)) => data_to_corrected_px(ctx, anchor_x, anchor_y),
        // Unpopulated neighbors never clamp anything.
        None => (f64::INFINITY, f64::INFINITY),
    }
}

fn data_to_corrected_px(ctx: &CollisionContext<'_>, x: f64, y: f64) -> (f64, f64) {
    (
        ctx.x_axis.to_pixel(x) - ctx.x_axis.origin_px() + ctx.offsets.x_px,
        ctx.y_axis.to_pixel(y) - ctx.y_axis.origin_px() + ctx.offsets.y_px,
    )
}
