use tracing::{debug, trace};

use crate::cluster::collision::{AnchorArena, CollisionContext, resolve_cell_anchor};
use crate::cluster::diagnostics::{AnchorSample, ClusterDiagnostics, PassGeometry};
use crate::cluster::grid::{PanOffsets, bucket_points, centroid_of};
use crate::cluster::options::{ClusterOptions, GridMode, format_member_count, match_zone};
use crate::cluster::result::{
    ClusterGroup, ClusteredData, FormatPrefix, GroupMapEntry, NoisePoint,
};
use crate::core::{DataPoint, ProjectedAxis};
use crate::error::{ClusterError, ClusterResult};

/// Runs one full clustering pass: bucket, classify, position, assemble.
///
/// The pass is a pure function of its inputs; it holds no state across
/// invocations and recomputes everything from scratch. Output entries are
/// emitted in first-seen cell order, members of a noise cell in input order.
///
/// `point_options`, when given, must parallel `points`; each noise entry
/// carries its payload through unchanged. Cluster members are reachable by
/// index via [`ClusterGroup::members`].
pub fn cluster_points(
    points: &[DataPoint],
    point_options: Option<&[serde_json::Value]>,
    x_axis: ProjectedAxis,
    y_axis: ProjectedAxis,
    options: &ClusterOptions,
    diagnostics: &mut dyn ClusterDiagnostics,
) -> ClusterResult<ClusteredData> {
    options.validate()?;

    if point_options.is_some_and(|payloads| payloads.len() != points.len()) {
        return Err(ClusterError::InvalidData(
            "per-point options must parallel the input points".to_owned(),
        ));
    }

    if points.is_empty() {
        debug!("cluster pass skipped: empty input");
        return Ok(ClusteredData::default());
    }

    let groups = bucket_points(points, x_axis, y_axis, options.layout)?;
    let offsets = PanOffsets::resolve(options.layout.kind, x_axis, y_axis);
    diagnostics.pass_geometry(PassGeometry {
        grid_size_px: options.layout.grid_size_px,
        offset_x_px: offsets.x_px,
        offset_y_px: offsets.y_px,
        cell_count: groups.len(),
    });

    let min_size = options.minimum_cluster_size.max(2);
    let adjust_anchors = options.layout.kind == GridMode::DataRelative && !options.allow_overlap;

    let mut arena = AnchorArena::default();
    let ctx = CollisionContext {
        groups: &groups,
        x_axis,
        y_axis,
        options,
        offsets,
        min_size,
    };

    let mut data = ClusteredData::default();

    for (key, members) in groups.iter() {
        if members.len() >= min_size {
            let (centroid_x, centroid_y) = centroid_of(members);
            let zone = match_zone(&options.zones, members.len());
            let (anchor_x, anchor_y) = if adjust_anchors {
                resolve_cell_anchor(&ctx, &mut arena, *key).unwrap_or((centroid_x, centroid_y))
            } else {
                (centroid_x, centroid_y)
            };
            let marker = match zone {
                Some(index) => options.style.merged_with(&options.zones[index].style),
                None => options.style.clone(),
            };

            let entry = data.group_map.len();
            trace!(cell = %key, members = members.len(), "cluster cell");

            data.grouped_x.push(anchor_x);
            data.grouped_y.push(anchor_y);
            data.group_map.push(GroupMapEntry {
                format_prefix: FormatPrefix::Cluster,
                member_count: members.len(),
                marker: Some(marker),
                data_label: Some(format_member_count(
                    &options.data_label_format,
                    members.len(),
                )),
                tooltip: Some(format_member_count(
                    &options.tooltip_cluster_format,
                    members.len(),
                )),
                point_options: None,
            });
            data.clusters.push(ClusterGroup {
                id: key.to_string(),
                cell: *key,
                entry,
                x: anchor_x,
                y: anchor_y,
                centroid_x,
                centroid_y,
                members: members.iter().map(|member| member.index).collect(),
                zone,
            });

            diagnostics.cluster_anchor(AnchorSample {
                cell: *key,
                x_px: x_axis.to_pixel(anchor_x) - x_axis.origin_px(),
                y_px: y_axis.to_pixel(anchor_y) - y_axis.origin_px(),
                member_count: members.len(),
            });
        } else {
            for member in members {
                let entry = data.group_map.len();
                data.grouped_x.push(member.x);
                data.grouped_y.push(member.y);
                data.group_map.push(GroupMapEntry {
                    format_prefix: FormatPrefix::Point,
                    member_count: 1,
                    marker: None,
                    data_label: None,
                    tooltip: None,
                    point_options: point_options
                        .and_then(|payloads| payloads.get(member.index).cloned()),
                });
                data.noise.push(NoisePoint {
                    id: key.to_string(),
                    cell: *key,
                    entry,
                    index: member.index,
                    x: member.x,
                    y: member.y,
                });
            }
        }
    }

    debug!(
        points = points.len(),
        cells = groups.len(),
        clusters = data.clusters.len(),
        noise = data.noise.len(),
        "cluster pass complete"
    );

    Ok(data)
}
