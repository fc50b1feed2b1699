use cluster_rs::cluster::{CellKey, GridMode, LayoutAlgorithm, bucket_points};
use cluster_rs::core::{DataPoint, ProjectedAxis};

fn identity_axis(length: f64) -> ProjectedAxis {
    ProjectedAxis::fitted(0.0, length, length, 0.0).expect("axis")
}

fn grid_layout(kind: GridMode, grid_size_px: f64) -> LayoutAlgorithm {
    LayoutAlgorithm { kind, grid_size_px }
}

#[test]
fn points_bucket_by_floor_division_of_pixels() {
    let axis = identity_axis(100.0);
    let points = vec![
        DataPoint::new(2.0, 2.0),
        DataPoint::new(3.0, 3.0),
        DataPoint::new(60.0, 60.0),
    ];

    let groups = bucket_points(
        &points,
        axis,
        axis,
        grid_layout(GridMode::DataRelative, 50.0),
    )
    .expect("bucketing");

    let keys: Vec<CellKey> = groups.iter().map(|(key, _)| *key).collect();
    assert_eq!(keys, vec![CellKey::new(0, 0), CellKey::new(1, 1)]);

    let first = groups.get(&CellKey::new(0, 0)).expect("first cell");
    assert_eq!(
        first.iter().map(|member| member.index).collect::<Vec<_>>(),
        vec![0, 1]
    );
    let second = groups.get(&CellKey::new(1, 1)).expect("second cell");
    assert_eq!(second[0].index, 2);
}

#[test]
fn out_of_plot_points_still_receive_a_cell() {
    let axis = identity_axis(100.0);
    let points = vec![DataPoint::new(250.0, -30.0)];

    let groups = bucket_points(
        &points,
        axis,
        axis,
        grid_layout(GridMode::DataRelative, 50.0),
    )
    .expect("bucketing");

    assert_eq!(groups.len(), 1);
    assert!(groups.contains_key(&CellKey::new(-1, 5)));
}

#[test]
fn every_point_lands_in_exactly_one_cell() {
    let axis = identity_axis(100.0);
    let points: Vec<DataPoint> = (0..137)
        .map(|i| {
            let v = (i as f64 * 7.31) % 100.0;
            DataPoint::new(v, 100.0 - v)
        })
        .collect();

    let groups = bucket_points(
        &points,
        axis,
        axis,
        grid_layout(GridMode::DataRelative, 25.0),
    )
    .expect("bucketing");

    let mut seen = vec![0usize; points.len()];
    for (_, members) in groups.iter() {
        for member in members {
            seen[member.index] += 1;
        }
    }
    assert!(seen.iter().all(|&count| count == 1));
}

#[test]
fn panning_does_not_move_points_between_cells_in_data_relative_mode() {
    let resting = ProjectedAxis::new(0.0, 100.0, 0.0, 200.0, 100.0, 0.0).expect("axis");
    let panned = ProjectedAxis::new(50.0, 150.0, 0.0, 200.0, 100.0, 0.0).expect("axis");
    let points = vec![
        DataPoint::new(10.0, 10.0),
        DataPoint::new(12.0, 12.0),
        DataPoint::new(130.0, 130.0),
    ];
    let layout = grid_layout(GridMode::DataRelative, 50.0);

    let before = bucket_points(&points, resting, resting, layout).expect("bucketing");
    let after = bucket_points(&points, panned, panned, layout).expect("bucketing");

    assert_eq!(before, after);
}

#[test]
fn view_relative_cells_shift_with_the_viewport() {
    let resting = ProjectedAxis::new(0.0, 100.0, 0.0, 200.0, 100.0, 0.0).expect("axis");
    let panned = ProjectedAxis::new(50.0, 150.0, 0.0, 200.0, 100.0, 0.0).expect("axis");
    let points = vec![DataPoint::new(130.0, 130.0)];
    let layout = grid_layout(GridMode::ViewRelative, 50.0);

    let before = bucket_points(&points, resting, resting, layout).expect("bucketing");
    let after = bucket_points(&points, panned, panned, layout).expect("bucketing");

    assert!(before.contains_key(&CellKey::new(2, 2)));
    assert!(after.contains_key(&CellKey::new(1, 1)));
}

#[test]
fn plot_origin_is_subtracted_before_bucketing() {
    let offset_axis = ProjectedAxis::fitted(0.0, 100.0, 100.0, 40.0).expect("axis");
    let points = vec![DataPoint::new(10.0, 10.0)];

    let groups = bucket_points(
        &points,
        offset_axis,
        offset_axis,
        grid_layout(GridMode::DataRelative, 50.0),
    )
    .expect("bucketing");

    assert!(groups.contains_key(&CellKey::new(0, 0)));
}

#[test]
fn non_finite_coordinates_are_rejected() {
    let axis = identity_axis(100.0);
    let points = vec![DataPoint::new(f64::NAN, 1.0)];

    let result = bucket_points(
        &points,
        axis,
        axis,
        grid_layout(GridMode::DataRelative, 50.0),
    );
    assert!(result.is_err());
}
