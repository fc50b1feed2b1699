use cluster_rs::cluster::{ClusterOptions, GridMode, NullDiagnostics, cluster_points};
use cluster_rs::core::{DataPoint, ProjectedAxis};
use proptest::prelude::*;
use std::collections::HashSet;

fn pseudo_points(count: usize, seed: u64) -> Vec<DataPoint> {
    (0..count)
        .map(|i| {
            let mixed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add((i as u64).wrapping_mul(1_442_695_040_888_963_407));
            let x = (mixed % 1_000) as f64 / 10.0;
            let y = ((mixed >> 10) % 1_000) as f64 / 10.0;
            DataPoint::new(x, y)
        })
        .collect()
}

proptest! {
    #[test]
    fn every_point_is_emitted_exactly_once(
        count in 1usize..200,
        seed in 0u64..1_000_000u64,
        min_size in 2usize..6,
        grid_size in prop::sample::select(vec![10.0f64, 25.0, 50.0]),
    ) {
        let axis = ProjectedAxis::fitted(0.0, 100.0, 100.0, 0.0).expect("axis");
        let options = ClusterOptions::default()
            .with_enabled(true)
            .with_allow_overlap(false)
            .with_minimum_cluster_size(min_size)
            .with_layout(GridMode::DataRelative, grid_size);
        let points = pseudo_points(count, seed);
        let mut diagnostics = NullDiagnostics;

        let data = cluster_points(&points, None, axis, axis, &options, &mut diagnostics)
            .expect("pass");

        let mut seen = vec![0usize; count];
        for cluster in &data.clusters {
            prop_assert!(cluster.member_count() >= min_size.max(2));
            for &index in &cluster.members {
                seen[index] += 1;
            }
        }
        for noise in &data.noise {
            seen[noise.index] += 1;
        }
        prop_assert!(seen.iter().all(|&times| times == 1));
    }

    #[test]
    fn output_arrays_stay_parallel_and_cells_stay_disjoint(
        count in 1usize..200,
        seed in 0u64..1_000_000u64,
        min_size in 2usize..6,
    ) {
        let axis = ProjectedAxis::fitted(0.0, 100.0, 100.0, 0.0).expect("axis");
        let options = ClusterOptions::default()
            .with_enabled(true)
            .with_minimum_cluster_size(min_size)
            .with_layout(GridMode::DataRelative, 25.0);
        let points = pseudo_points(count, seed);
        let mut diagnostics = NullDiagnostics;

        let data = cluster_points(&points, None, axis, axis, &options, &mut diagnostics)
            .expect("pass");

        prop_assert_eq!(data.grouped_x.len(), data.group_map.len());
        prop_assert_eq!(data.grouped_y.len(), data.group_map.len());
        prop_assert_eq!(data.clusters.len() + data.noise.len(), data.group_map.len());

        // No cell may be emitted both as a cluster and as noise.
        let cluster_cells: HashSet<_> = data.clusters.iter().map(|c| c.cell).collect();
        prop_assert!(data.noise.iter().all(|n| !cluster_cells.contains(&n.cell)));
    }

    #[test]
    fn repeated_passes_are_deterministic(
        count in 1usize..150,
        seed in 0u64..1_000_000u64,
    ) {
        let axis = ProjectedAxis::new(20.0, 120.0, 0.0, 120.0, 100.0, 0.0).expect("axis");
        let options = ClusterOptions::default()
            .with_enabled(true)
            .with_allow_overlap(false)
            .with_layout(GridMode::DataRelative, 25.0);
        let points = pseudo_points(count, seed);
        let mut diagnostics = NullDiagnostics;

        let first = cluster_points(&points, None, axis, axis, &options, &mut diagnostics)
            .expect("first pass");
        let second = cluster_points(&points, None, axis, axis, &options, &mut diagnostics)
            .expect("second pass");

        prop_assert_eq!(&first, &second);
    }
}
