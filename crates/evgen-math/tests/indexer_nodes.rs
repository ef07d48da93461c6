use evgen_core::NumericsConfig;
use evgen_math::{AxisScale, GridIndexer};
use proptest::prelude::*;

fn assert_node_property(indexer: &GridIndexer) {
    let n = indexer.len();
    for (i, &x) in indexer.points().iter().enumerate() {
        let bin = indexer.locate(x);
        if i < n - 1 {
            assert_eq!(bin.index, i, "node {i} of {n} at {x}");
            assert_eq!(bin.lower_edge, bin.value);
        } else {
            assert_eq!(bin.index, n - 2);
        }
    }
}

#[test]
fn regular_linear_grid_locates_nodes_exactly() {
    let points: Vec<f64> = (0..101).map(|i| -1.0 + 0.02 * i as f64).collect();
    let indexer = GridIndexer::new(&points).unwrap();
    assert!(indexer.is_regular());
    assert!(!indexer.is_log());
    assert_node_property(&indexer);
}

#[test]
fn regular_log_grid_locates_nodes_exactly() {
    let points: Vec<f64> = (0..61).map(|i| 10f64.powf(2.0 + 0.1 * i as f64)).collect();
    let indexer = GridIndexer::new(&points).unwrap();
    assert!(indexer.is_regular());
    assert!(indexer.is_log());
    assert_node_property(&indexer);
}

#[test]
fn forced_linear_scale_on_log_data() {
    let points: Vec<f64> = (0..8).map(|i| 2f64.powi(i)).collect();
    let indexer =
        GridIndexer::with_scale(&points, AxisScale::Linear, &NumericsConfig::default()).unwrap();
    assert!(!indexer.is_log());
    assert!(!indexer.is_regular());
    assert_node_property(&indexer);
}

#[test]
fn unsorted_duplicated_input_is_normalised() {
    let indexer = GridIndexer::new(&[3.0, 1.0, 2.0, 1.0, 3.0]).unwrap();
    assert_eq!(indexer.points(), &[1.0, 2.0, 3.0]);
    assert_eq!(indexer.min(), 1.0);
    assert_eq!(indexer.max(), 3.0);
    assert_eq!(indexer.range(), 2.0);
}

#[test]
fn out_of_range_queries_use_boundary_bins() {
    let indexer = GridIndexer::new(&[1.0, 10.0, 100.0, 1000.0]).unwrap();
    assert_eq!(indexer.locate(0.1).index, 0);
    assert!(indexer.locate(0.1).fraction() < 0.0);
    assert_eq!(indexer.locate(1e5).index, 2);
    assert!(indexer.locate(1e5).fraction() > 1.0);
    assert_eq!(indexer.locate(-3.0).index, 0);
}

proptest! {
    #[test]
    fn arbitrary_grids_locate_nodes(
        start in -100.0f64..100.0,
        gaps in prop::collection::vec(1e-3f64..10.0, 1..40),
    ) {
        let mut points = vec![start];
        for gap in gaps {
            let next = points[points.len() - 1] + gap;
            points.push(next);
        }
        let indexer = GridIndexer::new(&points).unwrap();
        prop_assert_eq!(indexer.len(), points.len());
        assert_node_property(&indexer);
    }

    #[test]
    fn interior_queries_fall_inside_their_bin(
        gaps in prop::collection::vec(1e-2f64..5.0, 2..30),
        t in 0.0f64..1.0,
    ) {
        let mut points = vec![0.5];
        for gap in gaps {
            let next = points[points.len() - 1] + gap;
            points.push(next);
        }
        let indexer = GridIndexer::new(&points).unwrap();
        let x = indexer.min() + t * indexer.range();
        let bin = indexer.locate(x);
        let f = bin.fraction();
        prop_assert!((-1e-9..=1.0 + 1e-9).contains(&f), "fraction {}", f);
    }
}
