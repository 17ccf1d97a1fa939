use planbim_algo::topology::{build_topology, connected_components, snap};
use planbim_core::config::GraphConfig;
use planbim_core::geom::Vec2;
use planbim_core::model::RawSegment;

fn seg(a: (f64, f64), b: (f64, f64)) -> RawSegment {
    RawSegment::new(Vec2::new(a.0, a.1), Vec2::new(b.0, b.1), "СТЕНА", 0)
}

#[test]
fn snap_is_idempotent() {
    let points = [
        Vec2::new(0.0, 0.0),
        Vec2::new(0.49, -0.51),
        Vec2::new(123.456, 789.012),
        Vec2::new(-3.5, 2.5),
        Vec2::new(1e6 + 0.3, -1e6 - 0.7),
    ];
    for k in [1.0, 0.1, 0.05, 25.0] {
        for p in points {
            let once = snap(p, k);
            assert_eq!(once, snap(once, k), "k = {k}, p = {p:?}");
        }
    }
}

#[test]
fn half_cell_ties_round_to_even() {
    assert_eq!(Vec2::new(2.0, 0.0), snap(Vec2::new(2.5, 0.5), 1.0));
    assert_eq!(Vec2::new(4.0, -2.0), snap(Vec2::new(3.5, -1.5), 1.0));
    assert_eq!(Vec2::new(0.0, 0.0), snap(Vec2::new(-0.5, 0.25), 1.0));
}

#[test]
fn endpoints_on_neighbouring_half_cells_merge() {
    let graph = build_topology(
        &[seg((1.5, 0.0), (1.5, 10.0)), seg((2.5, 0.0), (2.5, 10.0))],
        &GraphConfig::default(),
    );
    assert_eq!(2, graph.nodes.len());
    assert_eq!(1, graph.edges.len());
    assert_eq!(vec![0, 1], graph.edges[0].segments);
    assert_eq!(Vec2::new(2.0, 0.0), graph.node_point(0));
}

#[test]
fn tiny_grid_keeps_far_apart_points_distinct() {
    let graph = build_topology(
        &[seg((1.0e6, 0.0), (2.0e6, 0.0))],
        &GraphConfig { snap_grid: 1e-15 },
    );
    assert_eq!(2, graph.nodes.len());
    assert_eq!(1, graph.edges.len());
}

#[test]
fn near_coincident_endpoints_share_a_node() {
    let graph = build_topology(
        &[seg((0.0, 0.0), (10.2, 0.1)), seg((9.9, -0.2), (10.0, 10.0))],
        &GraphConfig::default(),
    );
    assert_eq!(3, graph.nodes.len());
    assert_eq!(2, graph.edges.len());
    assert_eq!(2, graph.degree(1));
    assert_eq!(vec![0, 1], graph.nodes[1].segments);
}

#[test]
fn duplicate_segments_share_one_edge() {
    let graph = build_topology(
        &[seg((0.0, 0.0), (5.0, 0.0)), seg((5.0, 0.0), (0.0, 0.0))],
        &GraphConfig::default(),
    );
    assert_eq!(1, graph.edges.len());
    assert_eq!(vec![0, 1], graph.edges[0].segments);
    assert!(graph.has_edge(0, 1));
    assert!(graph.has_edge(1, 0));
}

#[test]
fn segments_collapsing_into_one_cell_add_no_edge() {
    let graph = build_topology(&[seg((0.0, 0.0), (0.3, 0.2))], &GraphConfig::default());
    assert_eq!(1, graph.nodes.len());
    assert!(graph.edges.is_empty());
}

#[test]
fn coarse_grid_merges_corners() {
    let segs = [seg((0.0, 0.0), (3.0, 0.0)), seg((3.0, 0.0), (3.0, 3.0))];
    let fine = build_topology(&segs, &GraphConfig { snap_grid: 1.0 });
    let coarse = build_topology(&segs, &GraphConfig { snap_grid: 10.0 });
    assert_eq!(3, fine.nodes.len());
    assert_eq!(1, coarse.nodes.len());
}

#[test]
fn counts_connected_components() {
    let graph = build_topology(
        &[
            seg((0.0, 0.0), (5.0, 0.0)),
            seg((5.0, 0.0), (5.0, 5.0)),
            seg((20.0, 20.0), (30.0, 20.0)),
        ],
        &GraphConfig::default(),
    );
    let components = connected_components(&graph);
    assert_eq!(2, components.len());
    assert_eq!(vec![0, 1, 2], components[0]);
    assert_eq!(vec![3, 4], components[1]);
}
