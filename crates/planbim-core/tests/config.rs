use planbim_core::config::{FaceTracing, RoomSource};
use planbim_core::units::UnitPolicy;
use planbim_core::{BuildConfig, BuildError};

#[test]
fn defaults_are_valid() {
    let cfg = BuildConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(1.0, cfg.graph.snap_grid);
    assert_eq!(1000.0, cfg.openings.tolerance);
    assert_eq!(0.08, cfg.walls.min_thickness);
    assert_eq!(0.6, cfg.walls.max_thickness);
    assert_eq!(200, cfg.rooms.max_walk_len);
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let json = r#"{
        "graph": { "snap_grid": 0.5 },
        "rooms": { "tracing": "half_edge", "source": "wall_axes" },
        "units": { "policy": "declared" }
    }"#;
    let cfg: BuildConfig = serde_json::from_str(json).expect("config parses");
    assert_eq!(0.5, cfg.graph.snap_grid);
    assert_eq!(FaceTracing::HalfEdge, cfg.rooms.tracing);
    assert_eq!(RoomSource::WallAxes, cfg.rooms.source);
    assert_eq!(200, cfg.rooms.max_walk_len);
    assert_eq!(UnitPolicy::Declared, cfg.units.policy);
    assert_eq!(50.0, cfg.units.meter_threshold);
    assert_eq!(BuildConfig::default().openings, cfg.openings);
}

#[test]
fn rejects_non_positive_snap_grid() {
    let mut cfg = BuildConfig::default();
    cfg.graph.snap_grid = 0.0;
    assert!(matches!(cfg.validate(), Err(BuildError::InvalidConfig { .. })));
}

#[test]
fn rejects_inverted_thickness_window() {
    let mut cfg = BuildConfig::default();
    cfg.walls.min_thickness = 0.7;
    assert!(matches!(cfg.validate(), Err(BuildError::InvalidConfig { .. })));
}

#[test]
fn rejects_non_positive_tolerance() {
    let mut cfg = BuildConfig::default();
    cfg.openings.tolerance = -1.0;
    let err = cfg.validate().expect_err("negative tolerance");
    assert!(err.to_string().contains("openings.tolerance"));
}
