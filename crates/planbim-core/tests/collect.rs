use planbim_core::collect::{collect_all_linework, collect_wall_segments};
use planbim_core::config::CollectorConfig;
use planbim_core::geom::Vec2;
use planbim_core::model::{LinePrim, PolylinePrim, Primitive};

fn line(a: (f64, f64), b: (f64, f64), layer: &str) -> Primitive {
    Primitive::Line(LinePrim {
        start: Vec2::new(a.0, a.1),
        end: Vec2::new(b.0, b.1),
        layer: layer.to_string(),
    })
}

fn polyline(points: &[(f64, f64)], closed: bool, layer: &str) -> Primitive {
    Primitive::Polyline(PolylinePrim {
        vertices: points.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        closed,
        layer: layer.to_string(),
    })
}

const SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];

#[test]
fn closed_polyline_emits_closing_segment() {
    let prims = vec![polyline(&SQUARE, true, "СТЕНА")];
    let segs = collect_wall_segments(&prims, &CollectorConfig::default());
    assert_eq!(4, segs.len());
    assert_eq!(Vec2::new(0.0, 10.0), segs[3].start);
    assert_eq!(Vec2::new(0.0, 0.0), segs[3].end);
    assert!(segs.iter().all(|s| s.source == 0));
}

#[test]
fn open_polyline_has_one_segment_per_vertex_pair() {
    let prims = vec![polyline(&SQUARE, false, "СТЕНА")];
    let segs = collect_wall_segments(&prims, &CollectorConfig::default());
    assert_eq!(3, segs.len());
}

#[test]
fn keeps_only_wall_layers_case_insensitively() {
    let prims = vec![
        line((0.0, 0.0), (1.0, 0.0), "ar_wall_outer"),
        line((0.0, 0.0), (1.0, 0.0), "Мебель"),
        line((0.0, 0.0), (1.0, 0.0), "АР_Газоблок 200мм"),
        line((0.0, 0.0), (1.0, 0.0), "стены"),
    ];
    let segs = collect_wall_segments(&prims, &CollectorConfig::default());
    let layers: Vec<&str> = segs.iter().map(|s| s.layer.as_str()).collect();
    assert_eq!(vec!["ar_wall_outer", "АР_Газоблок 200мм", "стены"], layers);
}

#[test]
fn no_matching_layer_yields_empty_list() {
    let prims = vec![line((0.0, 0.0), (1.0, 0.0), "0")];
    assert!(collect_wall_segments(&prims, &CollectorConfig::default()).is_empty());
}

#[test]
fn repeated_vertices_do_not_produce_zero_length_segments() {
    let prims = vec![polyline(
        &[(0.0, 0.0), (5.0, 0.0), (5.0, 0.0), (5.0, 5.0)],
        false,
        "STENA",
    )];
    let segs = collect_wall_segments(&prims, &CollectorConfig::default());
    assert_eq!(2, segs.len());
    assert!(segs.iter().all(|s| s.length > 0.0));
}

#[test]
fn custom_keywords_replace_the_defaults() {
    let cfg = CollectorConfig {
        wall_layer_keywords: vec!["A-WALL".to_string()],
    };
    let prims = vec![
        line((0.0, 0.0), (1.0, 0.0), "a-wall-ext"),
        line((0.0, 0.0), (1.0, 0.0), "СТЕНА"),
    ];
    let segs = collect_wall_segments(&prims, &cfg);
    assert_eq!(1, segs.len());
    assert_eq!("a-wall-ext", segs[0].layer);
}

#[test]
fn all_linework_ignores_layers_and_short_or_open_polylines() {
    let prims = vec![
        line((0.0, 0.0), (1.0, 0.0), "Мебель"),
        polyline(&SQUARE, true, "0"),
        polyline(&SQUARE, false, "0"),
        polyline(&SQUARE[..3], true, "0"),
    ];
    let segs = collect_all_linework(&prims);
    assert_eq!(5, segs.len());
    assert_eq!(0, segs[0].source);
    assert!(segs[1..].iter().all(|s| s.source == 1));
}
