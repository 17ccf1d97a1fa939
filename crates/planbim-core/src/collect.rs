use crate::config::CollectorConfig;
use crate::geom::Vec2;
use crate::material::layer_matches;
use crate::model::{Primitive, RawSegment};

/// Flattens wall-layer lines and polylines into straight segments, in
/// primitive order. Zero-length pieces are skipped.
pub fn collect_wall_segments(primitives: &[Primitive], cfg: &CollectorConfig) -> Vec<RawSegment> {
    collect_segments(primitives, |layer| layer_matches(layer, &cfg.wall_layer_keywords))
}

/// Every line plus the edges of every closed polyline with at least four
/// vertices, regardless of layer.
pub fn collect_all_linework(primitives: &[Primitive]) -> Vec<RawSegment> {
    let mut segs = Vec::new();
    for (idx, p) in primitives.iter().enumerate() {
        match p {
            Primitive::Line(line) => {
                push_segment(&mut segs, line.start, line.end, &line.layer, idx);
            }
            Primitive::Polyline(poly) if poly.closed && poly.vertices.len() >= 4 => {
                push_polyline(&mut segs, &poly.vertices, true, &poly.layer, idx);
            }
            _ => {}
        }
    }
    segs
}

fn collect_segments(
    primitives: &[Primitive],
    keep_layer: impl Fn(&str) -> bool,
) -> Vec<RawSegment> {
    let mut segs = Vec::new();
    for (idx, p) in primitives.iter().enumerate() {
        match p {
            Primitive::Line(line) if keep_layer(&line.layer) => {
                push_segment(&mut segs, line.start, line.end, &line.layer, idx);
            }
            Primitive::Polyline(poly) if keep_layer(&poly.layer) => {
                push_polyline(&mut segs, &poly.vertices, poly.closed, &poly.layer, idx);
            }
            _ => {}
        }
    }
    segs
}

fn push_polyline(
    segs: &mut Vec<RawSegment>,
    vertices: &[Vec2],
    closed: bool,
    layer: &str,
    idx: usize,
) {
    for pair in vertices.windows(2) {
        push_segment(segs, pair[0], pair[1], layer, idx);
    }
    if closed && vertices.len() > 2 {
        push_segment(segs, vertices[vertices.len() - 1], vertices[0], layer, idx);
    }
}

fn push_segment(segs: &mut Vec<RawSegment>, a: Vec2, b: Vec2, layer: &str, idx: usize) {
    let seg = RawSegment::new(a, b, layer, idx);
    if seg.length > 0.0 && seg.length.is_finite() {
        segs.push(seg);
    }
}
