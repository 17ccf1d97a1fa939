//! Pairing of parallel boundary lines into thickness-bearing walls.
//!
//! Pairing is greedy: segments are visited in input order and each one takes
//! the widest qualifying partner still available. This is not a global
//! optimum, and a different input order can pair differently on layouts
//! where several lines compete for the same partner.

use planbim_core::building::{round1, Wall, WallSource};
use planbim_core::config::WallConfig;
use planbim_core::geom::{distance_point_to_segment, Vec2};
use planbim_core::material::MaterialConfig;
use planbim_core::model::RawSegment;
use planbim_core::units::UnitResolver;
use tracing::debug;

pub struct WallReconstructor<'a> {
    cfg: &'a WallConfig,
    materials: &'a MaterialConfig,
    units: UnitResolver<'a>,
}

struct Pairing {
    partner: usize,
    thickness: f64,
    start: Vec2,
    end: Vec2,
}

impl<'a> WallReconstructor<'a> {
    pub fn new(
        cfg: &'a WallConfig,
        materials: &'a MaterialConfig,
        units: UnitResolver<'a>,
    ) -> Self {
        Self {
            cfg,
            materials,
            units,
        }
    }

    /// Every segment ends up in at most one wall: paired walls first, in
    /// discovery order, then one single-line wall per leftover segment.
    pub fn reconstruct(&self, segments: &[RawSegment]) -> Vec<Wall> {
        let mut consumed = vec![false; segments.len()];
        let mut walls = Vec::new();

        for i in 0..segments.len() {
            if consumed[i] {
                continue;
            }
            let mut best: Option<Pairing> = None;
            for j in 0..segments.len() {
                if j == i || consumed[j] {
                    continue;
                }
                if let Some(p) = self.try_pair(&segments[i], &segments[j], j) {
                    if best.as_ref().map_or(true, |b| p.thickness > b.thickness) {
                        best = Some(p);
                    }
                }
            }
            if let Some(p) = best {
                consumed[i] = true;
                consumed[p.partner] = true;
                walls.push(self.paired_wall(&segments[i], i, p, walls.len() + 1));
            }
        }
        let paired = walls.len();

        for (i, seg) in segments.iter().enumerate() {
            if !consumed[i] {
                walls.push(self.single_wall(seg, i, walls.len() + 1));
            }
        }

        debug!(
            segments = segments.len(),
            paired,
            single = walls.len() - paired,
            "walls reconstructed"
        );
        walls
    }

    fn try_pair(&self, s1: &RawSegment, s2: &RawSegment, partner: usize) -> Option<Pairing> {
        let dot = s1.direction().dot(s2.direction()).abs();
        if (dot - 1.0).abs() >= self.cfg.parallel_epsilon {
            return None;
        }

        let d_start = distance_point_to_segment(s2.start, s1.start, s1.end);
        let d_end = distance_point_to_segment(s2.end, s1.start, s1.end);
        let thickness = (d_start + d_end) / 2.0;
        if !(thickness > self.cfg.min_thickness && thickness < self.cfg.max_thickness) {
            return None;
        }

        let (start, end) = midline(s1, s2);
        if start.distance(end) <= 0.0 {
            return None;
        }
        Some(Pairing {
            partner,
            thickness,
            start,
            end,
        })
    }

    fn paired_wall(&self, s1: &RawSegment, index: usize, p: Pairing, n: usize) -> Wall {
        let material = self.materials.classify(&s1.layer);
        let mut segments = vec![index, p.partner];
        segments.sort_unstable();
        Wall {
            id: format!("wall-{n}"),
            layer: s1.layer.clone(),
            material,
            color: material.color().to_string(),
            start: p.start,
            end: p.end,
            length: p.start.distance(p.end),
            thickness: p.thickness,
            thickness_mm: round1(self.units.to_millimeters(p.thickness)),
            source_type: WallSource::Paired,
            corners: wall_corners(p.start, p.end, p.thickness),
            segments,
        }
    }

    fn single_wall(&self, seg: &RawSegment, index: usize, n: usize) -> Wall {
        let material = self.materials.classify(&seg.layer);
        let meters = self.materials.assumed_thickness(material);
        let thickness = self.units.thickness_in_drawing_units(meters, seg.length);
        Wall {
            id: format!("wall-{n}"),
            layer: seg.layer.clone(),
            material,
            color: material.color().to_string(),
            start: seg.start,
            end: seg.end,
            length: seg.length,
            thickness,
            thickness_mm: round1(self.units.to_millimeters(thickness)),
            source_type: WallSource::Single,
            corners: wall_corners(seg.start, seg.end, thickness),
            segments: vec![index],
        }
    }
}

/// Averages corresponding endpoints, pairing `s1.start` with whichever end of
/// `s2` lies closer so antiparallel lines do not cross over.
pub fn midline(s1: &RawSegment, s2: &RawSegment) -> (Vec2, Vec2) {
    let (a2, b2) = if s1.start.distance(s2.start) < s1.start.distance(s2.end) {
        (s2.start, s2.end)
    } else {
        (s2.end, s2.start)
    };
    (s1.start.midpoint(a2), s1.end.midpoint(b2))
}

/// Rectangle around the axis, offset by half the thickness to either side.
pub fn wall_corners(start: Vec2, end: Vec2, thickness: f64) -> [Vec2; 4] {
    let offset = (end - start).perp().normalized() * (thickness / 2.0);
    [start + offset, end + offset, end - offset, start - offset]
}
