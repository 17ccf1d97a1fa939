//! Doors and windows: block instances classified by layer or block name and
//! attached to the nearest wall axis.

use planbim_core::building::{round2, Opening, OpeningKind, Wall};
use planbim_core::config::OpeningConfig;
use planbim_core::geom::{distance_point_to_segment, BBox2, Transform2D, Vec2};
use planbim_core::material::layer_matches;
use planbim_core::model::{BlockDefinition, BlockInstance, Document, Primitive};
use planbim_core::units::UnitResolver;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct BindOutcome {
    pub openings: Vec<Opening>,
    /// Classified instances with no wall inside the tolerance.
    pub unbound: usize,
}

pub struct OpeningBinder<'a> {
    cfg: &'a OpeningConfig,
    units: UnitResolver<'a>,
    blocks: HashMap<String, &'a BlockDefinition>,
}

impl<'a> OpeningBinder<'a> {
    pub fn new(cfg: &'a OpeningConfig, units: UnitResolver<'a>, doc: &'a Document) -> Self {
        let mut blocks = HashMap::new();
        for def in doc.block_definitions() {
            blocks.insert(def.name.to_lowercase(), def);
        }
        Self { cfg, units, blocks }
    }

    pub fn bind<'i>(
        &self,
        instances: impl IntoIterator<Item = &'i BlockInstance>,
        walls: &[Wall],
    ) -> BindOutcome {
        let mut out = BindOutcome::default();
        for inst in instances {
            let Some(kind) = self.classify(inst) else {
                continue;
            };
            let position = self.resolve_center(inst);
            match nearest_wall(position, walls, self.cfg.tolerance) {
                Some((wall, distance)) => {
                    let n = out.openings.len() + 1;
                    out.openings.push(Opening {
                        id: format!("opening-{n}"),
                        kind,
                        layer: inst.layer.clone(),
                        position,
                        insertion_point: inst.position,
                        width: round2(self.width(inst, kind)),
                        rotation: inst.rotation,
                        host_wall_id: wall.id.clone(),
                        host_distance: distance,
                        block_name: inst.name.clone(),
                    });
                }
                None => {
                    out.unbound += 1;
                    debug!(
                        block = %inst.name,
                        ?kind,
                        x = position.x,
                        y = position.y,
                        "opening has no wall within tolerance, dropped"
                    );
                }
            }
        }
        out
    }

    /// Layer keywords decide first; the block name is only consulted when the
    /// layer says nothing.
    pub fn classify(&self, inst: &BlockInstance) -> Option<OpeningKind> {
        let cfg = self.cfg;
        if layer_matches(&inst.layer, &cfg.window_layer_keywords) {
            return Some(OpeningKind::Window);
        }
        if layer_matches(&inst.layer, &cfg.door_layer_keywords) {
            return Some(OpeningKind::Door);
        }
        if layer_matches(&inst.name, &cfg.window_name_keywords) {
            return Some(OpeningKind::Window);
        }
        if layer_matches(&inst.name, &cfg.door_name_keywords) {
            return Some(OpeningKind::Door);
        }
        None
    }

    /// Bounding-box center of the block's geometry after placement. Falls back
    /// to the insertion point when the block is unknown or holds no geometry.
    pub fn resolve_center(&self, inst: &BlockInstance) -> Vec2 {
        let Some(def) = self.blocks.get(&inst.name.to_lowercase()) else {
            return inst.position;
        };
        let tx = Transform2D::from_insert(def.base_point, inst.position, inst.scale, inst.rotation);
        let mut bbox = BBox2::empty();
        let mut stack = vec![def.name.to_lowercase()];
        self.gather_points(def, &tx, &mut stack, &mut bbox);
        if bbox.is_empty() {
            inst.position
        } else {
            bbox.center()
        }
    }

    fn gather_points(
        &self,
        def: &BlockDefinition,
        tx: &Transform2D,
        stack: &mut Vec<String>,
        bbox: &mut BBox2,
    ) {
        for p in &def.primitives {
            match p {
                Primitive::Line(l) => {
                    bbox.include_point(tx.apply_point(l.start));
                    bbox.include_point(tx.apply_point(l.end));
                }
                Primitive::Polyline(pl) => {
                    for v in &pl.vertices {
                        bbox.include_point(tx.apply_point(*v));
                    }
                }
                Primitive::Circle(c) => {
                    let r = c.radius;
                    for offset in [
                        Vec2::new(r, 0.0),
                        Vec2::new(0.0, r),
                        Vec2::new(-r, 0.0),
                        Vec2::new(0.0, -r),
                    ] {
                        bbox.include_point(tx.apply_point(c.center + offset));
                    }
                }
                Primitive::BlockInstance(nested) => {
                    if stack.len() > self.cfg.max_block_depth {
                        continue;
                    }
                    let name = nested.name.to_lowercase();
                    if stack.contains(&name) {
                        continue;
                    }
                    let Some(inner) = self.blocks.get(&name) else {
                        continue;
                    };
                    let local = Transform2D::from_insert(
                        inner.base_point,
                        nested.position,
                        nested.scale,
                        nested.rotation,
                    );
                    let combined = tx.compose(&local);
                    stack.push(name);
                    self.gather_points(inner, &combined, stack, bbox);
                    stack.pop();
                }
                Primitive::Text(_) | Primitive::BlockDefinition(_) => {}
            }
        }
    }

    pub fn width(&self, inst: &BlockInstance, kind: OpeningKind) -> f64 {
        let fallback = match kind {
            OpeningKind::Door => self.cfg.default_door_width,
            OpeningKind::Window => self.cfg.default_window_width,
        };
        self.units
            .opening_width(inst.scale.x.abs(), self.cfg.min_width, fallback)
    }
}

/// Wall whose axis is closest to `p`, provided it is strictly within
/// `tolerance`. Ties keep the earlier wall.
pub fn nearest_wall(p: Vec2, walls: &[Wall], tolerance: f64) -> Option<(&Wall, f64)> {
    let mut best: Option<(&Wall, f64)> = None;
    for wall in walls {
        let d = distance_point_to_segment(p, wall.start, wall.end);
        if d < tolerance && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((wall, d));
        }
    }
    best
}
