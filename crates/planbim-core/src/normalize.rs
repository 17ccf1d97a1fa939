use crate::geom::Vec2;
use crate::model::{Document, Primitive};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub min_segment_length: f64,
    pub drop_degenerate_primitives: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            min_segment_length: 1e-6,
            drop_degenerate_primitives: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeStats {
    /// Top-level primitives dropped.
    pub removed_degenerate_primitives: usize,
    /// Primitives dropped inside block definitions, at any depth.
    pub removed_block_primitives: usize,
}

pub fn normalize_in_place(doc: &mut Document, cfg: &NormalizeConfig) -> NormalizeStats {
    let mut stats = NormalizeStats::default();
    if cfg.drop_degenerate_primitives {
        let min_len2 = cfg.min_segment_length * cfg.min_segment_length;
        let (top, nested) = retain_sound(&mut doc.primitives, min_len2);
        stats.removed_degenerate_primitives = top;
        stats.removed_block_primitives = nested;
    }
    stats
}

/// Returns `(removed here, removed inside nested block definitions)`.
fn retain_sound(primitives: &mut Vec<Primitive>, min_len2: f64) -> (usize, usize) {
    let mut nested = 0;
    for p in primitives.iter_mut() {
        if let Primitive::BlockDefinition(def) = p {
            let (here, deeper) = retain_sound(&mut def.primitives, min_len2);
            nested += here + deeper;
        }
    }
    let before = primitives.len();
    primitives.retain(|p| !is_degenerate(p, min_len2));
    (before - primitives.len(), nested)
}

fn is_degenerate(p: &Primitive, min_len2: f64) -> bool {
    match p {
        Primitive::Line(l) => {
            !l.start.is_finite() || !l.end.is_finite() || dist2(l.start, l.end) <= min_len2
        }
        Primitive::Polyline(pl) => {
            pl.vertices.len() < 2 || pl.vertices.iter().any(|v| !v.is_finite())
        }
        Primitive::Circle(c) => {
            !c.center.is_finite() || !c.radius.is_finite() || c.radius * c.radius <= min_len2
        }
        Primitive::Text(t) => !t.at.is_finite(),
        Primitive::BlockInstance(b) => {
            !b.position.is_finite() || !b.scale.is_finite() || !b.rotation.is_finite()
        }
        Primitive::BlockDefinition(_) => false,
    }
}

fn dist2(a: Vec2, b: Vec2) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
