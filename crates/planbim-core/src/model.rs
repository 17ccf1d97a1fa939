use crate::geom::{BBox2, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Units {
    #[default]
    Unknown,
    Inches,
    Millimeters,
    Centimeters,
    Meters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePrim {
    pub start: Vec2,
    pub end: Vec2,
    pub layer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylinePrim {
    pub vertices: Vec<Vec2>,
    pub closed: bool,
    pub layer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CirclePrim {
    pub center: Vec2,
    pub radius: f64,
    pub layer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrim {
    pub text: String,
    pub at: Vec2,
    pub height: Option<f64>,
    pub layer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInstance {
    pub name: String,
    pub position: Vec2,
    /// Degrees, counter-clockwise.
    pub rotation: f64,
    pub scale: Vec2,
    pub layer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub name: String,
    pub base_point: Vec2,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Line(LinePrim),
    Polyline(PolylinePrim),
    Circle(CirclePrim),
    Text(TextPrim),
    BlockInstance(BlockInstance),
    BlockDefinition(BlockDefinition),
}

impl Primitive {
    pub fn layer(&self) -> Option<&str> {
        match self {
            Primitive::Line(l) => Some(&l.layer),
            Primitive::Polyline(p) => Some(&p.layer),
            Primitive::Circle(c) => Some(&c.layer),
            Primitive::Text(t) => Some(&t.layer),
            Primitive::BlockInstance(b) => Some(&b.layer),
            Primitive::BlockDefinition(_) => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Primitive::Line(_) => "line",
            Primitive::Polyline(_) => "polyline",
            Primitive::Circle(_) => "circle",
            Primitive::Text(_) => "text",
            Primitive::BlockInstance(_) => "block_instance",
            Primitive::BlockDefinition(_) => "block_definition",
        }
    }

    /// Bounding box of the drawable geometry. Block instances contribute
    /// their insertion point only; definitions contribute nothing.
    pub fn bbox(&self) -> BBox2 {
        let mut bbox = BBox2::empty();
        match self {
            Primitive::Line(line) => {
                bbox.include_point(line.start);
                bbox.include_point(line.end);
            }
            Primitive::Polyline(poly) => {
                for v in &poly.vertices {
                    bbox.include_point(*v);
                }
            }
            Primitive::Circle(c) => {
                bbox.include_point(Vec2::new(c.center.x - c.radius, c.center.y - c.radius));
                bbox.include_point(Vec2::new(c.center.x + c.radius, c.center.y + c.radius));
            }
            Primitive::Text(t) => bbox.include_point(t.at),
            Primitive::BlockInstance(b) => bbox.include_point(b.position),
            Primitive::BlockDefinition(_) => {}
        }
        bbox
    }
}

/// One analysed drawing: the ordered primitive stream handed over by a reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Document {
    pub units: Units,
    pub primitives: Vec<Primitive>,
}

impl Document {
    pub fn new(units: Units, primitives: Vec<Primitive>) -> Self {
        Self { units, primitives }
    }

    pub fn block_instances(&self) -> impl Iterator<Item = &BlockInstance> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::BlockInstance(b) => Some(b),
            _ => None,
        })
    }

    pub fn block_definitions(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::BlockDefinition(b) => Some(b),
            _ => None,
        })
    }

    pub fn extents(&self) -> Option<BBox2> {
        let mut bbox = BBox2::empty();
        for p in &self.primitives {
            let b = p.bbox();
            if !b.is_empty() {
                bbox.include_point(b.min);
                bbox.include_point(b.max);
            }
        }
        if bbox.is_empty() { None } else { Some(bbox) }
    }
}

/// A straight piece of wall-candidate linework, flattened out of a line or
/// polyline. `source` is the index of the originating primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    pub start: Vec2,
    pub end: Vec2,
    pub layer: String,
    pub length: f64,
    pub source: usize,
}

impl RawSegment {
    pub fn new(start: Vec2, end: Vec2, layer: &str, source: usize) -> Self {
        Self {
            start,
            end,
            layer: layer.to_string(),
            length: start.distance(end),
            source,
        }
    }

    pub fn direction(&self) -> Vec2 {
        (self.end - self.start).normalized()
    }
}
