use anyhow::{Context, Result};
use planbim_core::error::BuildError;
use planbim_core::geom::Vec2;
use planbim_core::model::{
    BlockDefinition, BlockInstance, CirclePrim, Document, LinePrim, PolylinePrim, Primitive,
    TextPrim, Units,
};
use dxf::entities::EntityType;
use std::path::Path;
use tracing::debug;

/// Reads a DXF file into the primitive stream the pipeline consumes. Inserts
/// stay as block instances; every block table entry becomes a definition.
pub fn import_dxf(path: &Path) -> Result<Document> {
    let drawing = dxf::Drawing::load_file(path)
        .map_err(|e| BuildError::empty(format!("cannot read DXF: {e}")))
        .with_context(|| format!("load DXF: {path:?}"))?;
    Ok(convert_drawing(&drawing))
}

/// Same as [`import_dxf`] for an in-memory drawing.
pub fn convert_drawing(drawing: &dxf::Drawing) -> Document {
    let mut importer = DxfImporter::default();
    for ent in drawing.entities() {
        importer.import_entity(ent, false);
    }
    let top_level = importer.primitives.len();
    for block in drawing.blocks() {
        let mut inner = DxfImporter::default();
        for ent in &block.entities {
            inner.import_entity(ent, true);
        }
        importer.primitives.push(Primitive::BlockDefinition(BlockDefinition {
            name: block.name.clone(),
            base_point: Vec2::new(block.base_point.x, block.base_point.y),
            primitives: inner.primitives,
        }));
        importer.skipped += inner.skipped;
    }
    debug!(
        primitives = top_level,
        blocks = importer.primitives.len() - top_level,
        skipped = importer.skipped,
        "DXF converted"
    );

    Document {
        units: map_units(drawing.header.default_drawing_units),
        primitives: importer.primitives,
    }
}

#[derive(Default)]
struct DxfImporter {
    primitives: Vec<Primitive>,
    skipped: usize,
}

impl DxfImporter {
    fn import_entity(&mut self, ent: &dxf::entities::Entity, in_block: bool) {
        let layer = ent.common.layer.clone();
        match &ent.specific {
            EntityType::Line(line) => {
                self.primitives.push(Primitive::Line(LinePrim {
                    start: Vec2::new(line.p1.x, line.p1.y),
                    end: Vec2::new(line.p2.x, line.p2.y),
                    layer,
                }));
            }
            EntityType::LwPolyline(poly) => {
                let vertices = poly.vertices.iter().map(|v| Vec2::new(v.x, v.y)).collect();
                self.primitives.push(Primitive::Polyline(PolylinePrim {
                    vertices,
                    closed: poly.is_closed(),
                    layer,
                }));
            }
            EntityType::Polyline(poly) => {
                let vertices = poly
                    .vertices()
                    .map(|v| Vec2::new(v.location.x, v.location.y))
                    .collect();
                self.primitives.push(Primitive::Polyline(PolylinePrim {
                    vertices,
                    closed: poly.is_closed(),
                    layer,
                }));
            }
            EntityType::Circle(circle) => {
                self.primitives.push(Primitive::Circle(CirclePrim {
                    center: Vec2::new(circle.center.x, circle.center.y),
                    radius: circle.radius,
                    layer,
                }));
            }
            // Door swings live in blocks as arcs; sampled so they count toward
            // the block's extent. Model-space arcs are not wall linework.
            EntityType::Arc(arc) if in_block => {
                let vertices = arc_points(
                    Vec2::new(arc.center.x, arc.center.y),
                    arc.radius,
                    arc.start_angle,
                    arc.end_angle,
                    16,
                );
                if vertices.len() >= 2 {
                    self.primitives.push(Primitive::Polyline(PolylinePrim {
                        vertices,
                        closed: false,
                        layer,
                    }));
                }
            }
            EntityType::Insert(insert) => self.import_insert(insert, layer),
            EntityType::Text(t) => {
                self.primitives.push(Primitive::Text(TextPrim {
                    text: t.value.clone(),
                    at: Vec2::new(t.location.x, t.location.y),
                    height: Some(t.text_height),
                    layer,
                }));
            }
            EntityType::MText(t) => {
                self.primitives.push(Primitive::Text(TextPrim {
                    text: join_mtext(t),
                    at: Vec2::new(t.insertion_point.x, t.insertion_point.y),
                    height: Some(t.initial_text_height),
                    layer,
                }));
            }
            _ => {
                self.skipped += 1;
            }
        }
    }

    /// One instance per array cell; plain inserts are a 1x1 array.
    fn import_insert(&mut self, insert: &dxf::entities::Insert, layer: String) {
        let location = Vec2::new(insert.location.x, insert.location.y);
        let scale = Vec2::new(insert.x_scale_factor, insert.y_scale_factor);
        let (sin, cos) = insert.rotation.to_radians().sin_cos();
        let col_count = insert.column_count.max(1);
        let row_count = insert.row_count.max(1);

        for row in 0..row_count {
            for col in 0..col_count {
                let dx = f64::from(col) * insert.column_spacing;
                let dy = f64::from(row) * insert.row_spacing;
                let position = Vec2::new(
                    location.x + cos * dx - sin * dy,
                    location.y + sin * dx + cos * dy,
                );
                self.primitives.push(Primitive::BlockInstance(BlockInstance {
                    name: insert.name.clone(),
                    position,
                    rotation: insert.rotation,
                    scale,
                    layer: layer.clone(),
                }));
            }
        }
    }
}

fn map_units(units: dxf::enums::Units) -> Units {
    match units {
        dxf::enums::Units::Inches => Units::Inches,
        dxf::enums::Units::Millimeters => Units::Millimeters,
        dxf::enums::Units::Centimeters => Units::Centimeters,
        dxf::enums::Units::Meters => Units::Meters,
        _ => Units::Unknown,
    }
}

fn arc_points(
    center: Vec2,
    radius: f64,
    start_deg: f64,
    end_deg: f64,
    segments: usize,
) -> Vec<Vec2> {
    if !radius.is_finite() || radius <= 0.0 || segments < 2 {
        return Vec::new();
    }
    let a0 = start_deg.to_radians();
    let mut a1 = end_deg.to_radians();
    if a1 < a0 {
        a1 += std::f64::consts::TAU;
    }
    (0..=segments)
        .map(|i| {
            let a = a0 + (a1 - a0) * (i as f64 / segments as f64);
            Vec2::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

fn join_mtext(t: &dxf::entities::MText) -> String {
    let mut s = String::new();
    for part in &t.extended_text {
        s.push_str(part);
    }
    s.push_str(&t.text);
    s
}
