use crate::geom::Vec2;
use crate::material::Material;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallSource {
    /// Midline between two parallel boundary segments.
    Paired,
    /// A lone segment widened by an assumed thickness.
    Single,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: String,
    pub layer: String,
    pub material: Material,
    pub color: String,
    /// Midline axis.
    pub start: Vec2,
    pub end: Vec2,
    pub length: f64,
    /// In drawing units.
    pub thickness: f64,
    pub thickness_mm: f64,
    pub source_type: WallSource,
    pub corners: [Vec2; 4],
    /// Indices into the collected segment list.
    pub segments: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub number: String,
    pub name: String,
    pub area: f64,
    pub perimeter: f64,
    pub boundary: Vec<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningKind {
    Window,
    Door,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub id: String,
    pub kind: OpeningKind,
    pub layer: String,
    /// Center of the transformed block geometry.
    pub position: Vec2,
    pub insertion_point: Vec2,
    pub width: f64,
    pub rotation: f64,
    pub host_wall_id: String,
    pub host_distance: f64,
    pub block_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BuildingModel {
    pub walls: Vec<Wall>,
    pub rooms: Vec<Room>,
    pub openings: Vec<Opening>,
}

impl BuildingModel {
    pub fn wall(&self, id: &str) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    pub fn count_openings(&self, kind: OpeningKind) -> usize {
        self.openings.iter().filter(|o| o.kind == kind).count()
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (value * f).round() / f
}

/// Rounds to a fixed number of decimals, as the JSON consumers expect.
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}
