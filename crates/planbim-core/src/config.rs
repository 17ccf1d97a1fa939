//! Every tolerance the pipeline depends on, in one serde-loadable tree.
//!
//! All sections default to the values the reconstruction was tuned with, and
//! every section is `#[serde(default)]`, so a JSON file only has to name the
//! fields it overrides.

use crate::error::{BuildError, BuildResult};
use crate::material::MaterialConfig;
use crate::normalize::NormalizeConfig;
use crate::units::UnitConfig;
use serde::{Deserialize, Serialize};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Case-insensitive substrings marking a layer as wall linework.
    pub wall_layer_keywords: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            wall_layer_keywords: words(&[
                "СТЕНА",
                "СТЕНЫ",
                "STENA",
                "СТЕНЫ2",
                "AR_WALL_OUTER",
                "AR_WALL_INNER",
                "АР_Газоблок наруж",
                "АР_Газоблок 200мм",
                "АР_ГКЛ",
                "АР_Монолит",
                "PEREG",
                "PARTITION",
                "GKL",
                "BRICK",
                "GAS",
                "ПЕРЕГОРОДКИ",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    /// Segments are parallel when `| |d1·d2| - 1 | < parallel_epsilon`.
    pub parallel_epsilon: f64,
    /// Exclusive thickness window for pairing, in drawing units.
    pub min_thickness: f64,
    pub max_thickness: f64,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            parallel_epsilon: 0.01,
            min_thickness: 0.08,
            max_thickness: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub snap_grid: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { snap_grid: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoomSource {
    /// Wall-layer segments from the collector.
    #[default]
    CollectedSegments,
    /// Reconstructed wall midlines.
    WallAxes,
    /// Every line plus every closed polyline of four or more vertices, on any layer.
    AllLinework,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FaceTracing {
    /// Each undirected edge is walked at most once.
    #[default]
    SingleUse,
    /// Each directed half-edge is walked at most once; adjacent rooms may
    /// share a wall.
    HalfEdge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub source: RoomSource,
    pub tracing: FaceTracing,
    pub max_walk_len: usize,
    pub min_vertices: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            source: RoomSource::CollectedSegments,
            tracing: FaceTracing::SingleUse,
            max_walk_len: 200,
            min_vertices: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningConfig {
    /// Exclusive upper bound on the opening-to-wall-axis distance.
    pub tolerance: f64,
    pub window_layer_keywords: Vec<String>,
    pub door_layer_keywords: Vec<String>,
    pub window_name_keywords: Vec<String>,
    pub door_name_keywords: Vec<String>,
    /// Widths (meters) under this are replaced by the per-kind default.
    pub min_width: f64,
    pub default_door_width: f64,
    pub default_window_width: f64,
    /// Nesting limit when resolving block geometry.
    pub max_block_depth: usize,
}

impl Default for OpeningConfig {
    fn default() -> Self {
        Self {
            tolerance: 1000.0,
            window_layer_keywords: words(&["ОКНА", "ВИТРАЖИ", "WINDOW"]),
            door_layer_keywords: words(&["ДВЕРЬ", "DOOR"]),
            window_name_keywords: words(&["WINDOW", "ВИТРАЖ", "ОКНО", "WIN"]),
            door_name_keywords: words(&["ДВЕРЬ", "DOOR", "ДВ"]),
            min_width: 0.2,
            default_door_width: 0.9,
            default_window_width: 1.2,
            max_block_depth: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BuildConfig {
    pub normalize: NormalizeConfig,
    pub collector: CollectorConfig,
    pub walls: WallConfig,
    pub graph: GraphConfig,
    pub rooms: RoomConfig,
    pub openings: OpeningConfig,
    pub units: UnitConfig,
    pub materials: MaterialConfig,
}

impl BuildConfig {
    pub fn validate(&self) -> BuildResult<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(BuildError::invalid_config(format!("{name} must be positive, got {v}")))
            }
        };
        positive("graph.snap_grid", self.graph.snap_grid)?;
        positive("openings.tolerance", self.openings.tolerance)?;
        positive("walls.parallel_epsilon", self.walls.parallel_epsilon)?;
        positive("walls.max_thickness", self.walls.max_thickness)?;
        let walls = &self.walls;
        if !(walls.min_thickness >= 0.0 && walls.min_thickness < walls.max_thickness) {
            return Err(BuildError::invalid_config(format!(
                "thickness window is empty: ({}, {})",
                walls.min_thickness, walls.max_thickness
            )));
        }
        if self.rooms.max_walk_len == 0 {
            return Err(BuildError::invalid_config("rooms.max_walk_len must be at least 1"));
        }
        if self.rooms.min_vertices < 3 {
            return Err(BuildError::invalid_config("rooms.min_vertices must be at least 3"));
        }
        Ok(())
    }
}
