use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
}

impl Warning {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub primitives_total: usize,
    pub primitives_normalized: usize,
    /// `primitives_total - primitives_normalized`.
    pub removed_degenerate_primitives: usize,
    pub removed_block_primitives: usize,
    pub texts_total: usize,
    pub block_instances_total: usize,
    pub segments_collected: usize,
    pub walls_paired: usize,
    pub walls_single: usize,
    pub rooms_total: usize,
    pub openings_bound: usize,
    pub openings_unbound: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub components: usize,
    pub walks_abandoned: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub stats: StatsReport,
    pub wall_layers_used: Vec<String>,
    pub graph: GraphStats,
    pub warnings: Vec<Warning>,
}

impl BuildReport {
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}
