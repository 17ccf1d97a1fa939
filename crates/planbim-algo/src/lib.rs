//! The reconstruction pipeline: collected segments become walls, the snapped
//! segment graph yields rooms, and opening blocks are bound to walls.
//!
//! Every stage is a plain function of its inputs and the configuration, so
//! independent documents can be processed concurrently without coordination.

use planbim_core::building::{BuildingModel, WallSource};
use planbim_core::collect::{collect_all_linework, collect_wall_segments};
use planbim_core::config::{BuildConfig, RoomSource};
use planbim_core::error::{BuildError, BuildResult};
use planbim_core::model::{Document, Primitive, RawSegment};
use planbim_core::normalize::normalize_in_place;
use planbim_core::report::{BuildReport, GraphStats, StatsReport, Warning};
use planbim_core::units::UnitResolver;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

pub mod openings;
pub mod rooms;
pub mod structs;
pub mod topology;
pub mod walls;

use openings::OpeningBinder;
use walls::WallReconstructor;

#[derive(Debug, Clone, Serialize)]
pub struct BuildOutput {
    pub model: BuildingModel,
    pub report: BuildReport,
}

pub fn build_model(doc: &Document, cfg: &BuildConfig) -> BuildResult<BuildOutput> {
    cfg.validate()?;
    if doc.primitives.is_empty() {
        return Err(BuildError::empty("document has no primitives"));
    }

    // 1. Drop malformed entities
    let mut normalized = doc.clone();
    let normalize_stats = normalize_in_place(&mut normalized, &cfg.normalize);
    if normalized.primitives.is_empty() {
        return Err(BuildError::empty(format!(
            "all {} primitives were degenerate",
            doc.primitives.len()
        )));
    }
    let units = UnitResolver::new(&cfg.units, normalized.units);

    // 2. Wall linework
    let segments = collect_wall_segments(&normalized.primitives, &cfg.collector);
    debug!(segments = segments.len(), "wall segments collected");

    // 3. Walls
    let walls = WallReconstructor::new(&cfg.walls, &cfg.materials, units).reconstruct(&segments);

    // 4. Room graph + faces
    let room_segments = match cfg.rooms.source {
        RoomSource::CollectedSegments => segments.clone(),
        RoomSource::WallAxes => walls
            .iter()
            .enumerate()
            .map(|(i, w)| RawSegment::new(w.start, w.end, &w.layer, i))
            .collect(),
        RoomSource::AllLinework => collect_all_linework(&normalized.primitives),
    };
    let graph = topology::build_topology(&room_segments, &cfg.graph);
    let components = topology::connected_components(&graph).len();
    let extraction = rooms::extract_rooms(&graph, &cfg.rooms);

    // 5. Openings
    let binder = OpeningBinder::new(&cfg.openings, units, &normalized);
    let bound = binder.bind(normalized.block_instances(), &walls);

    let walls_paired = walls
        .iter()
        .filter(|w| w.source_type == WallSource::Paired)
        .count();
    let stats = StatsReport {
        primitives_total: doc.primitives.len(),
        primitives_normalized: normalized.primitives.len(),
        removed_degenerate_primitives: normalize_stats.removed_degenerate_primitives,
        removed_block_primitives: normalize_stats.removed_block_primitives,
        texts_total: count(&normalized, |p| matches!(p, Primitive::Text(_))),
        block_instances_total: count(&normalized, |p| matches!(p, Primitive::BlockInstance(_))),
        segments_collected: segments.len(),
        walls_paired,
        walls_single: walls.len() - walls_paired,
        rooms_total: extraction.rooms.len(),
        openings_bound: bound.openings.len(),
        openings_unbound: bound.unbound,
    };

    let mut warnings = Vec::new();
    if segments.is_empty() {
        warnings.push(Warning::new(
            "no_wall_segments",
            "No linework on wall layers; check the layer keyword configuration.",
        ));
    }
    if extraction.rooms.is_empty() {
        warnings.push(Warning::new("no_rooms", "No closed boundary was found."));
    }
    if bound.unbound > 0 {
        warnings.push(Warning::new(
            "openings_unbound",
            format!(
                "{} opening(s) had no wall within {} units and were dropped.",
                bound.unbound, cfg.openings.tolerance
            ),
        ));
    }
    if extraction.walks_abandoned > 0 {
        warnings.push(Warning::new(
            "walk_limit_reached",
            format!(
                "{} face walk(s) exceeded {} steps.",
                extraction.walks_abandoned, cfg.rooms.max_walk_len
            ),
        ));
    }

    let wall_layers_used: Vec<String> = walls
        .iter()
        .map(|w| w.layer.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    Ok(BuildOutput {
        model: BuildingModel {
            walls,
            rooms: extraction.rooms,
            openings: bound.openings,
        },
        report: BuildReport {
            stats,
            wall_layers_used,
            graph: GraphStats {
                nodes: graph.nodes.len(),
                edges: graph.edges.len(),
                components,
                walks_abandoned: extraction.walks_abandoned,
            },
            warnings,
        },
    })
}

fn count(doc: &Document, pred: impl Fn(&Primitive) -> bool) -> usize {
    doc.primitives.iter().filter(|p| pred(p)).count()
}
