//! Room polygons as the faces of the snapped segment graph.
//!
//! A walk leaves along an edge and, at every node, takes the unvisited edge
//! with the smallest counter-clockwise angle from the way it came in, i.e. the
//! sharpest right-hand turn. That keeps the walk on the boundary of a single
//! face. A walk that returns to its first node closes a polygon; one that runs
//! out of edges is thrown away.

use crate::structs::TopologyGraph;
use itertools::Itertools;
use nalgebra::Vector2;
use planbim_core::building::{round2, Room};
use planbim_core::config::{FaceTracing, RoomConfig};
use planbim_core::geom::Vec2;
use std::collections::HashSet;
use std::f64::consts::TAU;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct RoomExtraction {
    pub rooms: Vec<Room>,
    /// Walks cut off by `max_walk_len`.
    pub walks_abandoned: usize,
}

pub fn extract_rooms(graph: &TopologyGraph, cfg: &RoomConfig) -> RoomExtraction {
    let (faces, walks_abandoned) = match cfg.tracing {
        FaceTracing::SingleUse => trace_single_use(graph, cfg.max_walk_len),
        FaceTracing::HalfEdge => trace_half_edges(graph, cfg.max_walk_len),
    };
    if walks_abandoned > 0 {
        warn!(walks_abandoned, limit = cfg.max_walk_len, "face walks hit the step limit");
    }

    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut rooms = Vec::new();
    for face in faces {
        let mut key = face.clone();
        key.sort_unstable();
        let distinct = key.iter().dedup().count();
        if distinct != face.len() || face.len() < cfg.min_vertices {
            continue;
        }
        if !seen.insert(key) {
            continue;
        }

        let boundary: Vec<Vec2> = face.iter().map(|&n| graph.node_point(n)).collect();
        let area = polygon_area(&boundary);
        if area <= f64::EPSILON {
            continue;
        }
        let n = rooms.len() + 1;
        rooms.push(Room {
            id: format!("room-auto-{n}"),
            number: n.to_string(),
            name: format!("Room {n}"),
            area: round2(area),
            perimeter: round2(polygon_perimeter(&boundary)),
            boundary,
        });
    }

    debug!(rooms = rooms.len(), walks_abandoned, "rooms extracted");
    RoomExtraction {
        rooms,
        walks_abandoned,
    }
}

/// Counter-clockwise angle in `(0, 2π]` from `prev - cur` to `next - cur`.
/// Doubling back scores `2π`, so it only wins when nothing else is left.
fn turn_angle(graph: &TopologyGraph, prev: usize, cur: usize, next: usize) -> f64 {
    let c = graph.nodes[cur].point;
    let back: Vector2<f64> = graph.nodes[prev].point - c;
    let out: Vector2<f64> = graph.nodes[next].point - c;
    let ang = perp_dot(back, out).atan2(back.dot(&out));
    if ang > 0.0 {
        ang
    } else {
        ang + TAU
    }
}

fn perp_dot(v1: Vector2<f64>, v2: Vector2<f64>) -> f64 {
    v1.x * v2.y - v1.y * v2.x
}

/// Each undirected edge is consumed by the first walk that crosses it.
fn trace_single_use(graph: &TopologyGraph, max_steps: usize) -> (Vec<Vec<usize>>, usize) {
    let mut visited = vec![false; graph.edges.len()];
    let mut faces = Vec::new();
    let mut abandoned = 0;

    for first in &graph.edges {
        if visited[first.id] {
            continue;
        }
        visited[first.id] = true;
        let start = first.start;
        let mut path = vec![start, first.end];
        let (mut prev, mut cur) = (start, first.end);
        let mut closed = false;
        let mut exhausted = true;

        for _ in 0..max_steps {
            let next = graph
                .neighbors(cur)
                .filter(|&(e, _)| !visited[e])
                .min_by(|a, b| {
                    turn_angle(graph, prev, cur, a.1).total_cmp(&turn_angle(graph, prev, cur, b.1))
                });
            let Some((edge, node)) = next else {
                exhausted = false;
                break;
            };
            visited[edge] = true;
            if node == start {
                closed = true;
                break;
            }
            path.push(node);
            prev = cur;
            cur = node;
        }

        if closed {
            faces.push(path);
        } else if exhausted {
            abandoned += 1;
        }
    }
    (faces, abandoned)
}

/// Each directed half-edge is consumed once, so an interior wall can bound
/// the rooms on both of its sides. Dangling chains are stripped first since
/// they never bound a face, and clockwise-traced faces are kept: the one
/// counter-clockwise face per component is the unbounded outside.
fn trace_half_edges(graph: &TopologyGraph, max_steps: usize) -> (Vec<Vec<usize>>, usize) {
    let active = prune_filaments(graph);
    // [forward (start -> end), backward (end -> start)]
    let mut used = vec![[false; 2]; graph.edges.len()];
    let half = |edge: usize, from: usize| usize::from(graph.edges[edge].start != from);

    let mut faces = Vec::new();
    let mut abandoned = 0;

    for first in graph.edges.iter().filter(|e| active[e.id]) {
        for (from, to) in [(first.start, first.end), (first.end, first.start)] {
            if used[first.id][half(first.id, from)] {
                continue;
            }
            used[first.id][half(first.id, from)] = true;
            let mut path = vec![from, to];
            let (mut prev, mut cur) = (from, to);
            let mut closed = false;
            let mut exhausted = true;

            for _ in 0..max_steps {
                let next = graph
                    .neighbors(cur)
                    .filter(|&(e, _)| active[e] && !used[e][half(e, cur)])
                    .min_by(|a, b| {
                        turn_angle(graph, prev, cur, a.1)
                            .total_cmp(&turn_angle(graph, prev, cur, b.1))
                    });
                let Some((edge, node)) = next else {
                    exhausted = false;
                    break;
                };
                used[edge][half(edge, cur)] = true;
                if node == from {
                    closed = true;
                    break;
                }
                path.push(node);
                prev = cur;
                cur = node;
            }

            if closed {
                let points: Vec<Vec2> = path.iter().map(|&n| graph.node_point(n)).collect();
                if signed_area(&points) < 0.0 {
                    faces.push(path);
                }
            } else if exhausted {
                abandoned += 1;
            }
        }
    }
    (faces, abandoned)
}

/// Marks the edges that survive repeatedly removing degree-one nodes.
fn prune_filaments(graph: &TopologyGraph) -> Vec<bool> {
    let mut active = vec![true; graph.edges.len()];
    let mut degree: Vec<usize> = (0..graph.nodes.len()).map(|n| graph.degree(n)).collect();
    let mut stack: Vec<usize> = (0..graph.nodes.len()).filter(|&n| degree[n] == 1).collect();

    while let Some(node) = stack.pop() {
        if degree[node] != 1 {
            continue;
        }
        let Some((edge, other)) = graph.neighbors(node).find(|&(e, _)| active[e]) else {
            continue;
        };
        active[edge] = false;
        degree[node] -= 1;
        degree[other] -= 1;
        if degree[other] == 1 {
            stack.push(other);
        }
    }
    active
}

/// Shoelace sum over the implicitly closed ring; positive when counter-clockwise.
pub fn signed_area(points: &[Vec2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    points
        .iter()
        .copied()
        .circular_tuple_windows()
        .map(|(a, b)| a.cross(b))
        .sum::<f64>()
        / 2.0
}

pub fn polygon_area(points: &[Vec2]) -> f64 {
    signed_area(points).abs()
}

pub fn polygon_perimeter(points: &[Vec2]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .iter()
        .copied()
        .circular_tuple_windows()
        .map(|(a, b)| a.distance(b))
        .sum()
}
