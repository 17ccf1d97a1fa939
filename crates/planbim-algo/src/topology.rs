use crate::structs::{GraphEdge, GraphNode, TopologyGraph};
use nalgebra::Point2;
use planbim_core::config::GraphConfig;
use planbim_core::geom::Vec2;
use planbim_core::model::RawSegment;
use std::collections::HashMap;
use tracing::debug;

/// Rounds a point onto the `k`-spaced grid. Half-cell ties go to the even
/// cell.
pub fn snap(p: Vec2, k: f64) -> Vec2 {
    let (ix, iy) = grid_index(p, k);
    Vec2::new(ix * k + 0.0, iy * k + 0.0)
}

/// Cell index per axis, kept in `f64` so huge coordinates never saturate.
/// Adding zero folds `-0.0` into `0.0`.
fn grid_index(p: Vec2, k: f64) -> (f64, f64) {
    (
        (p.x / k).round_ties_even() + 0.0,
        (p.y / k).round_ties_even() + 0.0,
    )
}

fn grid_cell(p: Vec2, k: f64) -> (u64, u64) {
    let (ix, iy) = grid_index(p, k);
    (ix.to_bits(), iy.to_bits())
}

/// Merges endpoints falling into the same grid cell and links them with one
/// edge per distinct node pair.
pub fn build_topology(segments: &[RawSegment], cfg: &GraphConfig) -> TopologyGraph {
    let k = cfg.snap_grid;
    let mut graph = TopologyGraph::default();
    let mut cells: HashMap<(u64, u64), usize> = HashMap::new();
    let mut pairs: HashMap<(usize, usize), usize> = HashMap::new();

    let mut node_for = |graph: &mut TopologyGraph, p: Vec2, seg: usize| -> usize {
        let id = *cells.entry(grid_cell(p, k)).or_insert_with(|| {
            let id = graph.nodes.len();
            let snapped = snap(p, k);
            graph.nodes.push(GraphNode {
                id,
                point: Point2::new(snapped.x, snapped.y),
                segments: Vec::new(),
                edges: Vec::new(),
            });
            id
        });
        let node = &mut graph.nodes[id];
        if node.segments.last() != Some(&seg) {
            node.segments.push(seg);
        }
        id
    };

    for (seg_idx, seg) in segments.iter().enumerate() {
        let a = node_for(&mut graph, seg.start, seg_idx);
        let b = node_for(&mut graph, seg.end, seg_idx);
        if a == b {
            continue;
        }
        let key = (a.min(b), a.max(b));
        match pairs.get(&key) {
            Some(&edge) => graph.edges[edge].segments.push(seg_idx),
            None => {
                let id = graph.edges.len();
                graph.edges.push(GraphEdge {
                    id,
                    start: a,
                    end: b,
                    segments: vec![seg_idx],
                });
                graph.nodes[a].edges.push(id);
                graph.nodes[b].edges.push(id);
                pairs.insert(key, id);
            }
        }
    }

    debug!(
        segments = segments.len(),
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "topology graph built"
    );
    graph
}

/// Groups nodes connected through edges. Isolated nodes form their own group.
pub fn connected_components(graph: &TopologyGraph) -> Vec<Vec<usize>> {
    let mut dsu = DisjointSet::new(graph.nodes.len());
    for edge in &graph.edges {
        dsu.union(edge.start, edge.end);
    }

    let mut groups: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<usize>> = Vec::new();
    for node in 0..graph.nodes.len() {
        let root = dsu.find(node);
        let slot = *groups.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(node);
    }
    components
}

#[derive(Debug, Clone)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let mut ra = self.find(a);
        let mut rb = self.find(b);
        if ra == rb {
            return;
        }
        if self.rank[ra] < self.rank[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        if self.rank[ra] == self.rank[rb] {
            self.rank[ra] = self.rank[ra].saturating_add(1);
        }
    }
}
