use nalgebra::Point2;
use planbim_core::geom::Vec2;

/// A snapped graph vertex. Identity is its grid cell.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: usize,
    pub point: Point2<f64>,
    /// Segments with an endpoint in this cell.
    pub segments: Vec<usize>,
    /// Incident edges, in insertion order.
    pub edges: Vec<usize>,
}

/// Undirected edge between two distinct nodes. Segments that snap onto the
/// same node pair share one edge.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub id: usize,
    pub start: usize,
    pub end: usize,
    pub segments: Vec<usize>,
}

impl GraphEdge {
    pub fn other(&self, node: usize) -> usize {
        if self.start == node {
            self.end
        } else {
            self.start
        }
    }
}

/// Arena-backed planar graph; nodes and edges refer to each other by index.
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl TopologyGraph {
    pub fn node_point(&self, node: usize) -> Vec2 {
        let p = self.nodes[node].point;
        Vec2::new(p.x, p.y)
    }

    /// `(edge, neighbour)` pairs around `node`.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes[node]
            .edges
            .iter()
            .map(move |&e| (e, self.edges[e].other(node)))
    }

    pub fn degree(&self, node: usize) -> usize {
        self.nodes[node].edges.len()
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).any(|(_, n)| n == b)
    }
}
