use serde::{Deserialize, Serialize};

use crate::geopoint::GeoPoint;

pub type NodeId = usize;
pub type EdgeId = usize;

/// Default speed assumed for edges without a posted limit, in km/h.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Physical edge length in meters.
    pub length: f64,
    /// Posted speed limit in km/h, when the source map carries one.
    pub max_speed: Option<f64>,
}

impl GraphEdge {
    pub fn speed_kmh(&self) -> f64 {
        match self.max_speed {
            Some(speed) if speed > 0.0 => speed,
            _ => DEFAULT_SPEED_KMH,
        }
    }

    /// Travel time over this edge in minutes.
    pub fn travel_minutes(&self) -> f64 {
        let meters_per_minute = self.speed_kmh() * 1000.0 / 60.0;
        self.length / meters_per_minute
    }
}

/// Directed street graph with flat node/edge storage and per-node
/// out-edge adjacency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreetGraph {
    nodes: Vec<GeoPoint>,
    edges: Vec<GraphEdge>,
    out_edges: Vec<Vec<EdgeId>>,
}

impl StreetGraph {
    pub fn new() -> Self {
        StreetGraph::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> GeoPoint {
        self.nodes[id]
    }

    pub fn nodes(&self) -> &[GeoPoint] {
        &self.nodes
    }

    pub fn edge(&self, id: EdgeId) -> &GraphEdge {
        &self.edges[id]
    }

    pub fn out_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.out_edges[node]
    }

    pub fn add_node(&mut self, point: GeoPoint) -> NodeId {
        self.nodes.push(point);
        self.out_edges.push(Vec::new());
        self.nodes.len() - 1
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId, length: f64, max_speed: Option<f64>) {
        let edge_id = self.edges.len();
        self.edges.push(GraphEdge {
            from,
            to,
            length,
            max_speed,
        });
        self.out_edges[from].push(edge_id);
    }
}
