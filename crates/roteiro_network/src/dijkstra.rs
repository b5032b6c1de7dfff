use std::cmp::Ordering;
use std::collections::BinaryHeap;

use fxhash::FxHashMap;

use crate::graph::{NodeId, StreetGraph};

#[derive(Copy, Clone, Debug)]
struct HeapItem {
    node_id: NodeId,
    distance: f64,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &HeapItem) -> bool {
        self.distance == other.distance
    }
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &HeapItem) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip distance to make this a min-heap
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| self.node_id.cmp(&other.node_id))
    }
}

#[derive(Copy, Clone)]
struct NodeData {
    distance: f64,
    minutes: f64,
    settled: bool,
}

/// Shortest path by physical edge length, in meters and minutes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShortestPath {
    pub distance: f64,
    pub minutes: f64,
}

/// Single-source Dijkstra over the directed street graph, minimizing edge
/// length. Travel minutes are accumulated per edge from its posted speed.
///
/// Returns `None` when `end` is unreachable from `start`.
pub fn shortest_path(graph: &StreetGraph, start: NodeId, end: NodeId) -> Option<ShortestPath> {
    if start >= graph.node_count() || end >= graph.node_count() {
        return None;
    }
    if start == end {
        return Some(ShortestPath {
            distance: 0.0,
            minutes: 0.0,
        });
    }

    // A full per-node vector would be oversized for planet-scale graphs;
    // the search usually settles a small fraction of the nodes.
    let mut data: FxHashMap<NodeId, NodeData> = FxHashMap::default();
    let mut heap: BinaryHeap<HeapItem> = BinaryHeap::with_capacity(1024);

    data.insert(
        start,
        NodeData {
            distance: 0.0,
            minutes: 0.0,
            settled: false,
        },
    );
    heap.push(HeapItem {
        node_id: start,
        distance: 0.0,
    });

    while let Some(HeapItem { node_id, distance }) = heap.pop() {
        let node = data[&node_id];
        if node.settled || distance > node.distance {
            continue;
        }

        if node_id == end {
            return Some(ShortestPath {
                distance: node.distance,
                minutes: node.minutes,
            });
        }

        let minutes = node.minutes;
        for &edge_id in graph.out_edges(node_id) {
            let edge = graph.edge(edge_id);
            let next_distance = distance + edge.length;
            let next_minutes = minutes + edge.travel_minutes();

            let improved = match data.get(&edge.to) {
                Some(adj) => !adj.settled && next_distance < adj.distance,
                None => true,
            };

            if improved {
                data.insert(
                    edge.to,
                    NodeData {
                        distance: next_distance,
                        minutes: next_minutes,
                        settled: false,
                    },
                );
                heap.push(HeapItem {
                    node_id: edge.to,
                    distance: next_distance,
                });
            }
        }

        data.get_mut(&node_id).unwrap().settled = true;
    }

    None
}
