use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::geopoint::GeoPoint;
use crate::graph::{NodeId, StreetGraph};

type IndexedNode = GeomWithData<[f64; 2], NodeId>;

/// R-tree over graph nodes for nearest-node queries.
pub struct NodeIndex {
    tree: RTree<IndexedNode>,
}

impl NodeIndex {
    pub fn build(graph: &StreetGraph) -> NodeIndex {
        let tree = RTree::bulk_load(
            graph
                .nodes()
                .iter()
                .enumerate()
                .map(|(node_id, point)| IndexedNode::new([point.lng, point.lat], node_id))
                .collect(),
        );

        NodeIndex { tree }
    }

    pub fn nearest(&self, point: &GeoPoint) -> Option<NodeId> {
        self.tree
            .nearest_neighbor(&[point.lng, point.lat])
            .map(|node| node.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_node() {
        let mut graph = StreetGraph::new();
        graph.add_node(GeoPoint::new(0.0, 0.0));
        graph.add_node(GeoPoint::new(1.0, 1.0));
        graph.add_node(GeoPoint::new(2.0, 2.0));

        let index = NodeIndex::build(&graph);
        assert_eq!(index.nearest(&GeoPoint::new(0.9, 1.1)), Some(1));
        assert_eq!(index.nearest(&GeoPoint::new(-0.1, 0.0)), Some(0));
    }

    #[test]
    fn test_empty_graph() {
        let index = NodeIndex::build(&StreetGraph::new());
        assert_eq!(index.nearest(&GeoPoint::new(0.0, 0.0)), None);
    }
}
