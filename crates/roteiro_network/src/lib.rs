pub mod cache;
pub mod dijkstra;
pub mod error;
pub mod geopoint;
pub mod graph;
pub mod network;
pub mod node_index;
pub mod overpass;

pub use error::NetworkError;
pub use geopoint::GeoPoint;
pub use graph::{NodeId, StreetGraph};
pub use network::{NetworkConfig, RoadNetwork, TravelSummary};
