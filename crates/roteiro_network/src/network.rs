use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use fxhash::FxHashMap;
use parking_lot::RwLock;
use tracing::info;

use crate::cache;
use crate::dijkstra;
use crate::error::NetworkError;
use crate::geopoint::GeoPoint;
use crate::graph::{DEFAULT_SPEED_KMH, NodeId, StreetGraph};
use crate::node_index::NodeIndex;
use crate::overpass::OverpassClient;

/// Empirical ratio of road distance to great-circle distance.
pub const ROAD_CIRCUITY_FACTOR: f64 = 1.4;

#[derive(Clone, Debug)]
pub struct NetworkConfig {
    /// Directory for the on-disk graph cache; `None` disables it.
    pub cache_dir: Option<PathBuf>,
    pub overpass_url: String,
    pub request_timeout: Duration,
    pub retries: u32,
    pub retry_backoff: Duration,
    pub default_speed_kmh: f64,
    pub circuity_factor: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            cache_dir: Some(std::env::temp_dir().join("roteiro").join("graphs")),
            overpass_url: "https://overpass-api.de/api/interpreter".to_string(),
            request_timeout: Duration::from_secs(180),
            retries: 3,
            retry_backoff: Duration::from_secs(1),
            default_speed_kmh: DEFAULT_SPEED_KMH,
            circuity_factor: ROAD_CIRCUITY_FACTOR,
        }
    }
}

/// Road distance and travel time between two points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TravelSummary {
    /// Meters.
    pub distance: f64,
    /// Minutes.
    pub minutes: f64,
}

impl TravelSummary {
    pub const ZERO: TravelSummary = TravelSummary {
        distance: 0.0,
        minutes: 0.0,
    };

    pub const UNREACHABLE: TravelSummary = TravelSummary {
        distance: f64::INFINITY,
        minutes: f64::INFINITY,
    };

    /// Great-circle estimate scaled by the road-circuity factor, timed at
    /// the default speed. Used when the graph has no path between two
    /// points, and as the whole oracle when no network is loaded.
    pub fn haversine_estimate(
        from: &GeoPoint,
        to: &GeoPoint,
        speed_kmh: f64,
        circuity_factor: f64,
    ) -> TravelSummary {
        if !from.is_valid() || !to.is_valid() {
            return TravelSummary::UNREACHABLE;
        }

        let distance = from.haversine_distance(to) * circuity_factor;
        let meters_per_minute = speed_kmh * 1000.0 / 60.0;
        TravelSummary {
            distance,
            minutes: distance / meters_per_minute,
        }
    }
}

/// Distance/time oracle over the street graph of one geographic area.
///
/// Pairwise results are cached; the cache is a pure performance
/// optimization and never changes computed values.
pub struct RoadNetwork {
    graph: StreetGraph,
    index: NodeIndex,
    pair_cache: RwLock<FxHashMap<(NodeId, NodeId), TravelSummary>>,
    default_speed_kmh: f64,
    circuity_factor: f64,
}

impl RoadNetwork {
    pub fn from_graph(graph: StreetGraph, config: &NetworkConfig) -> Self {
        let index = NodeIndex::build(&graph);
        RoadNetwork {
            graph,
            index,
            pair_cache: RwLock::new(FxHashMap::default()),
            default_speed_kmh: config.default_speed_kmh,
            circuity_factor: config.circuity_factor,
        }
    }

    /// Loads the network for a named area: disk cache first, Overpass
    /// download on miss (the downloaded graph is cached for next time).
    pub fn load(area_name: &str, config: &NetworkConfig) -> Result<Self, NetworkError> {
        if let Some(cache_dir) = &config.cache_dir
            && let Some(graph) = cache::load_cached_graph(cache_dir, area_name)
        {
            info!(
                area = area_name,
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "road network loaded from cache"
            );
            return Ok(Self::from_graph(graph, config));
        }

        let graph = OverpassClient::new(config).download_area(area_name)?;

        if let Some(cache_dir) = &config.cache_dir {
            cache::store_graph(cache_dir, area_name, &graph)?;
        }

        Ok(Self::from_graph(graph, config))
    }

    /// Loads through the process-wide per-area registry; concurrent solves
    /// share one immutable network snapshot per area.
    pub fn shared(area_name: &str, config: &NetworkConfig) -> Result<Arc<Self>, NetworkError> {
        let registry = shared_registry();

        if let Some(network) = registry.read().get(area_name) {
            return Ok(Arc::clone(network));
        }

        let network = Arc::new(Self::load(area_name, config)?);
        registry
            .write()
            .insert(area_name.to_string(), Arc::clone(&network));
        Ok(network)
    }

    /// Drops all in-memory area snapshots. The next `shared` call reloads
    /// from disk or Overpass.
    pub fn clear_shared() {
        shared_registry().write().clear();
    }

    pub fn graph(&self) -> &StreetGraph {
        &self.graph
    }

    pub fn nearest_node(&self, point: &GeoPoint) -> Option<NodeId> {
        if !point.is_valid() {
            return None;
        }
        self.index.nearest(point)
    }

    /// Shortest-path summary between two graph nodes, or `None` when no
    /// path exists in the directed graph.
    pub fn travel(&self, from: NodeId, to: NodeId) -> Option<TravelSummary> {
        if let Some(summary) = self.pair_cache.read().get(&(from, to)) {
            return Some(*summary);
        }

        let summary = dijkstra::shortest_path(&self.graph, from, to).map(|path| TravelSummary {
            distance: path.distance,
            minutes: path.minutes,
        })?;

        self.pair_cache.write().insert((from, to), summary);
        Some(summary)
    }

    /// Distance/time between two coordinates. Falls back to the scaled
    /// haversine estimate when snapping fails or no path exists; never
    /// errors. Unusable coordinates yield an unreachable (infinite) entry.
    pub fn travel_between(&self, from: &GeoPoint, to: &GeoPoint) -> TravelSummary {
        if !from.is_valid() || !to.is_valid() {
            return TravelSummary::UNREACHABLE;
        }

        let nodes = (self.nearest_node(from), self.nearest_node(to));
        if let (Some(a), Some(b)) = nodes
            && let Some(summary) = self.travel(a, b)
        {
            return summary;
        }

        TravelSummary::haversine_estimate(from, to, self.default_speed_kmh, self.circuity_factor)
    }
}

fn shared_registry() -> &'static RwLock<FxHashMap<String, Arc<RoadNetwork>>> {
    static REGISTRY: OnceLock<RwLock<FxHashMap<String, Arc<RoadNetwork>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(FxHashMap::default()))
}
