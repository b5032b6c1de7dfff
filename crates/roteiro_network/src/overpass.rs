use std::thread;
use std::time::Duration;

use fxhash::FxHashMap;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::NetworkError;
use crate::geopoint::GeoPoint;
use crate::graph::{NodeId, StreetGraph};
use crate::network::NetworkConfig;

/// Highway classes that make up the drivable network.
const DRIVE_HIGHWAY_FILTER: &str = "motorway|trunk|primary|secondary|tertiary|unclassified|\
residential|living_street|motorway_link|trunk_link|primary_link|secondary_link|tertiary_link";

#[derive(Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum OverpassElement {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
    },
    Way {
        nodes: Vec<i64>,
        #[serde(default)]
        tags: FxHashMap<String, String>,
    },
    #[serde(other)]
    Other,
}

/// Downloads the drive network of a named area from the Overpass API.
pub struct OverpassClient {
    http: reqwest::blocking::Client,
    url: String,
    retries: u32,
    retry_backoff: Duration,
}

impl OverpassClient {
    pub fn new(config: &NetworkConfig) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();

        OverpassClient {
            http,
            url: config.overpass_url.clone(),
            retries: config.retries.max(1),
            retry_backoff: config.retry_backoff,
        }
    }

    pub fn download_area(&self, area_name: &str) -> Result<StreetGraph, NetworkError> {
        let query = format!(
            "[out:json][timeout:180];\
             area[\"name\"=\"{area_name}\"]->.a;\
             way(area.a)[\"highway\"~\"^({DRIVE_HIGHWAY_FILTER})$\"];\
             (._;>;);\
             out body;"
        );

        info!(area = area_name, "downloading road network from overpass");
        let body = self.fetch_with_retry(&query)?;
        let response: OverpassResponse = serde_json::from_str(&body)?;
        let graph = build_graph(&response);

        if graph.is_empty() {
            return Err(NetworkError::EmptyArea(area_name.to_string()));
        }

        info!(
            area = area_name,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "road network downloaded"
        );
        Ok(graph)
    }

    fn fetch_with_retry(&self, query: &str) -> Result<String, NetworkError> {
        let mut backoff = self.retry_backoff;
        let mut last_error = None;

        for attempt in 1..=self.retries {
            let result = self
                .http
                .post(&self.url)
                .form(&[("data", query)])
                .send()
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.text());

            match result {
                Ok(body) => return Ok(body),
                Err(err) => {
                    warn!(attempt, %err, "overpass request failed");
                    last_error = Some(err);
                    if attempt < self.retries {
                        thread::sleep(backoff);
                        backoff *= 2;
                    }
                }
            }
        }

        Err(NetworkError::Download {
            attempts: self.retries,
            source: last_error.expect("at least one attempt was made"),
        })
    }
}

fn build_graph(response: &OverpassResponse) -> StreetGraph {
    let mut osm_nodes: FxHashMap<i64, GeoPoint> = FxHashMap::default();
    for element in &response.elements {
        if let OverpassElement::Node { id, lat, lon } = element {
            osm_nodes.insert(*id, GeoPoint::new(*lat, *lon));
        }
    }

    let mut graph = StreetGraph::new();
    let mut node_ids: FxHashMap<i64, NodeId> = FxHashMap::default();

    let mut graph_node = |graph: &mut StreetGraph, osm_id: i64, point: GeoPoint| -> NodeId {
        *node_ids
            .entry(osm_id)
            .or_insert_with(|| graph.add_node(point))
    };

    for element in &response.elements {
        let OverpassElement::Way { nodes, tags } = element else {
            continue;
        };

        let max_speed = tags.get("maxspeed").and_then(|raw| parse_speed(raw));
        let direction = WayDirection::from_tags(tags);

        for pair in nodes.windows(2) {
            let (Some(&from_point), Some(&to_point)) =
                (osm_nodes.get(&pair[0]), osm_nodes.get(&pair[1]))
            else {
                continue;
            };

            let from = graph_node(&mut graph, pair[0], from_point);
            let to = graph_node(&mut graph, pair[1], to_point);
            let length = from_point.haversine_distance(&to_point);

            match direction {
                WayDirection::Forward => graph.add_edge(from, to, length, max_speed),
                WayDirection::Backward => graph.add_edge(to, from, length, max_speed),
                WayDirection::Both => {
                    graph.add_edge(from, to, length, max_speed);
                    graph.add_edge(to, from, length, max_speed);
                }
            }
        }
    }

    graph
}

#[derive(Copy, Clone)]
enum WayDirection {
    Forward,
    Backward,
    Both,
}

impl WayDirection {
    fn from_tags(tags: &FxHashMap<String, String>) -> Self {
        match tags.get("oneway").map(String::as_str) {
            Some("yes") | Some("true") | Some("1") => WayDirection::Forward,
            Some("-1") => WayDirection::Backward,
            _ => WayDirection::Both,
        }
    }
}

/// Parses a `maxspeed` tag value; the leading number is the km/h figure
/// ("60", "60 km/h"). Unparseable values fall back to the default speed.
fn parse_speed(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok().filter(|speed| *speed > 0.0)
}
