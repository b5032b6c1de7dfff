use std::fs;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::NetworkError;
use crate::graph::StreetGraph;

/// Cache filename for an area: the MD5 of the area name, content-addressed
/// so the same area always resolves to the same entry.
pub fn cache_filename(area_name: &str) -> String {
    format!("{:x}.graph", md5::compute(area_name.as_bytes()))
}

pub fn cache_path(cache_dir: &Path, area_name: &str) -> PathBuf {
    cache_dir.join(cache_filename(area_name))
}

/// Loads a cached graph if one exists. A corrupt entry is treated as a
/// miss so it gets rebuilt on the next write.
pub fn load_cached_graph(cache_dir: &Path, area_name: &str) -> Option<StreetGraph> {
    let path = cache_path(cache_dir, area_name);
    if !path.is_file() {
        return None;
    }

    let file = match fs::File::open(&path) {
        Ok(file) => file,
        Err(err) => {
            warn!(?path, %err, "failed to open graph cache entry");
            return None;
        }
    };

    let mut bytes = Vec::new();
    if let Err(err) = BufReader::new(file).read_to_end(&mut bytes) {
        warn!(?path, %err, "failed to read graph cache entry");
        return None;
    }

    match bincode::serde::decode_from_slice(&bytes, bincode::config::standard()) {
        Ok((graph, _)) => {
            debug!(?path, "loaded graph from cache");
            Some(graph)
        }
        Err(err) => {
            warn!(?path, %err, "discarding corrupt graph cache entry");
            None
        }
    }
}

pub fn store_graph(
    cache_dir: &Path,
    area_name: &str,
    graph: &StreetGraph,
) -> Result<(), NetworkError> {
    fs::create_dir_all(cache_dir).map_err(NetworkError::CacheWrite)?;

    let bytes = bincode::serde::encode_to_vec(graph, bincode::config::standard())?;
    let path = cache_path(cache_dir, area_name);
    let file = fs::File::create(&path).map_err(NetworkError::CacheWrite)?;
    let mut writer = BufWriter::with_capacity(64 * 1024, file);
    writer.write_all(&bytes).map_err(NetworkError::CacheWrite)?;
    writer.flush().map_err(NetworkError::CacheWrite)?;

    debug!(?path, bytes = bytes.len(), "stored graph in cache");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geopoint::GeoPoint;

    #[test]
    fn test_filename_is_stable() {
        assert_eq!(
            cache_filename("Belo Horizonte, Brazil"),
            cache_filename("Belo Horizonte, Brazil")
        );
        assert_ne!(cache_filename("A"), cache_filename("B"));
    }

    #[test]
    fn test_store_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut graph = StreetGraph::new();
        let a = graph.add_node(GeoPoint::new(-19.9, -43.9));
        let b = graph.add_node(GeoPoint::new(-19.8, -43.8));
        graph.add_edge(a, b, 1234.5, Some(60.0));

        store_graph(dir.path(), "test area", &graph).unwrap();
        let loaded = load_cached_graph(dir.path(), "test area").unwrap();
        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.edge_count(), 1);
        assert_eq!(loaded.edge(0).max_speed, Some(60.0));
    }

    #[test]
    fn test_miss_on_unknown_area() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_cached_graph(dir.path(), "never seen").is_none());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = cache_path(dir.path(), "bad");
        fs::write(&path, b"not a graph").unwrap();
        assert!(load_cached_graph(dir.path(), "bad").is_none());
    }
}
