use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("overpass request failed after {attempts} attempts")]
    Download {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("overpass response could not be parsed")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("no road data found for area {0:?}")]
    EmptyArea(String),
    #[error("failed to read graph cache")]
    CacheRead(#[source] std::io::Error),
    #[error("failed to write graph cache")]
    CacheWrite(#[source] std::io::Error),
    #[error("failed to decode cached graph")]
    CacheDecode(#[from] bincode::error::DecodeError),
    #[error("failed to encode graph for cache")]
    CacheEncode(#[from] bincode::error::EncodeError),
}
