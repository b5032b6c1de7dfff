use roteiro_network::NetworkError;
use thiserror::Error;

/// Fatal solve errors. Infeasible assignments and iteration-cap exits are
/// not errors: they degrade into the solution's own unassigned reporting.
#[derive(Error, Debug)]
pub enum SolveError {
    #[error("no vehicles in problem input")]
    NoVehicles,
    #[error("no stops in problem input")]
    NoStops,
    #[error("invalid coordinate ({lat}, {lng}) for stop {id:?}")]
    InvalidCoordinate { id: String, lat: f64, lng: f64 },
    #[error("invalid time {value:?} in {field}: expected HH:MM")]
    InvalidTime { field: String, value: String },
    #[error("road network unavailable")]
    Network(#[from] NetworkError),
}
