//! Request payload deserialization. Every field beyond the coordinates has
//! a documented default, so sparse payloads stay valid.

use roteiro_network::{GeoPoint, RoadNetwork};
use serde::Deserialize;
use tracing::warn;

use crate::error::SolveError;
use crate::problem::{RoutingProblem, Stop, StopKind, TimeWindow, Vehicle, skill::skill_set};
use crate::solver::{Method, SolverParams};

#[derive(Debug, Deserialize)]
pub struct ProblemInput {
    #[serde(default)]
    pub vehicles: Vec<VehicleInput>,
    #[serde(default)]
    pub points: Vec<StopInput>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct VehicleInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_capacity")]
    pub capacity: f64,
    #[serde(default = "default_volume_capacity")]
    pub volume_capacity: f64,
    #[serde(default = "default_length")]
    pub length: f64,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_start_time")]
    pub start_time: String,
    #[serde(default = "default_end_time")]
    pub end_time: String,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_cost_per_km")]
    pub cost_per_km: f64,
    #[serde(default = "default_fixed_cost")]
    pub fixed_cost: f64,
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub driver_phone: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct StopInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default = "default_stop_type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default = "default_start_time")]
    pub time_window_start: String,
    #[serde(default = "default_end_time")]
    pub time_window_end: String,
    #[serde(default = "default_service_time")]
    pub service_time: f64,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

fn default_capacity() -> f64 {
    1000.0
}
fn default_volume_capacity() -> f64 {
    10.0
}
fn default_length() -> f64 {
    5.0
}
fn default_width() -> f64 {
    2.0
}
fn default_height() -> f64 {
    2.0
}
fn default_start_time() -> String {
    "08:00".to_string()
}
fn default_end_time() -> String {
    "18:00".to_string()
}
fn default_speed() -> f64 {
    40.0
}
fn default_cost_per_km() -> f64 {
    10.0
}
fn default_fixed_cost() -> f64 {
    100.0
}
fn default_stop_type() -> String {
    "delivery".to_string()
}
fn default_quantity() -> u32 {
    1
}
fn default_service_time() -> f64 {
    30.0
}
fn default_priority() -> u8 {
    3
}

fn parse_window(start: &str, end: &str) -> Result<TimeWindow, SolveError> {
    TimeWindow::parse(start, end).ok_or_else(|| SolveError::InvalidTime {
        field: "time window".to_string(),
        value: format!("{start} - {end}"),
    })
}

impl VehicleInput {
    fn into_vehicle(self, ordinal: usize) -> Result<Vehicle, SolveError> {
        Ok(Vehicle {
            id: self.id.unwrap_or_else(|| format!("v{ordinal}")),
            name: self.name.unwrap_or_else(|| format!("Vehicle {ordinal}")),
            capacity: self.capacity,
            volume_capacity: self.volume_capacity,
            length: self.length,
            width: self.width,
            height: self.height,
            shift: parse_window(&self.start_time, &self.end_time)?,
            speed: self.speed,
            cost_per_km: self.cost_per_km,
            fixed_cost: self.fixed_cost,
            driver_name: self.driver_name,
            driver_phone: self.driver_phone,
            skills: skill_set(self.skills),
        })
    }
}

impl StopInput {
    fn into_stop(self, ordinal: usize) -> Result<Stop, SolveError> {
        let kind = match self.kind.to_ascii_lowercase().as_str() {
            "depot" => StopKind::Depot,
            "pickup" => StopKind::Pickup,
            _ => StopKind::Delivery,
        };
        Ok(Stop {
            id: self.id.unwrap_or_else(|| format!("p{ordinal}")),
            name: self.name.unwrap_or_else(|| format!("Stop {ordinal}")),
            kind,
            address: self.address,
            point: GeoPoint::new(self.lat, self.lng),
            quantity: self.quantity,
            weight: self.weight,
            volume: self.volume,
            window: parse_window(&self.time_window_start, &self.time_window_end)?,
            service_minutes: self.service_time,
            priority: self.priority,
            required_skills: skill_set(self.required_skills),
        })
    }
}

impl ProblemInput {
    /// Builds the problem: depot is the first `type: depot` point, or the
    /// first point promoted when the payload does not mark one.
    pub fn into_problem(
        self,
        network: Option<&RoadNetwork>,
    ) -> Result<(RoutingProblem, SolverParams), SolveError> {
        let params = self.solver_params();

        let vehicles = self
            .vehicles
            .into_iter()
            .enumerate()
            .map(|(i, v)| v.into_vehicle(i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        if vehicles.is_empty() {
            return Err(SolveError::NoVehicles);
        }

        let mut depot = None;
        let mut stops = Vec::new();
        for (i, input) in self.points.into_iter().enumerate() {
            let stop = input.into_stop(i + 1)?;
            if stop.is_depot() && depot.is_none() {
                depot = Some(stop);
            } else {
                stops.push(stop);
            }
        }
        let depot = match depot {
            Some(depot) => depot,
            None => {
                if stops.is_empty() {
                    return Err(SolveError::NoStops);
                }
                let mut promoted = stops.remove(0);
                warn!(id = %promoted.id, "no depot in payload, promoting first point");
                promoted.kind = StopKind::Depot;
                promoted
            }
        };

        let problem = RoutingProblem::build(vehicles, stops, depot, network)?;
        Ok((problem, params))
    }

    fn solver_params(&self) -> SolverParams {
        let mut params = SolverParams::default();
        if let Some(name) = &self.method {
            params.method = Method::from_name(name);
            if params.method.is_none() {
                warn!(method = %name, "unrecognized method, will keep constructive solution");
            }
        }
        if let Some(max_iterations) = self.max_iterations {
            params.max_iterations = max_iterations;
        }
        params
    }
}
