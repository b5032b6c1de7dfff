pub mod skill;
pub mod stop;
pub mod time_window;
pub mod vehicle;

pub use skill::{Skill, SkillSet};
pub use stop::{Stop, StopKind};
pub use time_window::TimeWindow;
pub use vehicle::Vehicle;

use roteiro_network::RoadNetwork;
use roteiro_network::network::{NetworkConfig, TravelSummary};

use crate::error::SolveError;
use crate::matrix::TravelMatrices;

/// One solve's immutable view of the world: the fleet, the stops, the
/// depot, and the travel matrices between them.
#[derive(Debug)]
pub struct RoutingProblem {
    vehicles: Vec<Vehicle>,
    stops: Vec<Stop>,
    depot: Stop,
    matrices: TravelMatrices,
}

impl RoutingProblem {
    pub fn new(
        vehicles: Vec<Vehicle>,
        stops: Vec<Stop>,
        depot: Stop,
        matrices: TravelMatrices,
    ) -> Result<Self, SolveError> {
        if vehicles.is_empty() {
            return Err(SolveError::NoVehicles);
        }
        if stops.is_empty() {
            return Err(SolveError::NoStops);
        }
        for stop in stops.iter().chain(std::iter::once(&depot)) {
            if !stop.point.is_valid() {
                return Err(SolveError::InvalidCoordinate {
                    id: stop.id.clone(),
                    lat: stop.point.lat,
                    lng: stop.point.lng,
                });
            }
        }

        debug_assert_eq!(matrices.size(), stops.len() + 1);

        Ok(RoutingProblem {
            vehicles,
            stops,
            depot,
            matrices,
        })
    }

    /// Builds the travel matrices through the road-network oracle, or from
    /// the scaled haversine estimate when no network is given.
    pub fn build(
        vehicles: Vec<Vehicle>,
        stops: Vec<Stop>,
        depot: Stop,
        network: Option<&RoadNetwork>,
    ) -> Result<Self, SolveError> {
        let points: Vec<_> = std::iter::once(depot.point)
            .chain(stops.iter().map(|stop| stop.point))
            .collect();

        let matrices = match network {
            Some(network) => {
                TravelMatrices::build(&points, |from, to| network.travel_between(from, to))
            }
            None => {
                let config = NetworkConfig::default();
                TravelMatrices::build(&points, |from, to| {
                    TravelSummary::haversine_estimate(
                        from,
                        to,
                        config.default_speed_kmh,
                        config.circuity_factor,
                    )
                })
            }
        };

        Self::new(vehicles, stops, depot, matrices)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, index: usize) -> &Vehicle {
        &self.vehicles[index]
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stop(&self, index: usize) -> &Stop {
        &self.stops[index]
    }

    pub fn depot(&self) -> &Stop {
        &self.depot
    }

    /// Meters from one matrix index to another (`DEPOT_INDEX` is the depot,
    /// stop `i` sits at `i + 1`).
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.matrices.distance(from, to)
    }

    /// Minutes from one matrix index to another.
    pub fn time(&self, from: usize, to: usize) -> f64 {
        self.matrices.time(from, to)
    }
}
