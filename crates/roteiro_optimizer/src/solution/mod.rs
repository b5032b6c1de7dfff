pub mod route;
pub mod unassigned;

pub use route::Route;
pub use unassigned::{UnassignedReason, UnassignedStop};

use serde::Serialize;

/// Routes plus the stops no route could serve. Aggregate statistics are
/// always derived from the routes, never stored separately.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub routes: Vec<Route>,
    pub unassigned: Vec<UnassignedStop>,
}

impl Solution {
    pub fn stops_served(&self) -> usize {
        self.routes.iter().map(Route::len).sum()
    }

    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(|r| r.distance).sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.routes.iter().map(|r| r.cost).sum()
    }

    pub fn routes_feasible(&self) -> bool {
        self.routes.iter().all(|r| r.feasible)
    }

    pub fn is_feasible(&self) -> bool {
        self.routes_feasible() && self.unassigned.is_empty()
    }

    /// Drops vehicles that ended the search without any stop. Search keeps
    /// them around so relocate can open fresh routes.
    pub fn prune_empty_routes(&mut self) {
        self.routes.retain(|r| !r.is_empty());
    }
}
