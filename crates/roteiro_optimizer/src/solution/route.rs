use serde::Serialize;

/// One vehicle's tour, depot to depot. `stops` holds indices into the
/// problem's stop list; the remaining fields are metric caches kept in sync
/// by `evaluate::refresh_route` after every mutation.
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    pub vehicle: usize,
    pub stops: Vec<usize>,
    /// Meters driven, including both depot legs.
    pub distance: f64,
    /// Travel minutes, excluding service and waiting.
    pub duration: f64,
    pub cost: f64,
    /// Total weight carried, kg.
    pub load: f64,
    /// Total volume carried, m³.
    pub volume: f64,
    pub time_window_violation: f64,
    pub capacity_violation: f64,
    pub feasible: bool,
}

impl Route {
    pub fn empty(vehicle: usize) -> Self {
        Route {
            vehicle,
            stops: Vec::new(),
            distance: 0.0,
            duration: 0.0,
            cost: 0.0,
            load: 0.0,
            volume: 0.0,
            time_window_violation: 0.0,
            capacity_violation: 0.0,
            feasible: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }
}
