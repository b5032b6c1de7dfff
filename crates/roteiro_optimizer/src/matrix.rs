use roteiro_network::{GeoPoint, network::TravelSummary};

/// Matrix row/column of the depot. Stop `i` of the problem sits at `i + 1`.
pub const DEPOT_INDEX: usize = 0;

pub fn stop_index(stop: usize) -> usize {
    stop + 1
}

/// Square distance (meters) and time (minutes) matrices over the depot and
/// all stops, stored as flat vectors. Built once per solve, read-only
/// afterward.
#[derive(Debug, Clone)]
pub struct TravelMatrices {
    size: usize,
    distances: Vec<f64>,
    times: Vec<f64>,
}

impl TravelMatrices {
    /// Builds both matrices by querying `travel` for every ordered pair.
    /// The diagonal is zero.
    pub fn build<F>(points: &[GeoPoint], mut travel: F) -> Self
    where
        F: FnMut(&GeoPoint, &GeoPoint) -> TravelSummary,
    {
        let size = points.len();
        let mut distances = vec![0.0; size * size];
        let mut times = vec![0.0; size * size];

        for (i, from) in points.iter().enumerate() {
            for (j, to) in points.iter().enumerate() {
                if i == j {
                    continue;
                }
                let summary = travel(from, to);
                distances[i * size + j] = summary.distance;
                times[i * size + j] = summary.minutes;
            }
        }

        TravelMatrices {
            size,
            distances,
            times,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Meters from matrix index `from` to matrix index `to`.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from * self.size + to]
    }

    /// Minutes from matrix index `from` to matrix index `to`.
    pub fn time(&self, from: usize, to: usize) -> f64 {
        self.times[from * self.size + to]
    }
}
