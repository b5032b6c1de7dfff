//! Nearest-feasible-neighbor construction, shared between the initial
//! greedy solution and the randomized GRASP variant.

use rand::Rng;
use tracing::debug;

use crate::evaluate;
use crate::matrix::{DEPOT_INDEX, stop_index};
use crate::problem::RoutingProblem;
use crate::solution::{Route, Solution, UnassignedStop, unassigned};

/// A stop the current route could serve next, with the travel distance of
/// the leg that would reach it.
struct Candidate {
    stop: usize,
    distance: f64,
}

/// Deterministic greedy construction: vehicles in descending weight-capacity
/// order, each route extended by the nearest feasible stop until none fits.
pub fn build_initial(problem: &RoutingProblem) -> Solution {
    construct(problem, nearest)
}

/// GRASP construction: same scan, but each insertion picks uniformly from
/// the restricted candidate list within `min + alpha * (max - min)`.
pub fn randomized_greedy<R: Rng>(problem: &RoutingProblem, alpha: f64, rng: &mut R) -> Solution {
    construct(problem, |candidates| restricted_pick(candidates, alpha, rng))
}

fn nearest(candidates: &[Candidate]) -> usize {
    let mut best = 0;
    for (i, candidate) in candidates.iter().enumerate().skip(1) {
        if candidate.distance < candidates[best].distance {
            best = i;
        }
    }
    candidates[best].stop
}

fn restricted_pick<R: Rng>(candidates: &[Candidate], alpha: f64, rng: &mut R) -> usize {
    let min = candidates
        .iter()
        .map(|c| c.distance)
        .fold(f64::INFINITY, f64::min);
    let max = candidates
        .iter()
        .map(|c| c.distance)
        .fold(f64::NEG_INFINITY, f64::max);
    let threshold = min + alpha * (max - min);

    let rcl: Vec<usize> = candidates
        .iter()
        .filter(|c| c.distance <= threshold)
        .map(|c| c.stop)
        .collect();
    rcl[rng.random_range(0..rcl.len())]
}

fn construct<F>(problem: &RoutingProblem, mut choose: F) -> Solution
where
    F: FnMut(&[Candidate]) -> usize,
{
    let mut order: Vec<usize> = (0..problem.vehicles().len()).collect();
    // Stable sort keeps input order between equal-capacity vehicles.
    order.sort_by(|&a, &b| {
        problem
            .vehicle(b)
            .capacity
            .total_cmp(&problem.vehicle(a).capacity)
    });

    let mut assigned = vec![false; problem.stops().len()];
    let mut routes = Vec::with_capacity(order.len());

    for vehicle_index in order {
        let vehicle = problem.vehicle(vehicle_index);
        let mut route = Route::empty(vehicle_index);
        let mut clock = vehicle.shift.start;
        let mut load = 0.0;
        let mut volume = 0.0;
        let mut prev = DEPOT_INDEX;

        loop {
            let candidates: Vec<Candidate> = problem
                .stops()
                .iter()
                .enumerate()
                .filter(|&(stop, _)| !assigned[stop])
                .filter(|&(_, stop)| {
                    vehicle.has_skills_for(stop)
                        && load + stop.weight <= vehicle.capacity
                        && volume + stop.volume <= vehicle.volume_capacity
                })
                .filter(|&(stop, data)| {
                    let arrival = clock + problem.time(prev, stop_index(stop));
                    arrival <= data.window.end
                })
                .map(|(stop, _)| Candidate {
                    stop,
                    distance: problem.distance(prev, stop_index(stop)),
                })
                .collect();

            if candidates.is_empty() {
                break;
            }

            let chosen = choose(&candidates);
            let data = problem.stop(chosen);
            let arrival = clock + problem.time(prev, stop_index(chosen));
            clock = arrival.max(data.window.start) + data.service_minutes;
            load += data.weight;
            volume += data.volume;
            prev = stop_index(chosen);
            assigned[chosen] = true;
            route.stops.push(chosen);
        }

        evaluate::refresh_route(problem, &mut route);
        routes.push(route);
    }

    let unassigned: Vec<UnassignedStop> = assigned
        .iter()
        .enumerate()
        .filter(|&(_, &done)| !done)
        .map(|(stop, _)| UnassignedStop {
            stop,
            reasons: unassigned::infer_reasons(problem, stop),
        })
        .collect();

    if !unassigned.is_empty() {
        debug!(count = unassigned.len(), "stops left unassigned");
    }

    Solution { routes, unassigned }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::test_utils;

    #[test]
    fn test_single_vehicle_serves_single_stop() {
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![test_utils::stop("p1", 0.0, 0.01, 100.0, 1.0, &[])],
        );

        let solution = build_initial(&problem);
        assert!(solution.unassigned.is_empty());
        assert_eq!(solution.stops_served(), 1);
        assert!(solution.routes[0].distance > 0.0);
    }

    #[test]
    fn test_nearest_stop_first() {
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![
                test_utils::stop("far", 0.0, 0.05, 10.0, 0.1, &[]),
                test_utils::stop("near", 0.0, 0.01, 10.0, 0.1, &[]),
            ],
        );

        let solution = build_initial(&problem);
        assert_eq!(solution.routes[0].stops, vec![1, 0]);
    }

    #[test]
    fn test_largest_vehicle_first() {
        let problem = test_utils::problem(
            vec![
                test_utils::vehicle("small", 50.0, 10.0, &[]),
                test_utils::vehicle("big", 1000.0, 10.0, &[]),
            ],
            vec![test_utils::stop("p1", 0.0, 0.01, 100.0, 1.0, &[])],
        );

        let solution = build_initial(&problem);
        let serving: Vec<_> = solution.routes.iter().filter(|r| !r.is_empty()).collect();
        assert_eq!(serving.len(), 1);
        assert_eq!(serving[0].vehicle, 1);
    }

    #[test]
    fn test_skill_gated_stop_goes_unassigned() {
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![test_utils::stop("p1", 0.0, 0.01, 100.0, 1.0, &["cold"])],
        );

        let solution = build_initial(&problem);
        assert_eq!(solution.stops_served(), 0);
        assert_eq!(solution.unassigned.len(), 1);
        let reason = solution.unassigned[0].reasons[0].to_string();
        assert!(reason.contains("cold"));
    }

    #[test]
    fn test_capacity_split_across_vehicles() {
        let problem = test_utils::problem(
            vec![
                test_utils::vehicle("v1", 100.0, 10.0, &[]),
                test_utils::vehicle("v2", 100.0, 10.0, &[]),
            ],
            vec![
                test_utils::stop("p1", 0.0, 0.01, 80.0, 0.5, &[]),
                test_utils::stop("p2", 0.0, 0.02, 80.0, 0.5, &[]),
            ],
        );

        let solution = build_initial(&problem);
        assert!(solution.unassigned.is_empty());
        assert_eq!(solution.stops_served(), 2);
        assert!(solution.routes.iter().all(|r| r.len() == 1));
        assert!(solution.routes_feasible());
    }

    #[test]
    fn test_randomized_greedy_alpha_zero_is_greedy() {
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![
                test_utils::stop("far", 0.0, 0.05, 10.0, 0.1, &[]),
                test_utils::stop("near", 0.0, 0.01, 10.0, 0.1, &[]),
            ],
        );

        let mut rng = SmallRng::seed_from_u64(7);
        let solution = randomized_greedy(&problem, 0.0, &mut rng);
        assert_eq!(solution.routes[0].stops, vec![1, 0]);
    }

    #[test]
    fn test_randomized_greedy_serves_everything_it_can() {
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![
                test_utils::stop("p1", 0.0, 0.01, 10.0, 0.1, &[]),
                test_utils::stop("p2", 0.0, 0.02, 10.0, 0.1, &[]),
                test_utils::stop("p3", 0.01, 0.01, 10.0, 0.1, &[]),
            ],
        );

        let mut rng = SmallRng::seed_from_u64(42);
        let solution = randomized_greedy(&problem, 1.0, &mut rng);
        assert!(solution.unassigned.is_empty());
        assert_eq!(solution.stops_served(), 3);
    }
}
