//! Pure route and solution evaluation. Everything here is idempotent and
//! free of side effects; search calls these after every candidate move.

use crate::matrix::{DEPOT_INDEX, stop_index};
use crate::problem::RoutingProblem;
use crate::solution::{Route, Solution};

/// Scalar cost charged per unserved stop, on top of the route costs. Steers
/// the metaheuristics toward serving more stops before minimizing distance.
pub const UNSERVED_STOP_PENALTY: f64 = 1000.0;

/// One stop's timing along a route, minutes since midnight.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledStop {
    /// Index into the problem's stop list.
    pub stop: usize,
    /// Clock on arrival, before any waiting.
    pub arrival: f64,
    /// Minutes spent waiting for the window to open.
    pub waiting: f64,
    pub departure: f64,
    /// Travel minutes of the leg into this stop.
    pub travel: f64,
    /// Meters of the leg into this stop.
    pub leg_distance: f64,
}

/// Simulates the route clock from the vehicle's shift start: drive, wait for
/// the window if early, serve, move on. Lateness does not stop the
/// simulation; it shows up as a violation in `refresh_route`.
pub fn route_schedule(problem: &RoutingProblem, route: &Route) -> Vec<ScheduledStop> {
    let vehicle = problem.vehicle(route.vehicle);
    let mut schedule = Vec::with_capacity(route.stops.len());
    let mut clock = vehicle.shift.start;
    let mut prev = DEPOT_INDEX;

    for &stop in &route.stops {
        let index = stop_index(stop);
        let travel = problem.time(prev, index);
        let leg_distance = problem.distance(prev, index);
        let arrival = clock + travel;
        let waiting = problem.stop(stop).window.waiting(arrival);
        let departure = arrival + waiting + problem.stop(stop).service_minutes;

        schedule.push(ScheduledStop {
            stop,
            arrival,
            waiting,
            departure,
            travel,
            leg_distance,
        });

        clock = departure;
        prev = index;
    }

    schedule
}

/// Recomputes every cached metric on the route from scratch. Called after
/// each mutation; the route is only trusted once this has run.
pub fn refresh_route(problem: &RoutingProblem, route: &mut Route) {
    let vehicle = problem.vehicle(route.vehicle);

    let mut distance = 0.0;
    let mut duration = 0.0;
    let mut load = 0.0;
    let mut volume = 0.0;
    let mut lateness = 0.0;
    let mut skills_ok = true;

    for scheduled in route_schedule(problem, route) {
        let stop = problem.stop(scheduled.stop);
        distance += scheduled.leg_distance;
        duration += scheduled.travel;
        load += stop.weight;
        volume += stop.volume;
        lateness += stop.window.lateness(scheduled.arrival);
        skills_ok &= vehicle.has_skills_for(stop);
    }

    if let Some(&last) = route.stops.last() {
        distance += problem.distance(stop_index(last), DEPOT_INDEX);
        duration += problem.time(stop_index(last), DEPOT_INDEX);
    }

    let capacity_violation =
        (load - vehicle.capacity).max(0.0) + (volume - vehicle.volume_capacity).max(0.0);

    route.distance = distance;
    route.duration = duration;
    route.load = load;
    route.volume = volume;
    route.time_window_violation = lateness;
    route.capacity_violation = capacity_violation;
    route.cost = if route.stops.is_empty() {
        0.0
    } else {
        (distance / 1000.0) * vehicle.cost_per_km + vehicle.fixed_cost
    };
    route.feasible = load <= vehicle.capacity
        && volume <= vehicle.volume_capacity
        && lateness == 0.0
        && capacity_violation == 0.0
        && skills_ok;
}

/// Scalar objective used where search needs a single number: the route
/// costs plus a flat penalty per unserved stop.
pub fn solution_cost(solution: &Solution) -> f64 {
    solution.total_cost() + UNSERVED_STOP_PENALTY * solution.unassigned.len() as f64
}

/// Three-level lexicographic comparator shared by every search component:
/// all-routes-feasible beats not, more stops served beats fewer, lower total
/// cost breaks the tie. Strict: equal solutions are not "better".
pub fn is_better(new: &Solution, current: &Solution) -> bool {
    let new_feasible = new.routes_feasible();
    let current_feasible = current.routes_feasible();
    if new_feasible != current_feasible {
        return new_feasible;
    }

    let new_served = new.stops_served();
    let current_served = current.stops_served();
    if new_served != current_served {
        return new_served > current_served;
    }

    new.total_cost() < current.total_cost()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::UnassignedStop;
    use crate::test_utils;

    fn route_over(problem: &RoutingProblem, stops: Vec<usize>) -> Route {
        let mut route = Route {
            stops,
            ..Route::empty(0)
        };
        refresh_route(problem, &mut route);
        route
    }

    #[test]
    fn test_refresh_route_accumulates_metrics() {
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![
                test_utils::stop("p1", 0.0, 0.01, 100.0, 1.0, &[]),
                test_utils::stop("p2", 0.0, 0.02, 150.0, 2.0, &[]),
            ],
        );
        let route = route_over(&problem, vec![0, 1]);

        assert!(route.distance > 0.0);
        assert!(route.duration > 0.0);
        assert_eq!(route.load, 250.0);
        assert_eq!(route.volume, 3.0);
        assert!(route.feasible);
        let expected = (route.distance / 1000.0) * 10.0 + 100.0;
        assert!((route.cost - expected).abs() < 1e-9);
    }

    #[test]
    fn test_empty_route_costs_nothing() {
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![test_utils::stop("p1", 0.0, 0.01, 100.0, 1.0, &[])],
        );
        let route = route_over(&problem, vec![]);
        assert_eq!(route.cost, 0.0);
        assert!(route.feasible);
    }

    #[test]
    fn test_overload_breaks_feasibility() {
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 100.0, 10.0, &[])],
            vec![
                test_utils::stop("p1", 0.0, 0.01, 80.0, 1.0, &[]),
                test_utils::stop("p2", 0.0, 0.02, 80.0, 1.0, &[]),
            ],
        );
        let route = route_over(&problem, vec![0, 1]);
        assert!(!route.feasible);
        assert_eq!(route.capacity_violation, 60.0);
    }

    #[test]
    fn test_late_arrival_breaks_feasibility() {
        let mut stop = test_utils::stop("p1", 0.0, 0.01, 10.0, 0.1, &[]);
        stop.window = crate::problem::TimeWindow::parse("06:00", "07:00").unwrap();
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![stop],
        );
        // Shift starts at 08:00, window closed an hour before.
        let route = route_over(&problem, vec![0]);
        assert!(route.time_window_violation > 60.0);
        assert!(!route.feasible);
    }

    #[test]
    fn test_schedule_waits_for_window_open() {
        let mut stop = test_utils::stop("p1", 0.0, 0.01, 10.0, 0.1, &[]);
        stop.window = crate::problem::TimeWindow::parse("10:00", "12:00").unwrap();
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![stop],
        );
        let route = route_over(&problem, vec![0]);

        let schedule = route_schedule(&problem, &route);
        assert_eq!(schedule.len(), 1);
        assert!(schedule[0].waiting > 0.0);
        assert_eq!(
            schedule[0].departure,
            schedule[0].arrival + schedule[0].waiting + 30.0
        );
        // Waiting is not a violation.
        assert!(route.feasible);
    }

    #[test]
    fn test_solution_cost_penalizes_unserved() {
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![
                test_utils::stop("p1", 0.0, 0.01, 10.0, 0.1, &[]),
                test_utils::stop("p2", 0.0, 0.02, 10.0, 0.1, &[]),
            ],
        );
        let served = Solution {
            routes: vec![route_over(&problem, vec![0, 1])],
            unassigned: vec![],
        };
        let partial = Solution {
            routes: vec![route_over(&problem, vec![0])],
            unassigned: vec![UnassignedStop {
                stop: 1,
                reasons: vec![],
            }],
        };

        assert!(solution_cost(&partial) > solution_cost(&served));
        assert!(solution_cost(&partial) >= UNSERVED_STOP_PENALTY);
    }

    #[test]
    fn test_comparator_levels() {
        let problem = test_utils::problem(
            vec![
                test_utils::vehicle("v1", 1000.0, 10.0, &[]),
                test_utils::vehicle("v2", 100.0, 1.0, &[]),
            ],
            vec![
                test_utils::stop("p1", 0.0, 0.01, 80.0, 0.5, &[]),
                test_utils::stop("p2", 0.0, 0.02, 80.0, 0.5, &[]),
            ],
        );

        let both = Solution {
            routes: vec![route_over(&problem, vec![0, 1])],
            unassigned: vec![],
        };
        let one = Solution {
            routes: vec![route_over(&problem, vec![0])],
            unassigned: vec![UnassignedStop {
                stop: 1,
                reasons: vec![],
            }],
        };
        // v2 overloaded with both stops.
        let mut overloaded_route = Route {
            vehicle: 1,
            stops: vec![0, 1],
            ..Route::empty(1)
        };
        refresh_route(&problem, &mut overloaded_route);
        let infeasible = Solution {
            routes: vec![overloaded_route],
            unassigned: vec![],
        };

        // Feasibility first.
        assert!(both.routes_feasible());
        assert!(!infeasible.routes_feasible());
        assert!(is_better(&both, &infeasible));
        assert!(!is_better(&infeasible, &both));
        // More stops served next.
        assert!(is_better(&both, &one));
        // Equal solutions are not strictly better.
        assert!(!is_better(&both, &both.clone()));
    }
}
