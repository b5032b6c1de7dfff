//! Tabu search over the union of the four neighborhoods, with a short-term
//! memory of recent moves and an aspiration override.

use tracing::debug;

use crate::evaluate;
use crate::problem::RoutingProblem;
use crate::solution::Solution;
use crate::solver::CancellationToken;

use super::neighborhood;

pub const DEFAULT_TENURE: usize = 10;
pub const DEFAULT_MAX_LIST: usize = 50;

/// A solution's routes as comparable shapes: vehicle index plus the ordered
/// stop sequence, sorted so route order within the solution is ignored.
/// Reversed sequences still compare as distinct.
type Shape = Vec<(usize, Vec<usize>)>;

/// Move identity for the tabu list: the shapes of both endpoint solutions.
#[derive(Clone, PartialEq, Eq)]
struct TabuMove {
    before: Shape,
    after: Shape,
}

fn shape(solution: &Solution) -> Shape {
    let mut shape: Shape = solution
        .routes
        .iter()
        .map(|r| (r.vehicle, r.stops.clone()))
        .collect();
    shape.sort();
    shape
}

pub fn improve(
    problem: &RoutingProblem,
    initial: Solution,
    max_iterations: usize,
    cancel: &CancellationToken,
) -> Solution {
    let mut current = initial;
    let mut best = current.clone();

    let mut tabu_list: Vec<(TabuMove, usize)> = Vec::new();
    let mut stalled = 0;
    let stall_limit = (max_iterations / 4).max(1);

    for iteration in 0..max_iterations {
        if stalled >= stall_limit {
            debug!(iteration, "tabu stalled, stopping early");
            break;
        }
        if cancel.is_cancelled() {
            break;
        }

        let mut neighbors = neighborhood::all_neighbors(problem, &current);
        if neighbors.is_empty() {
            break;
        }

        let before = shape(&current);
        let moves: Vec<TabuMove> = neighbors
            .iter()
            .map(|n| TabuMove {
                before: before.clone(),
                after: shape(n),
            })
            .collect();

        // Neighbors are ranked with the same feasibility-first comparator
        // every other search component uses; an unfiltered intra-route swap
        // that breaks a time window can never outrank a feasible neighbor.
        let mut admissible: Option<usize> = None;
        let mut overall: Option<usize> = None;
        for i in 0..neighbors.len() {
            if overall.is_none_or(|j| evaluate::is_better(&neighbors[i], &neighbors[j])) {
                overall = Some(i);
            }
            let is_tabu = tabu_list.iter().any(|(mv, _)| *mv == moves[i]);
            // Aspiration: a tabu move that beats the global best is allowed.
            if (!is_tabu || evaluate::is_better(&neighbors[i], &best))
                && admissible.is_none_or(|j| evaluate::is_better(&neighbors[i], &neighbors[j]))
            {
                admissible = Some(i);
            }
        }

        // When every neighbor is tabu, take the best one anyway.
        let pick = admissible.or(overall).unwrap();
        let mv = moves[pick].clone();
        current = neighbors.swap_remove(pick);

        if evaluate::is_better(&current, &best) {
            best = current.clone();
            stalled = 0;
            debug!(
                iteration,
                cost = best.total_cost(),
                "tabu found new best"
            );
        } else {
            stalled += 1;
        }

        tabu_list.push((mv, iteration + DEFAULT_TENURE));
        tabu_list.retain(|&(_, expiry)| expiry > iteration);
        let overflow = tabu_list.len().saturating_sub(DEFAULT_MAX_LIST);
        tabu_list.drain(..overflow);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct;
    use crate::solution::Route;
    use crate::test_utils;

    #[test]
    fn test_shape_ignores_route_order_but_not_direction() {
        let problem = test_utils::problem(
            vec![
                test_utils::vehicle("v1", 1000.0, 10.0, &[]),
                test_utils::vehicle("v2", 1000.0, 10.0, &[]),
            ],
            vec![
                test_utils::stop("p1", 0.0, 0.01, 10.0, 0.1, &[]),
                test_utils::stop("p2", 0.0, 0.02, 10.0, 0.1, &[]),
            ],
        );
        let mut a = Route {
            stops: vec![0, 1],
            ..Route::empty(0)
        };
        let mut b = Route {
            vehicle: 1,
            ..Route::empty(1)
        };
        evaluate::refresh_route(&problem, &mut a);
        evaluate::refresh_route(&problem, &mut b);

        let forward = Solution {
            routes: vec![a.clone(), b.clone()],
            unassigned: vec![],
        };
        let shuffled = Solution {
            routes: vec![b.clone(), a.clone()],
            unassigned: vec![],
        };
        assert_eq!(shape(&forward), shape(&shuffled));

        let mut reversed_route = Route {
            stops: vec![1, 0],
            ..Route::empty(0)
        };
        evaluate::refresh_route(&problem, &mut reversed_route);
        let reversed = Solution {
            routes: vec![reversed_route, b],
            unassigned: vec![],
        };
        assert_ne!(shape(&forward), shape(&reversed));
    }

    #[test]
    fn test_never_worse_than_initial() {
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![
                test_utils::stop("near", 0.0, 0.01, 10.0, 0.1, &[]),
                test_utils::stop("far", 0.0, 0.05, 10.0, 0.1, &[]),
                test_utils::stop("mid", 0.0, 0.03, 10.0, 0.1, &[]),
            ],
        );
        let mut route = Route {
            stops: vec![1, 0, 2],
            ..Route::empty(0)
        };
        evaluate::refresh_route(&problem, &mut route);
        let bad = Solution {
            routes: vec![route],
            unassigned: vec![],
        };
        let bad_cost = evaluate::solution_cost(&bad);

        let result = improve(&problem, bad, 40, &CancellationToken::new());
        assert!(evaluate::solution_cost(&result) < bad_cost);
        assert_eq!(result.stops_served(), 3);
    }

    #[test]
    fn test_keeps_feasibility_over_shorter_distance() {
        // Stop 2 sits far out with a window only reachable straight from
        // the depot; every shorter reordering serves it late.
        let mut urgent = test_utils::stop("urgent", 0.0, 0.05, 10.0, 0.1, &[]);
        urgent.window = crate::problem::TimeWindow::parse("08:00", "08:15").unwrap();
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![
                test_utils::stop("p1", 0.0, 0.01, 10.0, 0.1, &[]),
                test_utils::stop("p2", 0.0, 0.02, 10.0, 0.1, &[]),
                urgent,
            ],
        );
        let mut route = Route {
            stops: vec![2, 0, 1],
            ..Route::empty(0)
        };
        evaluate::refresh_route(&problem, &mut route);
        let initial = Solution {
            routes: vec![route],
            unassigned: vec![],
        };
        assert!(initial.routes_feasible());

        let result = improve(&problem, initial.clone(), 10, &CancellationToken::new());
        assert!(result.routes_feasible());
        assert_eq!(result.stops_served(), 3);
        assert!(!evaluate::is_better(&initial, &result));
    }

    #[test]
    fn test_cancellation_returns_initial() {
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![test_utils::stop("p1", 0.0, 0.01, 10.0, 0.1, &[])],
        );
        let initial = construct::build_initial(&problem);
        let cost = evaluate::solution_cost(&initial);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = improve(&problem, initial, 100, &cancel);
        assert_eq!(evaluate::solution_cost(&result), cost);
    }
}
