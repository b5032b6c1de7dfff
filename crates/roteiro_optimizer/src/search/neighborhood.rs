//! The four neighborhood operators shared by VND and tabu search. Move
//! generation is cheap and sequential; applying and re-evaluating the moves
//! fans out over rayon.

use rayon::prelude::*;

use crate::evaluate;
use crate::problem::RoutingProblem;
use crate::solution::Solution;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operator {
    IntraSwap,
    InterSwap,
    Relocate,
    TwoOpt,
}

/// Fixed exploration order. VND restarts from the first operator after any
/// accepted move.
pub const OPERATOR_ORDER: [Operator; 4] = [
    Operator::IntraSwap,
    Operator::InterSwap,
    Operator::Relocate,
    Operator::TwoOpt,
];

#[derive(Copy, Clone, Debug)]
enum Move {
    IntraSwap {
        route: usize,
        a: usize,
        b: usize,
    },
    InterSwap {
        route_a: usize,
        pos_a: usize,
        route_b: usize,
        pos_b: usize,
    },
    Relocate {
        from_route: usize,
        from_pos: usize,
        to_route: usize,
        to_pos: usize,
    },
    TwoOpt {
        route: usize,
        start: usize,
        end: usize,
    },
}

fn generate_moves(operator: Operator, solution: &Solution) -> Vec<Move> {
    let mut moves = Vec::new();
    let routes = &solution.routes;

    match operator {
        Operator::IntraSwap => {
            for (route, r) in routes.iter().enumerate() {
                for a in 0..r.len() {
                    for b in a + 1..r.len() {
                        moves.push(Move::IntraSwap { route, a, b });
                    }
                }
            }
        }
        Operator::InterSwap => {
            for route_a in 0..routes.len() {
                for route_b in route_a + 1..routes.len() {
                    for pos_a in 0..routes[route_a].len() {
                        for pos_b in 0..routes[route_b].len() {
                            moves.push(Move::InterSwap {
                                route_a,
                                pos_a,
                                route_b,
                                pos_b,
                            });
                        }
                    }
                }
            }
        }
        Operator::Relocate => {
            for (from_route, src) in routes.iter().enumerate() {
                for from_pos in 0..src.len() {
                    for (to_route, dst) in routes.iter().enumerate() {
                        for to_pos in 0..=dst.len() {
                            // Same-route insertions next to the origin are
                            // the identity move.
                            if from_route == to_route
                                && (to_pos == from_pos || to_pos == from_pos + 1)
                            {
                                continue;
                            }
                            moves.push(Move::Relocate {
                                from_route,
                                from_pos,
                                to_route,
                                to_pos,
                            });
                        }
                    }
                }
            }
        }
        Operator::TwoOpt => {
            for (route, r) in routes.iter().enumerate() {
                for start in 0..r.len() {
                    for end in start + 1..r.len() {
                        moves.push(Move::TwoOpt { route, start, end });
                    }
                }
            }
        }
    }

    moves
}

/// Applies one move to a copy of the solution and re-evaluates the touched
/// routes. Returns `None` when the operator's feasibility filter rejects the
/// result (intra-route swaps keep every neighbor).
fn apply(problem: &RoutingProblem, solution: &Solution, mv: Move) -> Option<Solution> {
    let mut neighbor = solution.clone();

    match mv {
        Move::IntraSwap { route, a, b } => {
            neighbor.routes[route].stops.swap(a, b);
            evaluate::refresh_route(problem, &mut neighbor.routes[route]);
            Some(neighbor)
        }
        Move::InterSwap {
            route_a,
            pos_a,
            route_b,
            pos_b,
        } => {
            let stop_a = neighbor.routes[route_a].stops[pos_a];
            let stop_b = neighbor.routes[route_b].stops[pos_b];
            neighbor.routes[route_a].stops[pos_a] = stop_b;
            neighbor.routes[route_b].stops[pos_b] = stop_a;
            evaluate::refresh_route(problem, &mut neighbor.routes[route_a]);
            evaluate::refresh_route(problem, &mut neighbor.routes[route_b]);
            (neighbor.routes[route_a].feasible && neighbor.routes[route_b].feasible)
                .then_some(neighbor)
        }
        Move::Relocate {
            from_route,
            from_pos,
            to_route,
            mut to_pos,
        } => {
            let stop = neighbor.routes[from_route].stops.remove(from_pos);
            if from_route == to_route && from_pos < to_pos {
                to_pos -= 1;
            }
            neighbor.routes[to_route].stops.insert(to_pos, stop);
            evaluate::refresh_route(problem, &mut neighbor.routes[from_route]);
            if from_route != to_route {
                evaluate::refresh_route(problem, &mut neighbor.routes[to_route]);
            }
            (neighbor.routes[from_route].feasible
                && (from_route == to_route || neighbor.routes[to_route].feasible))
                .then_some(neighbor)
        }
        Move::TwoOpt { route, start, end } => {
            neighbor.routes[route].stops[start..=end].reverse();
            evaluate::refresh_route(problem, &mut neighbor.routes[route]);
            neighbor.routes[route].feasible.then_some(neighbor)
        }
    }
}

/// Every surviving neighbor of `solution` under one operator.
pub fn neighbors(
    problem: &RoutingProblem,
    solution: &Solution,
    operator: Operator,
) -> Vec<Solution> {
    generate_moves(operator, solution)
        .into_par_iter()
        .filter_map(|mv| apply(problem, solution, mv))
        .collect()
}

/// Union of all four operators, used by tabu search.
pub fn all_neighbors(problem: &RoutingProblem, solution: &Solution) -> Vec<Solution> {
    OPERATOR_ORDER
        .iter()
        .flat_map(|&operator| neighbors(problem, solution, operator))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct;
    use crate::test_utils;

    fn two_route_solution() -> (RoutingProblem, Solution) {
        let problem = test_utils::problem(
            vec![
                test_utils::vehicle("v1", 1000.0, 10.0, &[]),
                test_utils::vehicle("v2", 1000.0, 10.0, &[]),
            ],
            vec![
                test_utils::stop("p1", 0.0, 0.01, 10.0, 0.1, &[]),
                test_utils::stop("p2", 0.0, 0.02, 10.0, 0.1, &[]),
                test_utils::stop("p3", 0.01, 0.01, 10.0, 0.1, &[]),
            ],
        );
        let solution = construct::build_initial(&problem);
        (problem, solution)
    }

    #[test]
    fn test_intra_swap_keeps_stop_set() {
        let (problem, solution) = two_route_solution();
        for neighbor in neighbors(&problem, &solution, Operator::IntraSwap) {
            assert_eq!(neighbor.stops_served(), solution.stops_served());
            assert_eq!(neighbor.unassigned.len(), solution.unassigned.len());
        }
    }

    #[test]
    fn test_inter_swap_neighbors_stay_feasible() {
        let (problem, solution) = two_route_solution();
        for neighbor in neighbors(&problem, &solution, Operator::InterSwap) {
            assert!(neighbor.routes_feasible());
        }
    }

    #[test]
    fn test_relocate_can_open_an_empty_route() {
        let (problem, solution) = two_route_solution();
        let empty_before = solution.routes.iter().filter(|r| r.is_empty()).count();
        if empty_before == 0 {
            return;
        }
        let opened = neighbors(&problem, &solution, Operator::Relocate)
            .iter()
            .any(|n| n.routes.iter().filter(|r| r.is_empty()).count() < empty_before);
        assert!(opened);
    }

    #[test]
    fn test_relocate_never_drops_a_stop() {
        let (problem, solution) = two_route_solution();
        for neighbor in neighbors(&problem, &solution, Operator::Relocate) {
            assert_eq!(neighbor.stops_served(), solution.stops_served());
        }
    }

    #[test]
    fn test_two_opt_reverses_a_segment() {
        let problem = test_utils::problem(
            vec![test_utils::vehicle("v1", 1000.0, 10.0, &[])],
            vec![
                test_utils::stop("p1", 0.0, 0.01, 10.0, 0.1, &[]),
                test_utils::stop("p2", 0.0, 0.02, 10.0, 0.1, &[]),
                test_utils::stop("p3", 0.0, 0.03, 10.0, 0.1, &[]),
            ],
        );
        let solution = construct::build_initial(&problem);
        assert_eq!(solution.routes[0].stops, vec![0, 1, 2]);

        let reversals = neighbors(&problem, &solution, Operator::TwoOpt);
        assert!(
            reversals
                .iter()
                .any(|n| n.routes[0].stops == vec![2, 1, 0])
        );
        assert!(
            reversals
                .iter()
                .any(|n| n.routes[0].stops == vec![1, 0, 2])
        );
    }
}
