//! Variable Neighborhood Descent: best-improvement over the four operators
//! in order, restarting from the first operator after every accepted move.

use tracing::debug;

use crate::evaluate;
use crate::problem::RoutingProblem;
use crate::solution::Solution;
use crate::solver::CancellationToken;

use super::neighborhood::{self, OPERATOR_ORDER};

pub const DEFAULT_MAX_ITERATIONS: usize = 100;

pub fn improve(
    problem: &RoutingProblem,
    initial: Solution,
    max_iterations: usize,
    cancel: &CancellationToken,
) -> Solution {
    let mut current = initial;
    let mut best = current.clone();
    let mut iteration = 0;
    let mut improved = true;

    while improved && iteration < max_iterations && !cancel.is_cancelled() {
        improved = false;
        let mut k = 0;

        while k < OPERATOR_ORDER.len() && !cancel.is_cancelled() {
            let neighbors = neighborhood::neighbors(problem, &current, OPERATOR_ORDER[k]);

            let mut best_neighbor: Option<Solution> = None;
            for neighbor in neighbors {
                if evaluate::is_better(&neighbor, &current)
                    && best_neighbor
                        .as_ref()
                        .is_none_or(|b| evaluate::is_better(&neighbor, b))
                {
                    best_neighbor = Some(neighbor);
                }
            }

            match best_neighbor {
                Some(neighbor) => {
                    current = neighbor;
                    if evaluate::is_better(&current, &best) {
                        best = current.clone();
                    }
                    improved = true;
                    k = 0;
                }
                None => k += 1,
            }
        }

        iteration += 1;
    }

    debug!(iterations = iteration, "vnd finished");
    best
}
