//! GRASP: repeated randomized-greedy construction refined by VND, keeping
//! the comparator-best solution across iterations.

use rand::Rng;
use tracing::debug;

use crate::construct;
use crate::evaluate;
use crate::problem::RoutingProblem;
use crate::solution::Solution;
use crate::solver::CancellationToken;

use super::vnd;

pub const DEFAULT_ITERATIONS: usize = 50;
pub const DEFAULT_ALPHA: f64 = 0.3;

pub fn improve<R: Rng>(
    problem: &RoutingProblem,
    iterations: usize,
    alpha: f64,
    rng: &mut R,
    cancel: &CancellationToken,
) -> Solution {
    let mut best: Option<Solution> = None;

    for iteration in 0..iterations {
        if cancel.is_cancelled() {
            break;
        }

        let constructed = construct::randomized_greedy(problem, alpha, rng);
        let refined = vnd::improve(problem, constructed, vnd::DEFAULT_MAX_ITERATIONS, cancel);

        if best
            .as_ref()
            .is_none_or(|b| evaluate::is_better(&refined, b))
        {
            debug!(iteration, cost = refined.total_cost(), "grasp new best");
            best = Some(refined);
        }
    }

    best.unwrap_or_else(|| construct::build_initial(problem))
}
