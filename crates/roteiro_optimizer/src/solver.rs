//! Solve orchestration: initial construction, the selected improvement
//! method, cooperative cancellation, and timing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::construct;
use crate::problem::RoutingProblem;
use crate::search::{grasp, tabu, vnd};
use crate::solution::Solution;

/// Shared flag checked on every search iteration. Cloning hands out another
/// handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Vnd,
    Tabu,
    Grasp,
}

impl Method {
    pub fn from_name(name: &str) -> Option<Method> {
        match name.to_ascii_lowercase().as_str() {
            "vnd" => Some(Method::Vnd),
            "tabu" => Some(Method::Tabu),
            "grasp" => Some(Method::Grasp),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Method::Vnd => "vnd",
            Method::Tabu => "tabu",
            Method::Grasp => "grasp",
        }
    }
}

#[derive(Clone, Debug)]
pub struct SolverParams {
    /// `None` means an unrecognized method was requested; the solver falls
    /// back to the plain constructive solution.
    pub method: Option<Method>,
    pub max_iterations: usize,
    pub grasp_iterations: usize,
    pub alpha: f64,
    /// Fixed RNG seed for reproducible GRASP runs.
    pub seed: Option<u64>,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            method: Some(Method::Vnd),
            max_iterations: vnd::DEFAULT_MAX_ITERATIONS,
            grasp_iterations: grasp::DEFAULT_ITERATIONS,
            alpha: grasp::DEFAULT_ALPHA,
            seed: None,
        }
    }
}

pub struct SolveOutcome {
    pub solution: Solution,
    pub elapsed: Duration,
}

pub struct Solver<'a> {
    problem: &'a RoutingProblem,
    params: SolverParams,
    cancel: CancellationToken,
}

impl<'a> Solver<'a> {
    pub fn new(problem: &'a RoutingProblem, params: SolverParams) -> Self {
        Solver {
            problem,
            params,
            cancel: CancellationToken::new(),
        }
    }

    /// Another handle to this solver's cancellation flag, safe to move to a
    /// watchdog thread.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn solve(&self) -> SolveOutcome {
        let started = Instant::now();
        let initial = construct::build_initial(self.problem);
        info!(
            routes = initial.routes.iter().filter(|r| !r.is_empty()).count(),
            unassigned = initial.unassigned.len(),
            "initial solution built"
        );

        let mut solution = match self.params.method {
            Some(Method::Vnd) => vnd::improve(
                self.problem,
                initial,
                self.params.max_iterations,
                &self.cancel,
            ),
            Some(Method::Tabu) => tabu::improve(
                self.problem,
                initial,
                self.params.max_iterations,
                &self.cancel,
            ),
            Some(Method::Grasp) => {
                let mut rng = match self.params.seed {
                    Some(seed) => SmallRng::seed_from_u64(seed),
                    None => SmallRng::from_os_rng(),
                };
                grasp::improve(
                    self.problem,
                    self.params.grasp_iterations,
                    self.params.alpha,
                    &mut rng,
                    &self.cancel,
                )
            }
            None => {
                warn!("no recognized method selected, keeping constructive solution");
                initial
            }
        };

        solution.prune_empty_routes();

        let elapsed = started.elapsed();
        info!(
            method = self.params.method.map_or("none", |m| m.name()),
            served = solution.stops_served(),
            unassigned = solution.unassigned.len(),
            cost = solution.total_cost(),
            elapsed_ms = elapsed.as_millis() as u64,
            "solve finished"
        );

        SolveOutcome { solution, elapsed }
    }
}
