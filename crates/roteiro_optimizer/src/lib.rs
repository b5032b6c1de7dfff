pub mod construct;
pub mod error;
pub mod evaluate;
pub mod json;
pub mod matrix;
pub mod problem;
pub mod search;
pub mod solution;
pub mod solver;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::SolveError;
pub use solution::Solution;
pub use solver::{Method, Solver, SolverParams};
