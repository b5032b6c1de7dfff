//! Payload-facing types: the request format the engine is fed with and the
//! formatted report it hands back.

pub mod input;
pub mod report;

pub use input::{ProblemInput, StopInput, VehicleInput};
pub use report::{Report, build_report};
