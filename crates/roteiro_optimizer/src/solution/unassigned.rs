use std::fmt;

use serde::Serialize;

use crate::problem::{RoutingProblem, TimeWindow, skill};

/// Why a stop could not be served, as a closed set of tagged causes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnassignedReason {
    SkillMismatch { missing_skills: Vec<String> },
    CapacityMismatch { weight: f64, volume: f64 },
    TimeWindowMismatch { window: TimeWindow },
    Unknown,
}

impl fmt::Display for UnassignedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnassignedReason::SkillMismatch { missing_skills } => {
                write!(
                    f,
                    "no vehicle has the required skills: {}",
                    missing_skills.join(", ")
                )
            }
            UnassignedReason::CapacityMismatch { weight, volume } => {
                write!(
                    f,
                    "no vehicle has capacity for {weight:.1} kg / {volume:.2} m³"
                )
            }
            UnassignedReason::TimeWindowMismatch { window } => {
                write!(
                    f,
                    "no vehicle operates within the window {}",
                    window.format()
                )
            }
            UnassignedReason::Unknown => write!(f, "no feasible insertion found"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnassignedStop {
    /// Index into the problem's stop list.
    pub stop: usize,
    pub reasons: Vec<UnassignedReason>,
}

/// Infers why the stop stayed unassigned. Checks run in priority order and
/// every cause that applies is recorded; `Unknown` only when none do.
pub fn infer_reasons(problem: &RoutingProblem, stop: usize) -> Vec<UnassignedReason> {
    let stop = problem.stop(stop);
    let mut reasons = Vec::new();

    if !stop.required_skills.is_empty()
        && !problem.vehicles().iter().any(|v| v.has_skills_for(stop))
    {
        let mut missing: Vec<String> = stop
            .required_skills
            .iter()
            .filter(|skill| !problem.vehicles().iter().any(|v| v.skills.contains(skill)))
            .map(|skill| skill.as_str().to_string())
            .collect();
        if missing.is_empty() {
            // Every skill exists somewhere in the fleet, just never together.
            missing = skill::sorted_names(&stop.required_skills);
        }
        missing.sort();
        reasons.push(UnassignedReason::SkillMismatch {
            missing_skills: missing,
        });
    }

    let fits_somewhere = problem
        .vehicles()
        .iter()
        .any(|v| stop.weight <= v.capacity && stop.volume <= v.volume_capacity);
    if !fits_somewhere {
        reasons.push(UnassignedReason::CapacityMismatch {
            weight: stop.weight,
            volume: stop.volume,
        });
    }

    if !problem
        .vehicles()
        .iter()
        .any(|v| v.shift.overlaps(&stop.window))
    {
        reasons.push(UnassignedReason::TimeWindowMismatch {
            window: stop.window,
        });
    }

    if reasons.is_empty() {
        reasons.push(UnassignedReason::Unknown);
    }
    reasons
}
