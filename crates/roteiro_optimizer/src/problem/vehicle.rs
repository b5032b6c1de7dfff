use serde::Serialize;

use super::skill::SkillSet;
use super::stop::Stop;
use super::time_window::TimeWindow;

/// A vehicle and the constraints it carries. Immutable once loaded for a
/// solve.
#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    /// Weight capacity in kg.
    pub capacity: f64,
    /// Volume capacity in m³.
    pub volume_capacity: f64,
    /// Physical dimensions in meters.
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Operating window, minutes since midnight.
    pub shift: TimeWindow,
    /// Average speed in km/h.
    pub speed: f64,
    pub cost_per_km: f64,
    /// Dispatch cost charged once per non-empty route.
    pub fixed_cost: f64,
    pub driver_name: String,
    pub driver_phone: String,
    pub skills: SkillSet,
}

impl Vehicle {
    pub fn has_skills_for(&self, stop: &Stop) -> bool {
        stop.required_skills.is_subset(&self.skills)
    }
}
