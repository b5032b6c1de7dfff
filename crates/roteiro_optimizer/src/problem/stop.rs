use roteiro_network::GeoPoint;
use serde::{Deserialize, Serialize};

use super::skill::SkillSet;
use super::time_window::TimeWindow;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Pickup,
    Delivery,
    Depot,
}

/// A pickup/delivery stop, or the depot that anchors every route.
#[derive(Debug, Clone, Serialize)]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub kind: StopKind,
    pub address: String,
    pub point: GeoPoint,
    pub quantity: u32,
    /// Demand in kg.
    pub weight: f64,
    /// Demand in m³.
    pub volume: f64,
    /// Service window, minutes since midnight.
    pub window: TimeWindow,
    /// On-site service duration in minutes.
    pub service_minutes: f64,
    pub priority: u8,
    pub required_skills: SkillSet,
}

impl Stop {
    pub fn is_depot(&self) -> bool {
        self.kind == StopKind::Depot
    }
}
