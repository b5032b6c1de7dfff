use roteiro_network::GeoPoint;

use crate::problem::{
    RoutingProblem, Stop, StopKind, TimeWindow, Vehicle, skill::skill_set,
};

pub fn vehicle(id: &str, capacity: f64, volume_capacity: f64, skills: &[&str]) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        name: id.to_string(),
        capacity,
        volume_capacity,
        length: 6.0,
        width: 2.2,
        height: 2.5,
        shift: TimeWindow::parse("08:00", "18:00").unwrap(),
        speed: 40.0,
        cost_per_km: 10.0,
        fixed_cost: 100.0,
        driver_name: String::new(),
        driver_phone: String::new(),
        skills: skill_set(skills.iter().copied()),
    }
}

pub fn stop(id: &str, lat: f64, lng: f64, weight: f64, volume: f64, skills: &[&str]) -> Stop {
    Stop {
        id: id.to_string(),
        name: id.to_string(),
        kind: StopKind::Delivery,
        address: String::new(),
        point: GeoPoint::new(lat, lng),
        quantity: 1,
        weight,
        volume,
        window: TimeWindow::parse("08:00", "18:00").unwrap(),
        service_minutes: 30.0,
        priority: 3,
        required_skills: skill_set(skills.iter().copied()),
    }
}

pub fn depot() -> Stop {
    let mut depot = stop("depot", 0.0, 0.0, 0.0, 0.0, &[]);
    depot.kind = StopKind::Depot;
    depot.service_minutes = 0.0;
    depot
}

/// Problem over the default depot, with haversine-only matrices.
pub fn problem(vehicles: Vec<Vehicle>, stops: Vec<Stop>) -> RoutingProblem {
    RoutingProblem::build(vehicles, stops, depot(), None).unwrap()
}
