//! Formatted solution report: per-route schedules with depot rows at both
//! ends, unassigned stops with their reasons, and derived totals.

use std::time::Duration;

use serde::Serialize;

use crate::evaluate;
use crate::matrix::{DEPOT_INDEX, stop_index};
use crate::problem::{RoutingProblem, StopKind, skill, time_window::format_minutes};
use crate::solution::{Route, Solution};

#[derive(Debug, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub routes: Vec<RouteReport>,
    pub unassigned: Vec<UnassignedReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total_routes: usize,
    pub total_distance_km: f64,
    pub total_cost: f64,
    pub stops_served: usize,
    pub total_stops: usize,
    pub feasible: bool,
    pub execution_time_seconds: f64,
}

#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub driver: String,
    pub driver_phone: String,
    pub total_distance_km: f64,
    pub total_duration_minutes: f64,
    pub total_cost: f64,
    pub load_kg: f64,
    pub volume_m3: f64,
    pub feasible: bool,
    pub start_time: String,
    pub end_time: String,
    pub stops: Vec<StopReport>,
}

#[derive(Debug, Serialize)]
pub struct StopReport {
    #[serde(rename = "type")]
    pub kind: StopKind,
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub weight_kg: f64,
    pub volume_m3: f64,
    pub time_window: Option<String>,
    pub required_skills: Vec<String>,
    pub arrival_time: String,
    pub departure_time: String,
    pub travel_time_minutes: f64,
    pub waiting_time_minutes: f64,
    pub service_time_minutes: f64,
}

#[derive(Debug, Serialize)]
pub struct UnassignedReport {
    pub id: String,
    pub name: String,
    pub reasons: Vec<String>,
    pub details: UnassignedDetails,
}

/// The constraint-relevant attributes of an unserved stop, so the report
/// stands alone without the request payload.
#[derive(Debug, Serialize)]
pub struct UnassignedDetails {
    pub weight_kg: f64,
    pub volume_m3: f64,
    pub time_window: String,
    pub required_skills: Vec<String>,
}

pub fn build_report(problem: &RoutingProblem, solution: &Solution, elapsed: Duration) -> Report {
    let routes: Vec<RouteReport> = solution
        .routes
        .iter()
        .map(|route| route_report(problem, route))
        .collect();

    let unassigned: Vec<UnassignedReport> = solution
        .unassigned
        .iter()
        .map(|entry| {
            let stop = problem.stop(entry.stop);
            UnassignedReport {
                id: stop.id.clone(),
                name: stop.name.clone(),
                reasons: entry.reasons.iter().map(|r| r.to_string()).collect(),
                details: UnassignedDetails {
                    weight_kg: stop.weight,
                    volume_m3: stop.volume,
                    time_window: stop.window.format(),
                    required_skills: skill::sorted_names(&stop.required_skills),
                },
            }
        })
        .collect();

    Report {
        summary: Summary {
            total_routes: routes.len(),
            total_distance_km: solution.total_distance() / 1000.0,
            total_cost: solution.total_cost(),
            stops_served: solution.stops_served(),
            total_stops: problem.stops().len(),
            feasible: solution.is_feasible(),
            execution_time_seconds: elapsed.as_secs_f64(),
        },
        routes,
        unassigned,
    }
}

fn depot_row(problem: &RoutingProblem, clock: f64, travel: f64) -> StopReport {
    let depot = problem.depot();
    StopReport {
        kind: StopKind::Depot,
        id: depot.id.clone(),
        name: depot.name.clone(),
        address: depot.address.clone(),
        lat: depot.point.lat,
        lng: depot.point.lng,
        weight_kg: 0.0,
        volume_m3: 0.0,
        time_window: None,
        required_skills: Vec::new(),
        arrival_time: format_minutes(clock),
        departure_time: format_minutes(clock),
        travel_time_minutes: travel,
        waiting_time_minutes: 0.0,
        service_time_minutes: 0.0,
    }
}

fn route_report(problem: &RoutingProblem, route: &Route) -> RouteReport {
    let vehicle = problem.vehicle(route.vehicle);
    let schedule = evaluate::route_schedule(problem, route);

    let mut stops = Vec::with_capacity(schedule.len() + 2);
    stops.push(depot_row(problem, vehicle.shift.start, 0.0));

    for scheduled in &schedule {
        let stop = problem.stop(scheduled.stop);
        stops.push(StopReport {
            kind: stop.kind,
            id: stop.id.clone(),
            name: stop.name.clone(),
            address: stop.address.clone(),
            lat: stop.point.lat,
            lng: stop.point.lng,
            weight_kg: stop.weight,
            volume_m3: stop.volume,
            time_window: Some(stop.window.format()),
            required_skills: skill::sorted_names(&stop.required_skills),
            arrival_time: format_minutes(scheduled.arrival),
            departure_time: format_minutes(scheduled.departure),
            travel_time_minutes: scheduled.travel,
            waiting_time_minutes: scheduled.waiting,
            service_time_minutes: stop.service_minutes,
        });
    }

    let end_clock = match schedule.last() {
        Some(last) => {
            let travel = problem.time(stop_index(last.stop), DEPOT_INDEX);
            let arrival = last.departure + travel;
            stops.push(depot_row(problem, arrival, travel));
            arrival
        }
        None => vehicle.shift.start,
    };

    RouteReport {
        vehicle_id: vehicle.id.clone(),
        vehicle_name: vehicle.name.clone(),
        driver: vehicle.driver_name.clone(),
        driver_phone: vehicle.driver_phone.clone(),
        total_distance_km: route.distance / 1000.0,
        total_duration_minutes: route.duration,
        total_cost: route.cost,
        load_kg: route.load,
        volume_m3: route.volume,
        feasible: route.feasible,
        start_time: format_minutes(vehicle.shift.start),
        end_time: format_minutes(end_clock),
        stops,
    }
}
