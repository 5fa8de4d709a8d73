//! fleet-allocator: allocate one vehicle for a JSON request.
//!
//! Reads the request from stdin, writes the outcome as JSON to stdout and
//! appends a line to the audit log. With `--dry-run` the fleet is left
//! untouched and the output names the vehicle that would be picked.

use std::io::Read;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};

use fleet_allocator::allocation::{Allocation, AllocationCriteria, Allocator, RequestContext};
use fleet_allocator::config::Config;
use fleet_allocator::fleet::{Fleet, VehicleRecord, VehicleSnapshot};
use fleet_allocator::logging;
use fleet_allocator::notify::{AccountObserver, StatusObserver};
use fleet_allocator::permission::Role;

#[derive(Deserialize)]
struct Request {
    requester: String,
    role: Role,
    criteria: AllocationCriteria,
    fleet: Vec<VehicleRecord>,
    #[serde(default)]
    observers: Vec<AccountSpec>,
}

#[derive(Deserialize)]
struct AccountSpec {
    name: String,
    role: Role,
}

/// Everything the audit line needs besides the settings.
struct Response {
    ctx: RequestContext,
    strategy: &'static str,
    output: Value,
}

impl Response {
    fn outcome(&self) -> &str {
        self.output["outcome"].as_str().unwrap_or_default()
    }

    /// Plate of the chosen vehicle, else the reason, else nothing.
    fn detail(&self) -> &str {
        match (&self.output["vehicle"]["license_plate"], &self.output["reason"]) {
            (Value::String(plate), _) => plate.as_str(),
            (_, Value::String(reason)) => reason.as_str(),
            _ => "",
        }
    }
}

/// Returns whether `--dry-run` was given.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<bool, String> {
    let mut dry_run = false;
    for arg in args {
        match arg.as_str() {
            "--dry-run" => dry_run = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(dry_run)
}

/// Run one request against `allocator`. `Err` means malformed input.
fn respond(input: &str, allocator: &Allocator, dry_run: bool) -> Result<Response, String> {
    let request: Request =
        serde_json::from_str(input).map_err(|e| format!("JSON parse error: {e}"))?;
    let fleet = Fleet::from_records(request.fleet).map_err(|e| format!("invalid fleet: {e}"))?;

    let ctx = RequestContext::new(request.requester, request.role);
    let criteria = request.criteria;

    let accounts: Vec<Arc<AccountObserver>> = request
        .observers
        .into_iter()
        .map(|a| {
            Arc::new(AccountObserver::new(
                a.name,
                a.role,
                Arc::clone(allocator.permissions()),
            ))
        })
        .collect();
    for vehicle in fleet.vehicles() {
        for account in &accounts {
            vehicle.add_observer(Arc::clone(account) as Arc<dyn StatusObserver>);
        }
    }

    let mut output = if dry_run {
        match allocator.select(fleet.vehicles(), &criteria) {
            Some(vehicle) => json!({
                "outcome": "selected",
                "vehicle": VehicleSnapshot::from(vehicle.as_ref()),
            }),
            None => json!({ "outcome": "no_eligible_vehicle" }),
        }
    } else {
        render(&allocator.allocate(&ctx, fleet.vehicles(), &criteria))
    };

    output["notifications"] = accounts
        .iter()
        .flat_map(|account| {
            account.reactions().into_iter().map(move |(event, reaction)| {
                json!({
                    "observer": account.name(),
                    "license_plate": event.license_plate,
                    "previous": event.previous,
                    "status": event.status,
                    "reaction": reaction,
                })
            })
        })
        .collect();

    Ok(Response {
        ctx,
        strategy: criteria.strategy.name(),
        output,
    })
}

fn render(allocation: &Allocation) -> Value {
    let mut value = json!({ "outcome": allocation.label() });
    match allocation {
        Allocation::Allocated { vehicle, report } => {
            value["vehicle"] = json!(VehicleSnapshot::from(vehicle.as_ref()));
            if !report.is_clean() {
                value["observer_failures"] = report
                    .failures
                    .iter()
                    .map(|f| json!({ "observer": f.observer, "message": f.message, "panicked": f.panicked }))
                    .collect();
            }
        }
        Allocation::NoEligibleVehicle => {}
        Allocation::Denied(check) => {
            value["decision"] = json!(check.decision);
            value["reason"] = json!(check.reason);
        }
        Allocation::Contended { attempts } => {
            value["reason"] = json!(format!("lost the race {attempts} times"));
        }
    }
    value
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("fleet-allocator: {message}");
    std::process::exit(1);
}

fn main() {
    let dry_run = parse_args(std::env::args().skip(1)).unwrap_or_else(|e| fail(e));

    let config = Config::load();
    logging::init(&config.settings);

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        fail(format!("failed to read stdin: {e}"));
    }

    let allocator = Allocator::from_config(config);
    let response = respond(&input, &allocator, dry_run).unwrap_or_else(|e| fail(e));
    logging::log_allocation(
        &allocator.config().settings,
        &response.ctx,
        response.strategy,
        response.outcome(),
        response.detail(),
    );

    println!("{}", response.output);
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLEET: &str = r#"[
        {"kind": "truck", "license_plate": "TRK-1", "model": "Actros", "fuel_level": 50.0,
         "mileage": 12000.0, "max_speed": 90.0, "engine_type": "DIESEL", "cargo_capacity": 500.0},
        {"kind": "truck", "license_plate": "TRK-2", "model": "Volvo FH", "fuel_level": 40.0,
         "mileage": 30000.0, "max_speed": 95.0, "engine_type": "DIESEL", "cargo_capacity": 800.0}
    ]"#;

    fn request(role: &str, strategy: &str) -> String {
        format!(
            r#"{{"requester": "max", "role": "{role}", "criteria": {{"strategy": {strategy}}},
                "fleet": {FLEET}, "observers": [{{"name": "dee", "role": "DRIVER"}}]}}"#
        )
    }

    fn cargo_request(role: &str) -> String {
        request(role, r#"{"name": "cargo_priority", "min_cargo_capacity": 100}"#)
    }

    fn run(input: &str, dry_run: bool) -> Response {
        respond(input, &fleet_allocator::allocator(), dry_run).unwrap()
    }

    #[test]
    fn allocation_output_shape() {
        let response = run(&cargo_request("MANAGER"), false);
        let out = &response.output;
        assert_eq!(out["outcome"], "allocated");
        assert_eq!(out["vehicle"]["license_plate"], "TRK-2");
        assert_eq!(out["vehicle"]["kind"], "truck");
        assert_eq!(out["vehicle"]["status"], "IN_USE");
        assert_eq!(
            out["notifications"],
            json!([{
                "observer": "dee",
                "license_plate": "TRK-2",
                "previous": "AVAILABLE",
                "status": "IN_USE",
                "reaction": "NO_ACTION",
            }])
        );
        assert_eq!(response.strategy, "cargo_priority");
        assert_eq!(response.outcome(), "allocated");
        assert_eq!(response.detail(), "TRK-2");
    }

    #[test]
    fn dry_run_leaves_fleet_untouched() {
        let response = run(&cargo_request("MANAGER"), true);
        let out = &response.output;
        assert_eq!(out["outcome"], "selected");
        assert_eq!(out["vehicle"]["license_plate"], "TRK-2");
        assert_eq!(out["vehicle"]["status"], "AVAILABLE");
        assert_eq!(out["notifications"], json!([]));
    }

    #[test]
    fn no_eligible_vehicle_output() {
        let response = run(&request("ADMIN", r#"{"name": "refrigeration"}"#), false);
        assert_eq!(response.output["outcome"], "no_eligible_vehicle");
        assert!(response.output.get("vehicle").is_none());
        assert_eq!(response.detail(), "");
    }

    #[test]
    fn denied_output_carries_reason() {
        let mut config = Config::default_config();
        config.permissions.remove("MANAGER");
        let allocator = Allocator::from_config(config);
        let response = respond(&cargo_request("MANAGER"), &allocator, false).unwrap();
        assert_eq!(response.output["outcome"], "denied");
        assert_eq!(response.output["decision"], "deny");
        assert!(!response.detail().is_empty());
        assert_eq!(response.output["notifications"], json!([]));
    }

    #[test]
    fn malformed_input_is_an_error() {
        let allocator = fleet_allocator::allocator();
        let err = respond("{ not json", &allocator, false).err().unwrap();
        assert!(err.starts_with("JSON parse error"), "{err}");

        let unknown_role = cargo_request("JANITOR");
        assert!(respond(&unknown_role, &allocator, false).is_err());

        let duplicate = format!(
            r#"{{"requester": "max", "role": "ADMIN",
                "criteria": {{"strategy": {{"name": "high_fuel_level"}}}},
                "fleet": [{one}, {one}]}}"#,
            one = r#"{"kind": "car", "license_plate": "CAR-1", "model": "Golf", "fuel_level": 30.0,
                      "max_speed": 180.0, "engine_type": "PETROL",
                      "passenger_capacity": 5, "comfort_level": 6}"#
        );
        let err = respond(&duplicate, &allocator, false).err().unwrap();
        assert!(err.starts_with("invalid fleet"), "{err}");
    }

    #[test]
    fn args() {
        assert_eq!(parse_args(Vec::<String>::new()), Ok(false));
        assert_eq!(parse_args(["--dry-run".to_string()]), Ok(true));
        assert!(parse_args(["--wet".to_string()]).is_err());
    }
}
