use std::path::Path;

use anyhow::{bail, Context};
use colored::{ColoredString, Colorize};
use haul_fleet::{Allocation, Fleet, FleetConfig, Location, Vehicle, VehicleClass, VehicleStatus};
use serde::Serialize;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), cli.data_dir)?;
    let fleet = Fleet::from_config(&config)
        .with_context(|| format!("opening {}", config.vehicle_table_path().display()))?;
    let json = matches!(cli.format, OutputFormat::Json);

    match cli.command {
        Command::Vehicle(args) => cmd_vehicle(&fleet, args.action, json),
        Command::Allocate(args) => cmd_allocate(&fleet, args, json),
    }
}

fn load_config(path: Option<&Path>, data_dir: Option<std::path::PathBuf>) -> anyhow::Result<FleetConfig> {
    let mut config = match path {
        Some(path) => FleetConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => FleetConfig::default(),
    };
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    Ok(config)
}

fn cmd_vehicle(fleet: &Fleet, action: VehicleAction, json: bool) -> anyhow::Result<()> {
    match action {
        VehicleAction::Add { id, class, city } => {
            let class: VehicleClass = class.parse()?;
            let mut vehicle = Vehicle::new(id, class);
            if let Some(city) = city {
                vehicle = vehicle.with_position(Location::known_city(&city)?);
            }
            fleet.register(&vehicle)?;
            if json {
                return print_json(&vehicle);
            }
            println!("{} Registered {} {}", "✓".green().bold(), class, vehicle.id.yellow());
            print_vehicle(&vehicle);
        }
        VehicleAction::Show { id } => {
            let Some(vehicle) = fleet.get(&id)? else {
                bail!("vehicle {id} not found");
            };
            if json {
                return print_json(&vehicle);
            }
            print_vehicle(&vehicle);
        }
        VehicleAction::List { status } => {
            let status = status.map(|s| s.parse::<VehicleStatus>()).transpose()?;
            let vehicles = fleet.list(status)?;
            if json {
                return print_json(&vehicles);
            }
            if vehicles.is_empty() {
                println!("No vehicles.");
            }
            for vehicle in &vehicles {
                print_vehicle(vehicle);
            }
        }
        VehicleAction::Status { id, status } => {
            let status: VehicleStatus = status.parse()?;
            let Some(vehicle) = fleet.set_status(&id, status)? else {
                bail!("vehicle {id} not found");
            };
            if json {
                return print_json(&vehicle);
            }
            println!("{} {} is now {}", "✓".green().bold(), vehicle.id.yellow(), paint_status(status));
        }
        VehicleAction::Remove { id } => {
            if !fleet.retire(&id)? {
                bail!("vehicle {id} not found");
            }
            if json {
                return print_json(&serde_json::json!({ "removed": id }));
            }
            println!("Removed vehicle {}", id.yellow());
        }
    }
    Ok(())
}

fn cmd_allocate(fleet: &Fleet, args: AllocateArgs, json: bool) -> anyhow::Result<()> {
    if args.dry_run {
        let vehicle = fleet.first_available(args.items, args.weight)?;
        if json {
            return print_json(&vehicle);
        }
        match vehicle {
            Some(vehicle) => {
                println!("Would allocate {}", vehicle.id.yellow().bold());
                print_vehicle(&vehicle);
            }
            None => print_unavailable(&args),
        }
        return Ok(());
    }

    let allocation: Option<Allocation> = fleet.allocate(args.items, args.weight)?;
    if json {
        return print_json(&allocation);
    }
    match allocation {
        Some(allocation) => {
            println!(
                "{} Allocated {} items / {} kg to {}",
                "✓".green().bold(),
                allocation.items,
                allocation.weight,
                allocation.vehicle.id.yellow().bold()
            );
            print_vehicle(&allocation.vehicle);
        }
        None => print_unavailable(&args),
    }
    Ok(())
}

fn print_unavailable(args: &AllocateArgs) {
    println!(
        "{} No free vehicle can carry {} items / {} kg",
        "✗".red().bold(),
        args.items,
        args.weight
    );
}

fn print_vehicle(vehicle: &Vehicle) {
    let city = vehicle
        .position
        .as_ref()
        .map(|p| p.city.as_str())
        .unwrap_or("-");
    println!(
        "  {:<12} {:<6} {:<12} {:>5} items {:>9} kg  {}",
        vehicle.id.bold(),
        vehicle.class,
        paint_status(vehicle.status),
        vehicle.remaining_item_capacity,
        vehicle.remaining_kg_capacity,
        city.dimmed()
    );
}

fn paint_status(status: VehicleStatus) -> ColoredString {
    match status {
        VehicleStatus::Free => status.as_str().green(),
        VehicleStatus::Loading => status.as_str().yellow(),
        VehicleStatus::Busy => status.as_str().cyan(),
        VehicleStatus::NotWorking => status.as_str().red(),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
