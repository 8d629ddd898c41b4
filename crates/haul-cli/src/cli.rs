use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "haul",
    about = "Haul — fleet records and vehicle allocation",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with `data_dir` and `vehicle_table`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides the configured data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage vehicle records
    Vehicle(VehicleArgs),
    /// Find a free vehicle for a shipment and reserve its capacity
    Allocate(AllocateArgs),
}

#[derive(Args)]
pub struct VehicleArgs {
    #[command(subcommand)]
    pub action: VehicleAction,
}

#[derive(Subcommand)]
pub enum VehicleAction {
    /// Register a new vehicle at its class's default capacity
    Add {
        id: String,
        /// bike, truck or ship
        #[arg(long)]
        class: String,
        #[arg(long)]
        city: Option<String>,
    },
    /// Show one vehicle
    Show { id: String },
    /// List vehicles
    List {
        /// free, loading, busy or not-working
        #[arg(long)]
        status: Option<String>,
    },
    /// Change a vehicle's status
    Status { id: String, status: String },
    /// Remove a vehicle
    Remove { id: String },
}

#[derive(Args)]
pub struct AllocateArgs {
    pub items: u32,
    /// Total shipment weight in kg
    pub weight: f64,
    /// Only report the vehicle that would be chosen
    #[arg(long)]
    pub dry_run: bool,
}
