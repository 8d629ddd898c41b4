//! Vehicle records and capacity-based allocation for Haul.
//!
//! Vehicles live in a [`haul_store::RecordStore`] table, one row per vehicle.
//! The allocator answers "which free vehicle should carry this shipment?" by
//! sorting free vehicles by remaining item capacity and taking the first one
//! whose item and weight capacities both cover the request.
//!
//! # Modules
//!
//! - [`vehicle`] -- [`Vehicle`], [`VehicleClass`], [`VehicleStatus`] and the
//!   row mapping
//! - [`location`] -- [`Location`] and the known service cities
//! - [`allocator`] -- [`VehicleAllocator`] and the pure [`select_first_fit`]
//! - [`fleet`] -- [`Fleet`], the vehicle table facade
//! - [`config`] -- [`FleetConfig`], where the tables live
//! - [`error`] -- [`FleetError`]

pub mod allocator;
pub mod config;
pub mod error;
pub mod fleet;
pub mod location;
pub mod vehicle;

pub use allocator::{select_first_fit, Allocation, VehicleAllocator};
pub use config::FleetConfig;
pub use error::{FleetError, FleetResult};
pub use fleet::Fleet;
pub use location::Location;
pub use vehicle::{Vehicle, VehicleClass, VehicleStatus};
