//! The vehicle table facade.

use std::path::Path;
use std::sync::Arc;

use haul_store::{Record, RecordStore};
use tracing::debug;

use crate::allocator::{Allocation, VehicleAllocator};
use crate::config::FleetConfig;
use crate::error::FleetResult;
use crate::vehicle::{fields, Vehicle, VehicleStatus};

/// Typed access to the vehicle table.
///
/// Cloning a `Fleet` shares the underlying [`RecordStore`], so clones
/// serialize their writes against each other.
#[derive(Clone, Debug)]
pub struct Fleet {
    store: Arc<RecordStore>,
}

impl Fleet {
    /// Open the vehicle table at `path`, creating it if absent.
    pub fn open(path: impl AsRef<Path>) -> FleetResult<Self> {
        let store = RecordStore::open_for::<Vehicle>(path)?;
        Ok(Self {
            store: Arc::new(store),
        })
    }

    /// Open the vehicle table named by `config`.
    pub fn from_config(config: &FleetConfig) -> FleetResult<Self> {
        Self::open(config.vehicle_table_path())
    }

    /// The underlying table handle.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Add a new vehicle. Fails if the id is taken.
    pub fn register(&self, vehicle: &Vehicle) -> FleetResult<()> {
        self.store.add(&vehicle.to_row())?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> FleetResult<Option<Vehicle>> {
        match self.store.find_by_id(id)? {
            Some(row) => Ok(Some(Vehicle::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Persist `vehicle` over the stored row with the same id.
    ///
    /// Returns `false` if no such vehicle is stored.
    pub fn save(&self, vehicle: &Vehicle) -> FleetResult<bool> {
        Ok(self.store.update(&vehicle.to_row())?)
    }

    /// Remove the vehicle with `id`. Returns `false` if it was not stored.
    pub fn retire(&self, id: &str) -> FleetResult<bool> {
        let Some(vehicle) = self.get(id)? else {
            return Ok(false);
        };
        Ok(self.store.delete(&vehicle.to_row())?)
    }

    /// All vehicles in table order, optionally only those in `status`.
    pub fn list(&self, status: Option<VehicleStatus>) -> FleetResult<Vec<Vehicle>> {
        let rows = match status {
            Some(status) => self
                .store
                .find_by_field(fields::STATUS, &haul_store::codec::encode_code(&status))?,
            None => self.store.rows()?,
        };
        let vehicles = rows
            .iter()
            .map(Vehicle::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = vehicles.len(), ?status, "listed vehicles");
        Ok(vehicles)
    }

    /// Change a vehicle's status. Returns the updated vehicle, or `None` if
    /// no vehicle has `id`.
    pub fn set_status(&self, id: &str, status: VehicleStatus) -> FleetResult<Option<Vehicle>> {
        let session = self.store.exclusive()?;
        let Some(row) = session.find_by_id(id)? else {
            return Ok(None);
        };
        let mut vehicle = Vehicle::from_row(&row)?;
        vehicle.status = status;
        session.update(&vehicle.to_row())?;
        Ok(Some(vehicle))
    }

    pub fn allocator(&self) -> VehicleAllocator<'_> {
        VehicleAllocator::new(&self.store)
    }

    /// See [`VehicleAllocator::first_available`].
    pub fn first_available(&self, items: u32, weight: f64) -> FleetResult<Option<Vehicle>> {
        self.allocator().first_available(items, weight)
    }

    /// See [`VehicleAllocator::allocate`].
    pub fn allocate(&self, items: u32, weight: f64) -> FleetResult<Option<Allocation>> {
        self.allocator().allocate(items, weight)
    }
}
