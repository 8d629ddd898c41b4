//! First-fit vehicle allocation.
//!
//! Free vehicles are sorted ascending by remaining item capacity (a stable
//! sort, so equal capacities keep table order) and the first one whose item
//! *and* weight capacities cover the request wins. This approximates
//! "smallest vehicle that fits" on the item dimension only: weight never
//! influences the order, so a vehicle with a closer weight fit that sorts
//! later is not preferred.

use haul_store::codec;
use haul_store::{Record, RecordStore, TableFile};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{FleetError, FleetResult};
use crate::vehicle::{fields, Vehicle, VehicleStatus};

/// The result of a committed allocation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Allocation {
    /// The chosen vehicle, with the shipment already debited.
    pub vehicle: Vehicle,
    /// Items taken from the vehicle's capacity.
    pub items: u32,
    /// Weight in kg taken from the vehicle's capacity.
    pub weight: f64,
}

/// Pick the first free candidate, in ascending item-capacity order, that
/// can carry `items` and `weight`.
pub fn select_first_fit(mut candidates: Vec<Vehicle>, items: u32, weight: f64) -> Option<Vehicle> {
    candidates.retain(|vehicle| vehicle.status == VehicleStatus::Free);
    candidates.sort_by_key(|vehicle| vehicle.remaining_item_capacity);
    candidates
        .into_iter()
        .find(|vehicle| vehicle.fits(items, weight))
}

/// Allocation queries over a vehicle table.
pub struct VehicleAllocator<'a> {
    store: &'a RecordStore,
}

impl<'a> VehicleAllocator<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// The vehicle that would be chosen for a shipment, without reserving it.
    ///
    /// `None` means no free vehicle can carry the shipment. Nothing is
    /// written; a caller that goes on to debit the vehicle races every other
    /// caller doing the same. Use [`allocate`](Self::allocate) to choose and
    /// debit in one step.
    ///
    /// A negative or NaN `weight` fails with [`FleetError::InvalidWeight`],
    /// exactly as [`allocate`](Self::allocate) does.
    pub fn first_available(&self, items: u32, weight: f64) -> FleetResult<Option<Vehicle>> {
        check_weight(weight)?;
        let session = self.store.exclusive()?;
        first_available_in(&session, items, weight)
    }

    /// Choose a vehicle and debit the shipment from it under one table lock.
    ///
    /// Returns `None`, and writes nothing, when no free vehicle fits.
    pub fn allocate(&self, items: u32, weight: f64) -> FleetResult<Option<Allocation>> {
        check_weight(weight)?;
        let session = self.store.exclusive()?;
        let Some(mut vehicle) = first_available_in(&session, items, weight)? else {
            debug!(items, weight, "no free vehicle fits");
            return Ok(None);
        };

        vehicle.debit(items, weight)?;
        session.update(&vehicle.to_row())?;
        info!(
            vehicle = %vehicle.id,
            items,
            weight,
            remaining_items = vehicle.remaining_item_capacity,
            remaining_kg = vehicle.remaining_kg_capacity,
            "allocated shipment"
        );

        Ok(Some(Allocation {
            vehicle,
            items,
            weight,
        }))
    }
}

fn check_weight(weight: f64) -> FleetResult<()> {
    if weight.is_nan() || weight < 0.0 {
        return Err(FleetError::InvalidWeight(weight));
    }
    Ok(())
}

fn first_available_in(table: &TableFile, items: u32, weight: f64) -> FleetResult<Option<Vehicle>> {
    let free = codec::encode_code(&VehicleStatus::Free);
    let candidates = table
        .find_by_field(fields::STATUS, &free)?
        .iter()
        .map(Vehicle::from_row)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(candidates = candidates.len(), items, weight, "matching free vehicles");
    Ok(select_first_fit(candidates, items, weight))
}
