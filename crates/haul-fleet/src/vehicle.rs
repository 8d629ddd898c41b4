//! The vehicle entity and its row mapping.
//!
//! Every vehicle kind shares one [`Vehicle`] struct. The [`VehicleClass`] tag
//! carries what differs between kinds: the default item and weight capacities
//! a new vehicle starts with.

use std::fmt;
use std::str::FromStr;

use haul_store::codec::{self, require, Coded};
use haul_store::{Record, Row, StoreResult};
use serde::{Deserialize, Serialize};

use crate::error::{FleetError, FleetResult};
use crate::location::Location;

/// Field names of the vehicle table, in schema order.
pub mod fields {
    pub const ID: &str = "id";
    pub const CITY: &str = "current_position_city";
    pub const COUNTRY: &str = "current_position_country";
    pub const STATUS: &str = "status";
    pub const ITEM_CAPACITY: &str = "remaining_item_capacity";
    pub const KG_CAPACITY: &str = "remaining_kg_capacity";
    pub const CLASS: &str = "type";
}

/// Kind of vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Bike,
    Truck,
    Ship,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [VehicleClass::Bike, VehicleClass::Truck, VehicleClass::Ship];

    /// Item capacity of an empty vehicle of this class.
    pub fn max_items(self) -> u32 {
        match self {
            VehicleClass::Bike => 2,
            VehicleClass::Truck => 100,
            VehicleClass::Ship => 1000,
        }
    }

    /// Weight capacity in kg of an empty vehicle of this class.
    pub fn max_kg(self) -> f64 {
        match self {
            VehicleClass::Bike => 10.0,
            VehicleClass::Truck => 3000.0,
            VehicleClass::Ship => 100_000.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::Bike => "bike",
            VehicleClass::Truck => "truck",
            VehicleClass::Ship => "ship",
        }
    }
}

impl Coded for VehicleClass {
    fn code(&self) -> u8 {
        match self {
            VehicleClass::Bike => 1,
            VehicleClass::Truck => 2,
            VehicleClass::Ship => 3,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(VehicleClass::Bike),
            2 => Some(VehicleClass::Truck),
            3 => Some(VehicleClass::Ship),
            _ => None,
        }
    }
}

impl FromStr for VehicleClass {
    type Err = FleetError;

    fn from_str(s: &str) -> FleetResult<Self> {
        VehicleClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FleetError::UnknownClass(s.to_string()))
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Operational state of a vehicle. Only `Free` vehicles are allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Free,
    Loading,
    Busy,
    NotWorking,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 4] = [
        VehicleStatus::Free,
        VehicleStatus::Loading,
        VehicleStatus::Busy,
        VehicleStatus::NotWorking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::Free => "free",
            VehicleStatus::Loading => "loading",
            VehicleStatus::Busy => "busy",
            VehicleStatus::NotWorking => "not-working",
        }
    }
}

impl Coded for VehicleStatus {
    fn code(&self) -> u8 {
        match self {
            VehicleStatus::Free => 1,
            VehicleStatus::Loading => 2,
            VehicleStatus::Busy => 3,
            VehicleStatus::NotWorking => 4,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(VehicleStatus::Free),
            2 => Some(VehicleStatus::Loading),
            3 => Some(VehicleStatus::Busy),
            4 => Some(VehicleStatus::NotWorking),
            _ => None,
        }
    }
}

impl FromStr for VehicleStatus {
    type Err = FleetError;

    /// Accepts `not-working`, `not_working` and any casing.
    fn from_str(s: &str) -> FleetResult<Self> {
        let wanted = s.trim().replace('_', "-");
        VehicleStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| FleetError::UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A delivery vehicle and what it can still carry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub position: Option<Location>,
    pub status: VehicleStatus,
    pub remaining_item_capacity: u32,
    pub remaining_kg_capacity: f64,
    pub class: VehicleClass,
}

impl Vehicle {
    /// A free, empty vehicle at its class's default capacities.
    pub fn new(id: impl Into<String>, class: VehicleClass) -> Self {
        Self {
            id: id.into(),
            position: None,
            status: VehicleStatus::Free,
            remaining_item_capacity: class.max_items(),
            remaining_kg_capacity: class.max_kg(),
            class,
        }
    }

    pub fn with_position(mut self, position: Location) -> Self {
        self.position = Some(position);
        self
    }

    /// Whether the remaining capacities cover `items` and `weight`.
    pub fn fits(&self, items: u32, weight: f64) -> bool {
        self.remaining_item_capacity >= items && self.remaining_kg_capacity >= weight
    }

    /// Subtract a shipment from the remaining capacities.
    ///
    /// Leaves the vehicle unchanged and fails if the shipment does not fit.
    pub fn debit(&mut self, items: u32, weight: f64) -> FleetResult<()> {
        if weight.is_nan() || weight < 0.0 {
            return Err(FleetError::InvalidWeight(weight));
        }
        if !self.fits(items, weight) {
            return Err(FleetError::InsufficientCapacity {
                id: self.id.clone(),
                items,
                weight,
                remaining_items: self.remaining_item_capacity,
                remaining_kg: self.remaining_kg_capacity,
            });
        }
        self.remaining_item_capacity -= items;
        self.remaining_kg_capacity -= weight;
        Ok(())
    }
}

impl Record for Vehicle {
    const NAME: &'static str = "Vehicle";

    fn sample() -> Row {
        Vehicle::new("", VehicleClass::Bike).to_row()
    }

    fn to_row(&self) -> Row {
        let (city, country) = match &self.position {
            Some(location) => (Some(location.city.as_str()), Some(location.country.as_str())),
            None => (None, None),
        };
        Row::new()
            .with(fields::ID, self.id.as_str())
            .with(fields::CITY, codec::encode_opt(city))
            .with(fields::COUNTRY, codec::encode_opt(country))
            .with(fields::STATUS, codec::encode_code(&self.status))
            .with(fields::ITEM_CAPACITY, self.remaining_item_capacity.to_string())
            .with(fields::KG_CAPACITY, self.remaining_kg_capacity.to_string())
            .with(fields::CLASS, codec::encode_code(&self.class))
    }

    fn from_row(row: &Row) -> StoreResult<Self> {
        let city = codec::decode_opt(require(row, fields::CITY)?);
        let country = codec::decode_opt(require(row, fields::COUNTRY)?);
        let position = match (city, country) {
            (None, None) => None,
            (city, country) => Some(Location::new(
                city.unwrap_or_default(),
                country.unwrap_or_default(),
            )),
        };

        Ok(Self {
            id: require(row, fields::ID)?.to_string(),
            position,
            status: codec::decode_code(fields::STATUS, require(row, fields::STATUS)?)?,
            remaining_item_capacity: codec::decode_number(
                fields::ITEM_CAPACITY,
                require(row, fields::ITEM_CAPACITY)?,
            )?,
            remaining_kg_capacity: codec::decode_number(
                fields::KG_CAPACITY,
                require(row, fields::KG_CAPACITY)?,
            )?,
            class: codec::decode_code(fields::CLASS, require(row, fields::CLASS)?)?,
        })
    }
}
