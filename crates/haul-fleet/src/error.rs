//! Error types for fleet operations.

use thiserror::Error;

/// Errors that can occur during fleet operations.
#[derive(Debug, Error)]
pub enum FleetError {
    /// The vehicle table failed.
    #[error("store error: {0}")]
    Store(#[from] haul_store::StoreError),

    /// A debit asked for more than the vehicle has left.
    #[error(
        "vehicle {id} cannot carry {items} items / {weight} kg \
         (remaining {remaining_items} items / {remaining_kg} kg)"
    )]
    InsufficientCapacity {
        id: String,
        items: u32,
        weight: f64,
        remaining_items: u32,
        remaining_kg: f64,
    },

    /// A weight that is negative or not a number.
    #[error("invalid weight: {0}")]
    InvalidWeight(f64),

    /// The vehicle class name is not recognised.
    #[error("unknown vehicle class: {0}")]
    UnknownClass(String),

    /// The vehicle status name is not recognised.
    #[error("unknown vehicle status: {0}")]
    UnknownStatus(String),

    /// The city is not one of the known service locations.
    #[error("unknown city: {0}")]
    UnknownCity(String),

    /// The configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error while reading configuration.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for fleet operations.
pub type FleetResult<T> = std::result::Result<T, FleetError>;
