use serde::{Deserialize, Serialize};

use crate::error::{FleetError, FleetResult};

/// A city and its country.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
}

/// Cities the fleet operates from.
const KNOWN_CITIES: [(&str, &str); 6] = [
    ("Gothenburg", "Sweden"),
    ("Lerum", "Sweden"),
    ("Partille", "Sweden"),
    ("Molndal", "Sweden"),
    ("Stockholm", "Sweden"),
    ("Malmo", "Sweden"),
];

impl Location {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }

    /// All known service locations.
    pub fn known() -> Vec<Location> {
        KNOWN_CITIES
            .iter()
            .map(|(city, country)| Location::new(*city, *country))
            .collect()
    }

    /// Look up a known location by city name, ignoring case.
    pub fn known_city(name: &str) -> FleetResult<Location> {
        KNOWN_CITIES
            .iter()
            .find(|(city, _)| city.eq_ignore_ascii_case(name.trim()))
            .map(|(city, country)| Location::new(*city, *country))
            .ok_or_else(|| FleetError::UnknownCity(name.to_string()))
    }
}
