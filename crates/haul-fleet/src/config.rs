use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FleetError, FleetResult};

/// Where the fleet's tables live.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Directory holding the table files.
    pub data_dir: PathBuf,
    /// File name of the vehicle table inside `data_dir`.
    pub vehicle_table: String,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            vehicle_table: "vehicle.csv".into(),
        }
    }
}

impl FleetConfig {
    /// Read a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> FleetResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> FleetResult<Self> {
        toml::from_str(text).map_err(|e| FleetError::Config(e.to_string()))
    }

    pub fn vehicle_table_path(&self) -> PathBuf {
        self.data_dir.join(&self.vehicle_table)
    }
}
