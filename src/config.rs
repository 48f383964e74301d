//! Simulator configuration file.
//!
//! A JSON document where every field is optional:
//!
//! ```text
//! {
//!   "reference_table": "data/gains.json",
//!   "emission_factors": "data/factors.json",
//!   "equivalences": { "car_kg_per_km": 0.193 }
//! }
//! ```
//!
//! Relative paths are resolved against the configuration file's directory.

use crate::equivalence::EquivalenceFactors;
use crate::error::ReferenceError;
use crate::reference::source::JsonFileSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Reference table JSON file
    pub reference_table: Option<PathBuf>,
    /// Emission factors JSON file
    pub emission_factors: Option<PathBuf>,
    pub equivalences: EquivalenceFactors,
}

impl SimulatorConfig {
    pub fn from_json(json: &str) -> Result<Self, ReferenceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ReferenceError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut config = Self::from_json(&content)?;
        if let Some(base) = path.parent() {
            config.reference_table = config.reference_table.map(|p| base.join(p));
            config.emission_factors = config.emission_factors.map(|p| base.join(p));
        }
        Ok(config)
    }

    /// Command-line paths take precedence over the file.
    pub fn with_overrides(mut self, table: Option<PathBuf>, factors: Option<PathBuf>) -> Self {
        if table.is_some() {
            self.reference_table = table;
        }
        if factors.is_some() {
            self.emission_factors = factors;
        }
        self
    }

    pub fn source(&self) -> JsonFileSource {
        JsonFileSource::new(self.reference_table.clone(), self.emission_factors.clone())
    }
}
