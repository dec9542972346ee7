//! # Configuration
//!
//! Search and camera parameters for a stereo rig, loadable from JSON.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::coords::{Offset, Radii};
use crate::depth::DepthParams;
use crate::error::*;
use crate::search::SearchParams;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Complete parameter set for a depth query.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StereoConfig {
    pub search: SearchParams,
    pub depth: DepthParams
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl StereoConfig {
    /// Parameters for interactive single pixel queries with the given camera displacement.
    pub fn single_query(camera_displacement: f64) -> Self {
        Self {
            search: SearchParams::new(
                Radii::new(25, 25),
                Offset::new(-20, 0),
                Radii::new(1000, 1000),
                25_000
            ),
            depth: DepthParams::new(125.0, 0.05, camera_displacement)
        }
    }

    /// Parameters used by the regression data sets.
    pub fn regression() -> Self {
        Self {
            search: SearchParams::new(
                Radii::new(15, 15),
                Offset::new(-250, 0),
                Radii::new(500, 250),
                1_000_000
            ),
            depth: DepthParams::new(24.0, 0.00694, 100.0)
        }
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.depth.validate()?;

        log::debug!("Loaded configuration from {}: {:?}", path.as_ref().display(), config);

        Ok(config)
    }

    /// Serialise the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
