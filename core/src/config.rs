//! Configuration file for the command line front end.
//!
//! A single JSON document with one optional section per transformation:
//!
//! ```json
//! {
//!   "flatten":   {"separator": ".", "properties": {"type": "numeric"}},
//!   "heatmap":   {"n_bins": 7, "color_scale": "YlOrRd"},
//!   "data_bars": {"color": "teal"},
//!   "diverging": {"midpoint": 0.0},
//!   "options":   {"label": "country", "sort": true}
//! }
//! ```
//!
//! Missing sections and fields take their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigResult;
use crate::styling::{DataBarsOptions, DivergingOptions, HeatmapOptions};
use crate::transform::{FlattenOptions, OptionsConfig};

/// Options for every transformation, as read from a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub flatten: FlattenOptions,
    pub heatmap: HeatmapOptions,
    pub data_bars: DataBarsOptions,
    pub diverging: DivergingOptions,
    pub options: OptionsConfig,
}

impl DashConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&content)?;
        log::debug!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }
}
