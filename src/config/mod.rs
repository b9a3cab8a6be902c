//! Configuration reading and data directory paths.

pub mod paths;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use paths::get_data_dir;

/// Top-level meter_config.json shape (written by the display front-end's
/// settings panel). Every field is optional; consumers apply defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterConfig {
    /// Path of the raw PCM file or FIFO fed by the external capturer.
    #[serde(default)]
    pub input_path: Option<String>,
    /// Samples analyzed per metering cycle.
    #[serde(default)]
    pub block_size: Option<usize>,
    /// Metering cycle period in milliseconds.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
    /// dB level above which level events carry the warning flag.
    #[serde(default)]
    pub warn_threshold: Option<f32>,
}

/// Read meter_config.json from the data directory.
pub fn read_meter_config() -> MeterConfig {
    read_json_file(&get_config_path()).unwrap_or_default()
}

/// Path to meter_config.json.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("meter_config.json")
}

/// Generic helper: read a JSON file and deserialize it.
fn read_json_file<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Option<T> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(val) => Some(val),
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read {}: {}", path.display(), e);
            }
            None
        }
    }
}
