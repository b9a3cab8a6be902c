//! Level estimation, shared meter state, and the metering loop.

pub mod level;
pub mod monitor;
pub mod state;

pub use level::{LevelBand, WARN_THRESHOLD_DB};
pub use monitor::{spawn_meter_loop, MeterSnapshot, MonitorOptions};
pub use state::MeterState;
