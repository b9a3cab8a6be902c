//! IPC protocol types for communication with the display front-end.
//!
//! Events use `{"event": "<name>", "data": {...}}` format (meter -> display).
//! Commands use `{"command": "<name>"}` format (display -> meter).

pub mod bridge;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Events: meter -> display (stdout)
// ---------------------------------------------------------------------------

/// All events emitted to the display layer via stdout as JSON lines.
///
/// Serialized as `{"event": "<variant>", "data": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum MeterEvent {
    Starting {},
    Loading { step: String },
    Ready {},
    /// One per metering cycle. `band` is the lowercase band name;
    /// `warning` is precomputed so the display layer only renders it.
    Level {
        db: f32,
        peak: f32,
        band: String,
        warning: bool,
    },
    PeakReset {},
    Error { message: String },
    Pong {},
    Stopping {},
}

// ---------------------------------------------------------------------------
// Commands: display -> meter (stdin)
// ---------------------------------------------------------------------------

/// All commands received from the display layer via stdin as JSON lines.
///
/// Deserialized from `{"command": "<variant>"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command")]
#[serde(rename_all = "snake_case")]
pub enum MeterCommand {
    Ping {},
    ResetPeak {},
    Stop {},
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_event_wire_shape() {
        let event = MeterEvent::Level {
            db: 72.5,
            peak: 80.0,
            band: "alert".to_string(),
            warning: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"event":"level","data":{"db":72.5,"peak":80.0,"band":"alert","warning":true}}"#
        );
    }

    #[test]
    fn unit_events_serialize_with_empty_data() {
        let json = serde_json::to_string(&MeterEvent::Ready {}).unwrap();
        assert_eq!(json, r#"{"event":"ready","data":{}}"#);
    }

    #[test]
    fn parses_reset_peak_command() {
        let cmd: MeterCommand = serde_json::from_str(r#"{"command":"reset_peak"}"#).unwrap();
        assert!(matches!(cmd, MeterCommand::ResetPeak {}));
    }

    #[test]
    fn parses_ping_and_stop_commands() {
        let ping: MeterCommand = serde_json::from_str(r#"{"command":"ping"}"#).unwrap();
        assert!(matches!(ping, MeterCommand::Ping {}));
        let stop: MeterCommand = serde_json::from_str(r#"{"command":"stop"}"#).unwrap();
        assert!(matches!(stop, MeterCommand::Stop {}));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(serde_json::from_str::<MeterCommand>(r#"{"command":"reboot"}"#).is_err());
    }
}
