//! IPC bridge: stdin reader and stdout event emitter.
//!
//! A blocking stdin reader thread sends deserialized commands through an
//! mpsc channel, plus a helper to emit JSON-line events to stdout. Logs go
//! to stderr and the log file; stdout carries nothing but events.

use std::io::{self, BufRead, Write};

use tokio::sync::mpsc;
use tracing::{debug, error};

use super::{MeterCommand, MeterEvent};

/// Emit a `MeterEvent` as a JSON line on stdout and flush.
pub fn emit_event(event: &MeterEvent) {
    let json = match serde_json::to_string(event) {
        Ok(j) => j,
        Err(e) => {
            error!("Failed to serialize event: {}", e);
            return;
        }
    };
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    // Ignore write/flush errors; the pipe may be closed.
    let _ = writeln!(handle, "{}", json);
    let _ = handle.flush();
}

/// Convenience helper for emitting error events.
pub fn emit_error(message: &str) {
    emit_event(&MeterEvent::Error {
        message: message.to_string(),
    });
}

/// Spawn a blocking thread that reads JSON lines from stdin, deserializes
/// them into `MeterCommand`, and forwards them through the returned channel.
///
/// The thread exits when stdin is closed (parent process gone) or on
/// unrecoverable read error.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<MeterCommand> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let stdin = io::stdin();
        let reader = stdin.lock();
        for line in reader.lines() {
            match line {
                Ok(text) => {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<MeterCommand>(trimmed) {
                        Ok(cmd) => {
                            debug!(?cmd, "Received command from display");
                            if tx.send(cmd).is_err() {
                                break; // Receiver dropped, main task is gone.
                            }
                        }
                        Err(e) => {
                            error!("Invalid JSON command: {} (input: {})", e, trimmed);
                            emit_error(&format!("Invalid JSON command: {}", e));
                        }
                    }
                }
                Err(e) => {
                    error!("stdin read error: {}", e);
                    break; // stdin closed
                }
            }
        }
        debug!("stdin reader thread exiting");
    });

    rx
}
