//! Sound Meter — Rust metering core.
//!
//! Consumes raw s16le PCM from an external capture process, computes a
//! calibrated decibel level and running peak every cycle, and communicates
//! with the display front-end via JSON-line IPC on stdin/stdout. This is
//! the entry point that initializes all subsystems and runs the main event
//! loop.

mod audio;
mod config;
mod ipc;
mod logger;
mod meter;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use audio::{open_input, sample_ring_buffer, spawn_pcm_reader};
use config::read_meter_config;
use ipc::bridge::{emit_error, emit_event, spawn_stdin_reader};
use ipc::{MeterCommand, MeterEvent};
use meter::{spawn_meter_loop, MeterSnapshot, MeterState, MonitorOptions, WARN_THRESHOLD_DB};

#[tokio::main]
async fn main() {
    logger::init();

    // Emit starting event immediately so the front-end knows we're alive.
    emit_event(&MeterEvent::Starting {});

    emit_event(&MeterEvent::Loading {
        step: "Reading configuration...".to_string(),
    });
    let cfg = read_meter_config();
    info!(?cfg, "Configuration loaded");

    // --input <path> overrides the configured PCM source.
    let input_path = match parse_input_arg().or_else(|| cfg.input_path.clone()) {
        Some(path) => path,
        None => {
            emit_error(
                "No audio input configured (pass --input <path> or set inputPath in meter_config.json)",
            );
            std::process::exit(1);
        }
    };

    emit_event(&MeterEvent::Loading {
        step: "Opening audio input...".to_string(),
    });
    let input = match open_input(Path::new(&input_path)) {
        Ok(file) => file,
        Err(e) => {
            emit_error(&e.to_string());
            std::process::exit(1);
        }
    };
    info!(path = %input_path, "Audio input opened");

    let (producer, consumer) = sample_ring_buffer(None);
    let _pcm_reader = spawn_pcm_reader(input, producer);

    let defaults = MonitorOptions::default();
    let opts = MonitorOptions {
        block_size: cfg.block_size.unwrap_or(defaults.block_size),
        poll_interval: cfg
            .poll_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval),
    };
    let warn_threshold = cfg.warn_threshold.unwrap_or(WARN_THRESHOLD_DB);

    let state = MeterState::new();
    let (snapshot_tx, mut snapshot_rx) = mpsc::unbounded_channel();
    let meter = spawn_meter_loop(consumer, state.clone(), snapshot_tx, opts);

    // Spawn stdin reader (blocking thread -> async channel)
    let mut cmd_rx = spawn_stdin_reader();

    emit_event(&MeterEvent::Ready {});
    info!("Meter core ready");

    // Main loop: forward meter snapshots, process front-end commands.
    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(command) => {
                        if !handle_command(command, &state) {
                            break; // Stop command received
                        }
                    }
                    None => {
                        // stdin closed, parent process gone
                        info!("stdin closed, shutting down");
                        break;
                    }
                }
            }
            snapshot = snapshot_rx.recv() => {
                match snapshot {
                    Some(s) => emit_event(&level_event(&s, warn_threshold)),
                    None => {
                        info!("Meter loop ended, shutting down");
                        break;
                    }
                }
            }
        }
    }

    meter.stop();
    info!("Meter core shutting down");
}

/// Build the per-cycle level event from a snapshot.
fn level_event(snapshot: &MeterSnapshot, warn_threshold: f32) -> MeterEvent {
    MeterEvent::Level {
        db: snapshot.db,
        peak: snapshot.peak,
        band: snapshot.band.as_str().to_string(),
        warning: snapshot.db > warn_threshold,
    }
}

/// Handle a single command from the display layer.
/// Returns `false` if the main loop should exit.
fn handle_command(cmd: MeterCommand, state: &Arc<MeterState>) -> bool {
    match cmd {
        MeterCommand::Ping {} => {
            emit_event(&MeterEvent::Pong {});
        }

        MeterCommand::ResetPeak {} => {
            state.reset_peak();
            info!("Peak level reset");
            emit_event(&MeterEvent::PeakReset {});
        }

        MeterCommand::Stop {} => {
            emit_event(&MeterEvent::Stopping {});
            return false;
        }
    }

    true
}

/// Scan argv for `--input <path>`.
fn parse_input_arg() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    let mut input = None;
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--input" && i + 1 < args.len() {
            input = Some(args[i + 1].clone());
            i += 2;
        } else {
            i += 1;
        }
    }
    input
}
