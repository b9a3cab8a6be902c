//! The periodic metering loop.
//!
//! One dedicated thread: every cycle it pops up to one block of samples
//! from the ring buffer, computes the dB level, folds it into the shared
//! state, delivers a snapshot to the main task, and sleeps. A stop flag is
//! checked once per iteration, so shutdown takes effect within one cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::audio::ring_buffer::SampleConsumer;

use super::level::{compute_level, LevelBand};
use super::state::MeterState;

/// One metering cycle's output, delivered to the IPC layer.
#[derive(Debug, Clone, Copy)]
pub struct MeterSnapshot {
    pub db: f32,
    pub peak: f32,
    pub band: LevelBand,
}

/// Metering loop parameters.
#[derive(Debug, Clone, Copy)]
pub struct MonitorOptions {
    /// Samples analyzed per cycle.
    pub block_size: usize,
    /// Sleep between cycles.
    pub poll_interval: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            // 100 ms of 44.1 kHz mono, matching the loop cadence.
            block_size: 4410,
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Handle to a running metering loop.
pub struct MeterHandle {
    stop: Arc<AtomicBool>,
    join: JoinHandle<()>,
}

impl MeterHandle {
    /// Request shutdown and wait for the loop to finish its current cycle.
    pub fn stop(self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = self.join.join();
    }
}

/// Spawn the metering loop on a dedicated thread.
///
/// Each cycle reads whatever the capture source delivered, up to
/// `block_size` samples; an empty buffer reads as the silence floor. The
/// loop exits when `MeterHandle::stop` is called or when the snapshot
/// receiver is dropped.
pub fn spawn_meter_loop(
    mut consumer: SampleConsumer,
    state: Arc<MeterState>,
    snapshots: mpsc::UnboundedSender<MeterSnapshot>,
    opts: MonitorOptions,
) -> MeterHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    let join = std::thread::spawn(move || {
        info!(
            block_size = opts.block_size,
            interval_ms = opts.poll_interval.as_millis() as u64,
            "Meter loop started"
        );
        let mut block = vec![0i16; opts.block_size];
        while !stop_flag.load(Ordering::SeqCst) {
            let read = consumer.pop_slice(&mut block);
            let (db, peak) = state.update(compute_level(&block[..read]));
            let snapshot = MeterSnapshot {
                db,
                peak,
                band: LevelBand::classify(db),
            };
            if snapshots.send(snapshot).is_err() {
                break; // Receiver dropped, main task is gone.
            }
            std::thread::sleep(opts.poll_interval);
        }
        debug!("Meter loop exiting");
    });

    MeterHandle { stop, join }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ring_buffer::sample_ring_buffer;
    use crate::meter::level::silence_floor;

    fn test_opts(block_size: usize) -> MonitorOptions {
        MonitorOptions {
            block_size,
            poll_interval: Duration::from_millis(1),
        }
    }

    #[test]
    fn reports_level_of_buffered_samples() {
        let (mut prod, cons) = sample_ring_buffer(Some(64));
        prod.push_slice(&[100, -100, 100, -100]);
        let state = MeterState::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_meter_loop(cons, state, tx, test_opts(4));

        let snapshot = rx.blocking_recv().unwrap();
        handle.stop();

        let expected = (20.0 * (100.0f64 / 32768.0).log10() + 90.0) as f32;
        assert!((snapshot.db - expected).abs() < 1e-4, "db={}", snapshot.db);
        assert_eq!(snapshot.peak, snapshot.db);
        assert_eq!(snapshot.band, LevelBand::classify(snapshot.db));
    }

    #[test]
    fn starved_buffer_reads_as_silence_floor() {
        let (_prod, cons) = sample_ring_buffer(Some(64));
        let state = MeterState::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_meter_loop(cons, state, tx, test_opts(4));

        let snapshot = rx.blocking_recv().unwrap();
        handle.stop();

        assert_eq!(snapshot.db, silence_floor());
    }

    #[test]
    fn peak_outlives_the_reading_that_set_it() {
        let (mut prod, cons) = sample_ring_buffer(Some(64));
        prod.push_slice(&[20_000, -20_000, 20_000, -20_000]);
        let state = MeterState::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_meter_loop(cons, state.clone(), tx, test_opts(4));

        let loud = rx.blocking_recv().unwrap();
        // Buffer is now empty, so the next cycle reads silence.
        let quiet = rx.blocking_recv().unwrap();
        handle.stop();

        assert!(quiet.db < loud.db);
        assert_eq!(quiet.peak, loud.peak);
        assert_eq!(state.peak_level(), loud.peak);
    }

    #[test]
    fn stop_ends_the_loop() {
        let (_prod, cons) = sample_ring_buffer(Some(64));
        let state = MeterState::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_meter_loop(cons, state, tx, test_opts(4));

        let _ = rx.blocking_recv();
        handle.stop();
        // Drain anything sent before the flag was observed; the channel
        // must then report closed.
        while rx.blocking_recv().is_some() {}
    }

    #[test]
    fn dropping_the_receiver_ends_the_loop() {
        let (_prod, cons) = sample_ring_buffer(Some(64));
        let state = MeterState::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = spawn_meter_loop(cons, state, tx, test_opts(4));
        drop(rx);
        // stop() joins; the loop must already be exiting on the send error.
        handle.stop();
    }
}
