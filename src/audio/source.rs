//! Raw PCM ingest.
//!
//! Capture itself belongs to an external process (arecord, sox, a platform
//! capture daemon); this module reads the signed 16-bit little-endian mono
//! stream it produces, from a file or FIFO, and feeds decoded samples into
//! the ring buffer for the metering loop.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::thread::JoinHandle;

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, error, info};

use super::ring_buffer::SampleProducer;

/// Bytes read from the source per iteration (4096 samples).
const READ_BYTES: usize = 8192;

/// Open the PCM input file or FIFO.
pub fn open_input(path: &Path) -> anyhow::Result<File> {
    File::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open audio input {}: {}", path.display(), e))
}

/// Spawn a blocking thread that reads s16le bytes from `reader`, decodes
/// them, and pushes the samples into the ring buffer producer.
///
/// The thread exits on end of stream or on a read error; the metering loop
/// then drains what is buffered and decays to the silence floor. A reader
/// that stops mid-sample leaves the trailing byte undelivered.
pub fn spawn_pcm_reader(
    mut reader: impl Read + Send + 'static,
    mut producer: SampleProducer,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut bytes = [0u8; READ_BYTES];
        let mut pending = 0usize;
        loop {
            match reader.read(&mut bytes[pending..]) {
                Ok(0) => {
                    info!("Audio input reached end of stream");
                    break;
                }
                Ok(n) => {
                    let total = pending + n;
                    let whole = total - (total % 2);
                    let mut samples = vec![0i16; whole / 2];
                    LittleEndian::read_i16_into(&bytes[..whole], &mut samples);
                    let written = producer.push_slice(&samples);
                    if written < samples.len() {
                        // Ring buffer full; newest samples are dropped until
                        // the metering loop catches up.
                        debug!(dropped = samples.len() - written, "Sample buffer full");
                    }
                    if whole < total {
                        bytes[0] = bytes[total - 1];
                        pending = 1;
                    } else {
                        pending = 0;
                    }
                }
                Err(e) => {
                    error!("Audio input read error: {}", e);
                    break;
                }
            }
        }
        debug!("PCM reader thread exiting");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ring_buffer::sample_ring_buffer;
    use std::io::Cursor;

    #[test]
    fn decodes_little_endian_samples() {
        let (prod, mut cons) = sample_ring_buffer(Some(16));
        // 100, -100, 32767, -32768 as s16le
        let bytes = vec![0x64, 0x00, 0x9c, 0xff, 0xff, 0x7f, 0x00, 0x80];
        let handle = spawn_pcm_reader(Cursor::new(bytes), prod);
        handle.join().unwrap();
        let mut buf = [0i16; 4];
        assert_eq!(cons.pop_slice(&mut buf), 4);
        assert_eq!(buf, [100, -100, i16::MAX, i16::MIN]);
    }

    #[test]
    fn trailing_odd_byte_is_dropped() {
        let (prod, mut cons) = sample_ring_buffer(Some(16));
        let bytes = vec![0x01, 0x00, 0x02, 0x00, 0x03];
        let handle = spawn_pcm_reader(Cursor::new(bytes), prod);
        handle.join().unwrap();
        let mut buf = [0i16; 4];
        assert_eq!(cons.pop_slice(&mut buf), 2);
        assert_eq!(buf[..2], [1, 2]);
    }

    #[test]
    fn empty_stream_delivers_nothing() {
        let (prod, mut cons) = sample_ring_buffer(Some(16));
        let handle = spawn_pcm_reader(Cursor::new(Vec::new()), prod);
        handle.join().unwrap();
        assert_eq!(cons.available(), 0);
    }
}
