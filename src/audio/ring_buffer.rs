//! Lock-free SPSC ring buffer for audio samples.
//!
//! Uses the `ringbuf` crate to pass i16 PCM samples from the ingest thread
//! to the metering loop without locks.

use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    HeapRb,
};

/// Default capacity: ~10 seconds of 44.1 kHz mono audio.
const DEFAULT_CAPACITY: usize = 441_000;

/// Producer half, lives in the PCM ingest thread.
pub struct SampleProducer {
    inner: ringbuf::HeapProd<i16>,
}

/// Consumer half, lives in the metering loop thread.
pub struct SampleConsumer {
    inner: ringbuf::HeapCons<i16>,
}

/// Create a matched producer/consumer pair backed by a lock-free ring buffer.
pub fn sample_ring_buffer(capacity: Option<usize>) -> (SampleProducer, SampleConsumer) {
    let cap = capacity.unwrap_or(DEFAULT_CAPACITY);
    let rb = HeapRb::<i16>::new(cap);
    let (prod, cons) = rb.split();
    (SampleProducer { inner: prod }, SampleConsumer { inner: cons })
}

impl SampleProducer {
    /// Push a slice of samples into the ring buffer.
    /// Returns the number of samples actually written (may be less than
    /// `samples.len()` if the buffer is full).
    pub fn push_slice(&mut self, samples: &[i16]) -> usize {
        self.inner.push_slice(samples)
    }
}

impl SampleConsumer {
    /// Pop up to `buf.len()` samples from the ring buffer into `buf`.
    /// Returns the number of samples actually read.
    pub fn pop_slice(&mut self, buf: &mut [i16]) -> usize {
        self.inner.pop_slice(buf)
    }

    /// Number of samples currently available for reading.
    pub fn available(&self) -> usize {
        self.inner.occupied_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_samples_in_order() {
        let (mut prod, mut cons) = sample_ring_buffer(Some(8));
        assert_eq!(prod.push_slice(&[1, -2, 3]), 3);
        assert_eq!(cons.available(), 3);
        let mut buf = [0i16; 3];
        assert_eq!(cons.pop_slice(&mut buf), 3);
        assert_eq!(buf, [1, -2, 3]);
    }

    #[test]
    fn full_buffer_takes_partial_write() {
        let (mut prod, mut cons) = sample_ring_buffer(Some(4));
        assert_eq!(prod.push_slice(&[1, 2, 3, 4, 5, 6]), 4);
        let mut buf = [0i16; 4];
        assert_eq!(cons.pop_slice(&mut buf), 4);
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn pop_from_empty_reads_nothing() {
        let (_prod, mut cons) = sample_ring_buffer(Some(4));
        let mut buf = [0i16; 4];
        assert_eq!(cons.pop_slice(&mut buf), 0);
    }
}
