//! Sample transport: raw PCM ingest and ring buffer.

pub mod ring_buffer;
pub mod source;

pub use ring_buffer::sample_ring_buffer;
pub use source::{open_input, spawn_pcm_reader};
