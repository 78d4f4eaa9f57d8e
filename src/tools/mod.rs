pub mod ring_buffer;
pub mod stream;
