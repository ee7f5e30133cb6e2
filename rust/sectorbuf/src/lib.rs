//! Sector-addressed byte buffers for storage I/O testing.
//!
//! A [`Buffer`] owns a page-aligned block of memory organized as fixed-size sectors.
//! It provides typed little/big endian accessors, fill-pattern generators
//! (constant, incrementing, decrementing, byte pattern, seeded random, address
//! overlay), comparison, copy, resize, checksum and bit counting, hex dumps and
//! plain file load/save.
//!
//! All operations validate their arguments before touching the data and report
//! failures through [`sectorbuf_common::error::Error`].

pub mod accessors;
pub mod buffer;
pub mod compare;
pub mod config;
pub mod copy;
pub mod dump;
pub mod file_io;
pub mod fill;
pub mod stats;

#[cfg(test)]
mod tests;

pub use buffer::Buffer;
pub use compare::CompareResult;
pub use config::BufferConfig;
pub use dump::ByteGrouping;
