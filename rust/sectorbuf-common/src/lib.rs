//! Core definitions (error model and validation helpers), relied upon by all sectorbuf-* crates.

pub mod error;
pub mod result;

pub use result::Result;
