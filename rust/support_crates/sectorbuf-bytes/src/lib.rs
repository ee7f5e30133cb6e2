//! Page-aligned byte storage for sector buffers: alignment helpers and an owned
//! region with a reserved prefix ahead of its aligned data start.

pub mod align;
pub mod region;

pub use region::AlignedRegion;
