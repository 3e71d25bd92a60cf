//! The three conversion modes.
//!
//! Each takes the loaded record slice, applies its grouping/filtering logic,
//! and writes one or more GeoJSON feature collections.

pub mod daytime;
pub mod participant;
pub mod proximity;
