//! Procedural helpers shared by the decorative layers.

pub mod color;
pub mod noise;
