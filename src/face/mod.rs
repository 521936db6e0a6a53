pub mod detector;
pub mod geometry;
pub mod landmarks;
pub mod reference;
